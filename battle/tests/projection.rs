//! Projection adapter behaviour against whole snapshots.
//!
//! Covers the null-resolution identity, visible-field round trips, revealed
//! move bookkeeping, active normalization and load failures.

use versus_battle::projection::{self, AdapterError, MissingPart};
use versus_battle::{
    BattlePokemon, BattleState, BattleTeam, Phase, Side, SideCondition, SideConditionState,
    Species, Status, Volatile, VolatileState, Weather,
};
use versus_protocol::{Slot, Snapshot, StatusCode, WirePhase};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HOST: &str = "uid-host";
const GUEST: &str = "uid-guest";

fn mon(name: &str, max_hp: u32, moves: &[(&str, u8)]) -> BattlePokemon {
    let species = Species::new(name)
        .with_types(["normal"])
        .with_abilities([format!("{name}-ability")]);
    moves
        .iter()
        .fold(BattlePokemon::new(species, 50, max_hp), |p, (id, pp)| {
            p.with_move(*id, *pp)
        })
}

fn host_team() -> BattleTeam {
    BattleTeam::new(vec![
        mon("pikachu", 95, &[("thunderbolt", 15), ("quick-attack", 30)]),
        mon("snorlax", 220, &[("body-slam", 15), ("rest", 5)]),
        mon("gengar", 120, &[("shadow-ball", 15), ("hypnosis", 20)]),
    ])
}

fn guest_team() -> BattleTeam {
    BattleTeam::new(vec![
        mon("bulbasaur", 105, &[("tackle", 35), ("leech-seed", 10)]),
        mon("tauros", 150, &[("hyper-beam", 5), ("earthquake", 10)]),
    ])
}

fn fresh_snapshot() -> Snapshot {
    projection::create_snapshot(HOST, GUEST, &host_team(), &guest_team(), 1234)
}

/// Snapshot with everything the adapter knows how to persist set to a
/// non-default value
fn busy_snapshot() -> Snapshot {
    let base = fresh_snapshot();
    let mut state = projection::load(&base).expect("fresh snapshot loads");

    let pikachu = &mut state.player.pokemon[0];
    pikachu.apply_damage(30);
    pikachu.set_status(Status::Paralyzed);
    pikachu.stat_modifiers.speed = -2;
    pikachu.use_move("thunderbolt");
    pikachu.add_volatile(Volatile::Confusion, VolatileState::for_turns(2));
    pikachu.set_ability("lightning-rod");

    state.opponent.pokemon[1].apply_damage(150);
    state.opponent.recount_fainted();
    state
        .opponent
        .add_condition(SideCondition::Reflect, SideConditionState::for_turns(4));
    state
        .player
        .add_condition(SideCondition::Spikes, SideConditionState::default());
    state.field.set_weather(Weather::Rain, Some(3));
    state.field.trick_room_turns = 2;

    state.turn = 2;
    state.rng = 99;
    state.battle_log = vec!["pikachu used thunderbolt".to_string()];

    projection::commit(&base, &state).expect("commit succeeds")
}

fn without_version(snapshot: &Snapshot) -> Snapshot {
    let mut copy = snapshot.clone();
    if let Some(meta) = copy.meta.as_mut() {
        meta.version = 0;
    }
    copy
}

// ---------------------------------------------------------------------------
// Null resolution
// ---------------------------------------------------------------------------

#[test]
fn commit_of_loaded_state_only_bumps_version() {
    for snapshot in [fresh_snapshot(), busy_snapshot()] {
        let state = projection::load(&snapshot).unwrap();
        let next = projection::commit(&snapshot, &state).unwrap();

        assert_eq!(next.version(), snapshot.version() + 1);
        assert_eq!(without_version(&next), without_version(&snapshot));

        let before = serde_json::to_string(&snapshot.public).unwrap();
        let after = serde_json::to_string(&next.public).unwrap();
        assert_eq!(before, after);
    }
}

#[test]
fn commit_is_deterministic() {
    let snapshot = busy_snapshot();
    let state = projection::load(&snapshot).unwrap();

    let a = projection::commit(&snapshot, &state).unwrap();
    let b = projection::commit(&snapshot, &state).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Visible fields
// ---------------------------------------------------------------------------

#[test]
fn active_hp_status_and_boosts_survive_commit_then_load() {
    let snapshot = busy_snapshot();
    let state = projection::load(&snapshot).unwrap();

    let pikachu = state.player.active().unwrap();
    assert_eq!(pikachu.current_hp, 65);
    assert_eq!(pikachu.status, Some(Status::Paralyzed));
    assert_eq!(pikachu.stat_modifiers.speed, -2);
    assert!(pikachu.has_volatile(&Volatile::Confusion));
    assert_eq!(pikachu.current_ability, "lightning-rod");
    assert!(pikachu.ability_changed);
    assert_eq!(pikachu.find_move("thunderbolt").map(|m| m.pp), Some(14));

    assert_eq!(state.opponent.fainted_count, 1);
    assert!(state.opponent.has_condition(SideCondition::Reflect));
    assert_eq!(state.player.condition_layers(SideCondition::Spikes), 1);
    assert_eq!(state.field.weather, Some(Weather::Rain));
    assert_eq!(state.field.weather_turns, Some(3));
    assert_eq!(state.turn, 2);
    assert_eq!(state.rng, 99);
    assert_eq!(state.phase, Phase::Choice);
}

#[test]
fn public_active_uses_short_status_codes() {
    let snapshot = busy_snapshot();
    let public = snapshot.public.as_ref().unwrap();
    let p1 = public.side(Slot::P1).unwrap();

    assert_eq!(p1.active.status, Some(StatusCode::Par));
    assert_eq!(p1.active.hp.cur, 65);
    assert_eq!(p1.active.boosts.spe, -2);

    let json = serde_json::to_value(p1).unwrap();
    assert_eq!(json["active"]["status"], "PAR");
}

#[test]
fn confused_status_is_published_but_not_read_back() {
    let base = fresh_snapshot();
    let mut state = projection::load(&base).unwrap();
    state.opponent.pokemon[0].status = Some(Status::Confused);
    state.opponent.pokemon[0].status_turns = Some(0);

    let next = projection::commit(&base, &state).unwrap();
    let p2 = next.public.as_ref().and_then(|p| p.side(Slot::P2)).unwrap();
    assert_eq!(p2.active.status, Some(StatusCode::Cnf));

    let reloaded = projection::load(&next).unwrap();
    assert_eq!(reloaded.opponent.pokemon[0].status, None);
}

// ---------------------------------------------------------------------------
// Public projection contents
// ---------------------------------------------------------------------------

#[test]
fn used_moves_become_revealed_and_accumulate() {
    let snapshot = busy_snapshot();
    let p1 = snapshot.public.as_ref().and_then(|p| p.side(Slot::P1)).unwrap();
    assert_eq!(p1.active.revealed_moves, vec!["thunderbolt".to_string()]);

    let mut state = projection::load(&snapshot).unwrap();
    state.player.pokemon[0].use_move("quick-attack");
    state.turn = 3;
    let next = projection::commit(&snapshot, &state).unwrap();
    let p1 = next.public.as_ref().and_then(|p| p.side(Slot::P1)).unwrap();
    assert_eq!(
        p1.active.revealed_moves,
        vec!["thunderbolt".to_string(), "quick-attack".to_string()]
    );

    // Switching out keeps what was revealed
    let mut state = projection::load(&next).unwrap();
    assert!(state.player.switch_to(1));
    state.turn = 4;
    let after_switch = projection::commit(&next, &state).unwrap();
    let p1 = after_switch
        .public
        .as_ref()
        .and_then(|p| p.side(Slot::P1))
        .unwrap();
    assert_eq!(p1.active.species, "snorlax");
    assert_eq!(p1.bench_public[0].species, "pikachu");
    assert_eq!(p1.bench_public[0].revealed_moves.len(), 2);
}

#[test]
fn revealed_moves_follow_the_member_not_the_species() {
    let team = BattleTeam::new(vec![
        mon("pikachu", 95, &[("thunderbolt", 15)]),
        mon("ditto", 48, &[("transform", 10)]),
        mon("ditto", 48, &[("tackle", 35)]),
    ]);
    let snapshot = projection::create_snapshot(HOST, GUEST, &team, &guest_team(), 7);

    // Send out the second ditto and let it tackle
    let mut state = projection::load(&snapshot).unwrap();
    assert!(state.player.switch_to(2));
    state.turn = 2;
    let switched = projection::commit(&snapshot, &state).unwrap();

    let mut state = projection::load(&switched).unwrap();
    assert!(state.player.pokemon[0].use_move("tackle"));
    state.turn = 3;
    let tackled = projection::commit(&switched, &state).unwrap();

    // Bring pikachu back; both dittos are benched
    let mut state = projection::load(&tackled).unwrap();
    assert!(state.player.switch_to(2));
    state.turn = 4;
    let after = projection::commit(&tackled, &state).unwrap();

    let p1 = after.public.as_ref().and_then(|p| p.side(Slot::P1)).unwrap();
    assert_eq!(p1.active.species, "pikachu");
    let bench: Vec<(&str, &[String])> = p1
        .bench_public
        .iter()
        .map(|b| (b.species.as_str(), b.revealed_moves.as_slice()))
        .collect();
    let tackle = ["tackle".to_string()];
    let expected: Vec<(&str, &[String])> = vec![("ditto", &[][..]), ("ditto", &tackle[..])];
    assert_eq!(bench, expected);
}

#[test]
fn public_projection_hides_unrevealed_data() {
    let snapshot = busy_snapshot();
    let public = serde_json::to_string(&snapshot.public).unwrap();

    for hidden in ["hyper-beam", "earthquake", "tackle", "snorlax-ability", "maxPp"] {
        assert!(!public.contains(hidden), "public projection leaks {hidden}");
    }

    let p2 = snapshot.public.as_ref().and_then(|p| p.side(Slot::P2)).unwrap();
    assert_eq!(p2.bench_public.len(), 1);
    assert_eq!(p2.bench_public[0].species, "tauros");
    assert!(p2.bench_public[0].fainted);
}

#[test]
fn active_is_persisted_first() {
    let base = fresh_snapshot();
    let mut state = projection::load(&base).unwrap();
    assert!(state.player.switch_to(2));

    let next = projection::commit(&base, &state).unwrap();
    let p1 = next.public.as_ref().and_then(|p| p.side(Slot::P1)).unwrap();
    assert_eq!(p1.active.species, "gengar");
    let bench: Vec<_> = p1.bench_public.iter().map(|b| b.species.as_str()).collect();
    assert_eq!(bench, vec!["snorlax", "pikachu"]);

    let private = &next.private[HOST].team;
    assert_eq!(private[0].pokemon.name, "gengar");
    assert_eq!(private[2].pokemon.name, "pikachu");

    let reloaded = projection::load(&next).unwrap();
    assert_eq!(reloaded.player.current_index, 0);
    assert_eq!(reloaded.player.active().map(|p| p.name()), Some("gengar"));
}

// ---------------------------------------------------------------------------
// Turn records and meta
// ---------------------------------------------------------------------------

#[test]
fn commit_closes_the_turn() {
    let mut base = fresh_snapshot();
    base.turn_entry(1)
        .choices
        .insert(HOST.to_string(), versus_protocol::Choice::use_move("thunderbolt"));

    let mut state = projection::load(&base).unwrap();
    state.turn = 2;
    state.battle_log = vec!["turn 1".to_string()];

    let next = projection::commit(&base, &state).unwrap();
    let closed = &next.turns[&1];
    assert!(closed.choices.is_empty());
    assert_eq!(
        closed.resolution.as_ref().map(|r| r.log.clone()),
        Some(vec!["turn 1".to_string()])
    );
    assert!(next.turns.contains_key(&2));
    assert!(!next.turns[&2].is_resolved());
    assert_eq!(next.current_turn(), 2);
}

#[test]
fn empty_log_writes_no_resolution() {
    let base = fresh_snapshot();
    let mut state = projection::load(&base).unwrap();
    state.turn = 2;

    let next = projection::commit(&base, &state).unwrap();
    assert!(next.turns[&1].resolution.is_none());
}

#[test]
fn completed_battle_ends_and_is_then_immutable() {
    let base = fresh_snapshot();
    let mut state = projection::load(&base).unwrap();
    state.is_complete = true;
    state.winner = Some(Side::Opponent);
    // Phase deliberately left at Choice: completion wins
    let next = projection::commit(&base, &state).unwrap();

    let meta = next.meta.as_ref().unwrap();
    assert_eq!(meta.phase, WirePhase::Ended);
    assert_eq!(meta.winner_id.as_deref(), Some(GUEST));
    assert_eq!(
        next.turns[&1].resolution.as_ref().and_then(|r| r.winner.as_deref()),
        Some(GUEST)
    );

    let reloaded = projection::load(&next).unwrap();
    assert!(reloaded.is_complete);
    assert_eq!(reloaded.winner, Some(Side::Opponent));
    assert_eq!(reloaded.phase, Phase::Ended);

    assert_eq!(
        projection::commit(&next, &reloaded),
        Err(AdapterError::BattleEnded)
    );
}

#[test]
fn create_snapshot_starts_at_version_one() {
    let snapshot = fresh_snapshot();
    let meta = snapshot.meta.as_ref().unwrap();
    assert_eq!(meta.version, 1);
    assert_eq!(meta.turn, 1);
    assert_eq!(meta.phase, WirePhase::Choosing);
    assert_eq!(meta.players.id(Slot::P1), Some(HOST));
    assert_eq!(meta.players.id(Slot::P2), Some(GUEST));
    assert!(snapshot.turns.contains_key(&1));
    assert_eq!(snapshot.private.len(), 2);
}

// ---------------------------------------------------------------------------
// Load failures and fallbacks
// ---------------------------------------------------------------------------

#[test]
fn load_names_the_missing_part() {
    let mut no_meta = fresh_snapshot();
    no_meta.meta = None;
    assert_eq!(
        projection::load(&no_meta),
        Err(AdapterError::IncompleteSnapshot(MissingPart::Meta))
    );

    let mut no_guest = fresh_snapshot();
    no_guest.meta.as_mut().unwrap().players.p2 = None;
    assert_eq!(
        projection::load(&no_guest),
        Err(AdapterError::IncompleteSnapshot(MissingPart::Player(Slot::P2)))
    );

    let mut no_public = fresh_snapshot();
    no_public.public.as_mut().unwrap().p1 = None;
    assert_eq!(
        projection::load(&no_public),
        Err(AdapterError::IncompleteSnapshot(MissingPart::Public(Slot::P1)))
    );

    let mut no_private = fresh_snapshot();
    no_private.private.remove(GUEST);
    assert_eq!(
        projection::load(&no_private),
        Err(AdapterError::IncompleteSnapshot(MissingPart::Private(Slot::P2)))
    );
}

#[test]
fn load_fills_missing_fields_like_the_store_writers() {
    let snapshot = Snapshot::from_value(serde_json::json!({
        "meta": {
            "players": { "p1": { "id": "a" }, "p2": { "id": "b" } },
            "turn": 1,
            "phase": "choosing",
            "version": 1,
            "rng": 5
        },
        "public": {
            "p1": { "active": { "species": "eevee", "hp": { "cur": 40, "max": 55 } } },
            "p2": { "active": { "species": "ditto", "hp": { "cur": 48, "max": 48 } } }
        },
        "private": {
            "a": { "team": [{
                "pokemon": { "name": "eevee", "abilities": ["run-away", "adaptability"] },
                "maxHp": 55,
                "moves": [{ "id": "tackle", "maxPp": 35 }, { "id": "growl", "pp": 12 }]
            }] },
            "b": { "team": [{ "pokemon": { "name": "ditto" }, "currentHp": 48 }] }
        }
    }))
    .unwrap();

    let state: BattleState = projection::load(&snapshot).unwrap();
    let eevee = state.player.active().unwrap();
    assert_eq!(eevee.level, 50);
    assert_eq!(eevee.current_hp, 40);
    assert_eq!(eevee.current_ability, "run-away");
    assert_eq!(eevee.original_ability, "run-away");
    assert_eq!((eevee.moves[0].pp, eevee.moves[0].max_pp), (35, 35));
    assert_eq!((eevee.moves[1].pp, eevee.moves[1].max_pp), (12, 12));

    let ditto = state.opponent.active().unwrap();
    assert_eq!(ditto.max_hp, 48);
    assert_eq!(ditto.current_ability, "");
    assert!(state.battle_log.is_empty());
}
