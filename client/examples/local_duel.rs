//! Local Duel Example
//!
//! Two clients share one in-memory store with replication lag. Each picks
//! a random usable move every turn (or a replacement after a faint) and the
//! host resolves turns with a toy fixed-damage engine until one side wins.
//!
//! Run with `RUST_LOG=debug` to see retries and commits.

use anyhow::{Result, bail};
use rand::seq::SliceRandom;
use versus_battle::{
    Action, BattlePokemon, BattleState, BattleTeam, Phase, Resolved, Side, Species, TurnActions,
};
use versus_client::{BattleSync, MemoryStore, SyncConfig, SyncError, TurnOutcome};
use versus_protocol::Choice;

const ROOM: &str = "lobby";
const BATTLE: &str = "duel";
const MAX_TURNS: u32 = 100;

fn mon(name: &str, max_hp: u32, moves: &[&str]) -> BattlePokemon {
    moves.iter().fold(
        BattlePokemon::new(Species::new(name), 50, max_hp),
        |p, id| p.with_move(*id, 10),
    )
}

/// Every hit deals 15 to 34 damage, drawn from the turn seed
fn toy_engine(mut state: BattleState, actions: &TurnActions, seed: u64) -> Resolved {
    let mut log = Vec::new();
    let mut roll = seed;

    for queued in actions.queue() {
        let side = queued.side;
        match queued.action {
            Action::Switch { index } => {
                let team = state.team_mut(side);
                if team.switch_to(index) {
                    if let Some(p) = team.active() {
                        log.push(format!("{side} sent out {}", p.name()));
                    }
                }
            }
            Action::Move { move_id, .. } if state.phase == Phase::Choice => {
                let Some(attacker) = state.team_mut(side).active_mut() else {
                    continue;
                };
                if attacker.is_fainted() {
                    continue;
                }
                attacker.use_move(&move_id);
                log.push(format!("{} used {move_id}", attacker.name()));

                roll = roll.wrapping_mul(6364136223846793005).wrapping_add(1);
                let damage = 15 + (roll >> 33) as u32 % 20;
                let defenders = state.team_mut(side.other());
                if let Some(defender) = defenders.active_mut() {
                    defender.apply_damage(damage);
                    log.push(format!("{} lost {damage} HP", defender.name()));
                    if defender.is_fainted() {
                        log.push(format!("{} fainted", defender.name()));
                    }
                }
                defenders.recount_fainted();
            }
            _ => {}
        }
    }

    state.rng = roll.wrapping_add(seed);
    match state.decided_winner() {
        Some(winner) => state.finish(Some(winner)),
        None => {
            state.phase = if state.sides_needing_replacement().is_empty() {
                Phase::Choice
            } else {
                Phase::Replacement
            };
            state.turn += 1;
        }
    }

    Resolved { state, log }
}

/// A random legal choice for `side`, or none if it has nothing to do
fn pick_choice(state: &BattleState, side: Side) -> Option<Choice> {
    let team = state.team(side);
    let mut rng = rand::thread_rng();

    if state.phase == Phase::Replacement {
        if !state.sides_needing_replacement().contains(&side) {
            return None;
        }
        let options: Vec<usize> = team
            .bench()
            .filter(|(_, p)| p.is_alive())
            .map(|(i, _)| i)
            .collect();
        return options.choose(&mut rng).map(|&i| Choice::switch_to(i));
    }

    let active = team.active()?;
    let moves: Vec<&str> = active
        .moves
        .iter()
        .filter(|m| m.usable())
        .map(|m| m.id.as_str())
        .collect();
    match moves.choose(&mut rng) {
        Some(id) => Some(Choice::use_move(*id)),
        None => Some(Choice::forfeit()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = SyncConfig {
        poll_interval_ms: 50,
        ..SyncConfig::default()
    };
    let store = MemoryStore::new();
    let host = BattleSync::with_config(store.clone(), config.clone()).with_user("ash");
    let guest = BattleSync::with_config(store.clone(), config).with_user("gary");

    let ash_team = BattleTeam::new(vec![
        mon("pikachu", 95, &["thunderbolt", "quick-attack"]),
        mon("charizard", 150, &["flamethrower", "wing-attack"]),
    ]);
    let gary_team = BattleTeam::new(vec![
        mon("eevee", 110, &["tackle", "bite"]),
        mon("blastoise", 160, &["surf", "skull-bash"]),
    ]);

    host.create_room(ROOM).await?;
    guest.join_room(ROOM).await?;
    host.start_battle(ROOM, BATTLE, &ash_team, &gary_team, rand::random())
        .await?;

    // From here on every write reaches readers one read late
    store.set_lag(1);

    let mut watcher = guest.watch(BATTLE);

    for _ in 0..MAX_TURNS {
        let state = host.load_state(BATTLE).await?;
        if state.is_complete {
            break;
        }

        for (client, side) in [(&host, Side::Player), (&guest, Side::Opponent)] {
            if let Some(choice) = pick_choice(&state, side) {
                client.submit_choice(BATTLE, choice).await?;
            }
        }

        let outcome = loop {
            match host.resolve_turn(BATTLE, &toy_engine).await {
                // The host's replica may not show the guest's choice yet
                Err(SyncError::ChoicesPending(_)) => tokio::task::yield_now().await,
                other => break other?,
            }
        };

        let TurnOutcome::Committed { version, turn, phase } = outcome else {
            continue;
        };
        let Some(snapshot) = watcher.wait_for(|s| s.version() >= version).await else {
            bail!("subscription stopped before version {version}");
        };

        let closed = if phase == Phase::Ended { turn } else { turn - 1 };
        let resolution = snapshot
            .turns
            .get(&closed)
            .and_then(|t| t.resolution.as_ref());
        for line in resolution.iter().flat_map(|r| &r.log) {
            println!("[turn {closed}] {line}");
        }
    }

    let snapshot = host.load_battle(BATTLE).await?;
    match snapshot.meta.and_then(|m| m.winner_id) {
        Some(winner) => println!("{winner} wins!"),
        None => bail!("no winner after {MAX_TURNS} turns"),
    }

    watcher.cancel();
    Ok(())
}
