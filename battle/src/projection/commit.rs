use versus_protocol::{
    BenchPublic, HpPair, MoveRecord, PrivateMon, PrivateRecord, PublicActive, PublicSide,
    Resolution, Slot, Snapshot, SpeciesRef,
};

use super::codes::{
    field_to_record, modifiers_to_boosts, phase_to_wire, side_conditions_to_records,
    status_to_code, volatile_to_records,
};
use super::{side_of, slot_of, AdapterError, MissingPart};
use crate::types::{BattlePokemon, BattleState, BattleTeam, Phase};

/// Write an updated battle state back into a copy of the snapshot
///
/// The returned snapshot has `meta.version` one higher than the input. The
/// resolution of the turn that was being played is recorded (unless there
/// is nothing to record), that turn's choices are cleared and an empty
/// record for the next turn exists. Ended snapshots are immutable.
pub fn commit(snapshot: &Snapshot, updated: &BattleState) -> Result<Snapshot, AdapterError> {
    let meta = snapshot
        .meta
        .as_ref()
        .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Meta))?;
    if meta.is_ended() {
        return Err(AdapterError::BattleEnded);
    }

    let mut ids = Vec::with_capacity(2);
    for slot in Slot::BOTH {
        let id = meta
            .players
            .id(slot)
            .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Player(slot)))?;
        ids.push((slot, id.to_string()));
    }

    let closing_turn = meta.turn;
    let winner_id = updated
        .winner
        .and_then(|side| meta.players.id(slot_of(side)))
        .map(str::to_string);
    let phase = if updated.is_complete {
        Phase::Ended
    } else {
        updated.phase
    };

    let mut next = snapshot.clone();

    let mut next_meta = meta.clone();
    next_meta.version += 1;
    next_meta.turn = updated.turn;
    next_meta.phase = phase_to_wire(phase);
    next_meta.rng = updated.rng;
    next_meta.winner_id = winner_id.clone();
    next.meta = Some(next_meta);

    let mut public = next.public.take().unwrap_or_default();
    for (slot, id) in &ids {
        let team = updated.team(side_of(*slot));
        let previous_public = snapshot.public.as_ref().and_then(|p| p.side(*slot));
        let previous_private = snapshot.private.get(id);
        let projected = project_team(team, previous_public, previous_private);

        *public.side_mut(*slot) = Some(projected.public);
        next.private.entry(id.clone()).or_default().team = projected.team;
    }
    public.field = field_to_record(&updated.field);
    next.public = Some(public);

    let closing = next.turn_entry(closing_turn);
    if !updated.battle_log.is_empty() || updated.is_complete {
        closing.resolution = Some(Resolution {
            log: updated.battle_log.clone(),
            winner: winner_id,
        });
    }
    closing.choices.clear();
    next.turn_entry(updated.turn);

    Ok(next)
}

/// One side's projections, in persisted order (active first)
pub(super) struct ProjectedTeam {
    pub public: PublicSide,
    pub team: Vec<PrivateMon>,
}

/// Project a team into its public and private halves
///
/// The public half is computed from this team alone. `previous_*` are the
/// side's records before this commit; they only contribute revealed moves.
pub(super) fn project_team(
    team: &BattleTeam,
    previous_public: Option<&PublicSide>,
    previous_private: Option<&PrivateRecord>,
) -> ProjectedTeam {
    let mut order: Vec<usize> = (0..team.pokemon.len()).collect();
    if team.current_index < order.len() {
        order.swap(0, team.current_index);
    }

    let mut public = PublicSide {
        side_conditions: side_conditions_to_records(&team.side_conditions),
        ..PublicSide::default()
    };
    let mut private_team = Vec::with_capacity(order.len());

    for (position, &index) in order.iter().enumerate() {
        let poke = &team.pokemon[index];
        // `index` is also the member's position in the records being replaced
        let previous = previous_private
            .and_then(|r| r.team.get(index))
            .filter(|m| m.pokemon.name == poke.species.name);
        let revealed_moves = revealed_moves(poke, index, previous, previous_public);

        if position == 0 {
            public.active = PublicActive {
                species: poke.species.name.clone(),
                level: poke.level,
                hp: HpPair {
                    cur: poke.current_hp,
                    max: poke.max_hp,
                },
                status: poke.status.map(status_to_code),
                boosts: modifiers_to_boosts(&poke.stat_modifiers),
                revealed_moves,
            };
        } else {
            public.bench_public.push(BenchPublic {
                species: poke.species.name.clone(),
                fainted: poke.is_fainted(),
                revealed_moves,
            });
        }

        private_team.push(private_mon(poke));
    }

    ProjectedTeam {
        public,
        team: private_team,
    }
}

/// Previously revealed moves plus every move whose PP dropped since the
/// last commit
fn revealed_moves(
    poke: &BattlePokemon,
    position: usize,
    previous: Option<&PrivateMon>,
    previous_public: Option<&PublicSide>,
) -> Vec<String> {
    let mut revealed = previous_public
        .and_then(|p| p.member_at(position))
        .filter(|(species, _)| *species == poke.name())
        .map(|(_, moves)| moves.to_vec())
        .unwrap_or_default();

    if let Some(previous) = previous {
        for slot in &poke.moves {
            let pp_before = previous
                .moves
                .iter()
                .find(|m| m.id == slot.id)
                .and_then(|m| m.pp.or(m.max_pp));
            let used = pp_before.is_some_and(|pp| slot.pp < pp);
            if used && !revealed.contains(&slot.id) {
                revealed.push(slot.id.clone());
            }
        }
    }

    revealed
}

fn private_mon(poke: &BattlePokemon) -> PrivateMon {
    PrivateMon {
        pokemon: SpeciesRef {
            name: poke.species.name.clone(),
            types: poke.species.types.clone(),
            abilities: poke.species.abilities.clone(),
        },
        level: Some(poke.level),
        current_hp: Some(poke.current_hp),
        max_hp: Some(poke.max_hp),
        moves: poke
            .moves
            .iter()
            .map(|m| MoveRecord {
                id: m.id.clone(),
                pp: Some(m.pp),
                max_pp: Some(m.max_pp),
                disabled: m.disabled,
            })
            .collect(),
        status: poke.status.map(status_to_code),
        status_turns: poke.status_turns,
        volatile: volatile_to_records(&poke.volatile),
        current_ability: Some(poke.current_ability.clone()),
        original_ability: Some(poke.original_ability.clone()),
        ability_changed: poke.ability_changed,
    }
}
