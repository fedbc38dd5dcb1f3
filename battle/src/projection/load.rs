use versus_protocol::{Meta, PrivateMon, PrivateRecord, PublicSide, Slot, Snapshot};

use super::codes::{
    boosts_to_modifiers, code_to_status, field_from_record, phase_from_wire,
    side_conditions_from_records, volatile_from_records,
};
use super::{side_of, AdapterError, MissingPart};
use crate::types::{BattlePokemon, BattleState, BattleTeam, MoveSlot, Species};

/// Level assumed when a stored team member has none
const DEFAULT_LEVEL: u8 = 50;

/// Rebuild the symmetric battle state from a snapshot
///
/// Requires `meta`, both player ids, both public sides and both private
/// records. The active Pokemon's hp, status and boosts come from the public
/// projection; everything else comes from the owner's private record.
pub fn load(snapshot: &Snapshot) -> Result<BattleState, AdapterError> {
    let meta = snapshot
        .meta
        .as_ref()
        .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Meta))?;

    let player = load_side(snapshot, meta, Slot::P1)?;
    let opponent = load_side(snapshot, meta, Slot::P2)?;

    let battle_log = snapshot
        .turns
        .get(&meta.turn)
        .and_then(|t| t.resolution.as_ref())
        .map(|r| r.log.clone())
        .unwrap_or_default();

    let winner = meta
        .winner_id
        .as_deref()
        .and_then(|id| meta.players.slot_of(id))
        .map(side_of);

    let field = snapshot
        .public
        .as_ref()
        .map(|p| field_from_record(&p.field))
        .unwrap_or_default();

    Ok(BattleState {
        player,
        opponent,
        turn: meta.turn,
        rng: meta.rng,
        battle_log,
        is_complete: meta.is_ended(),
        winner,
        phase: phase_from_wire(meta.phase),
        action_queue: Vec::new(),
        field,
    })
}

fn load_side(snapshot: &Snapshot, meta: &Meta, slot: Slot) -> Result<BattleTeam, AdapterError> {
    let id = meta
        .players
        .id(slot)
        .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Player(slot)))?;
    let public = snapshot
        .public
        .as_ref()
        .and_then(|p| p.side(slot))
        .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Public(slot)))?;
    let private = snapshot
        .private
        .get(id)
        .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Private(slot)))?;
    Ok(load_team(public, private))
}

fn load_team(public: &PublicSide, private: &PrivateRecord) -> BattleTeam {
    let mut pokemon: Vec<BattlePokemon> = private.team.iter().map(load_pokemon).collect();

    if let Some(active) = pokemon.first_mut() {
        let shown = &public.active;
        active.current_hp = shown.hp.cur;
        active.max_hp = shown.hp.max;
        if let Some(code) = shown.status {
            active.status = code_to_status(code);
        }
        active.stat_modifiers = boosts_to_modifiers(&shown.boosts);
    }

    let mut team = BattleTeam::new(pokemon);
    team.side_conditions = side_conditions_from_records(&public.side_conditions);
    team
}

fn load_pokemon(mon: &PrivateMon) -> BattlePokemon {
    let species = Species {
        name: mon.pokemon.name.clone(),
        types: mon.pokemon.types.clone(),
        abilities: mon.pokemon.abilities.clone(),
    };
    let default_ability = species.default_ability().to_string();

    let max_hp = mon.max_hp.or(mon.current_hp).unwrap_or(0);
    let moves = mon
        .moves
        .iter()
        .map(|m| MoveSlot {
            id: m.id.clone(),
            pp: m.pp.or(m.max_pp).unwrap_or(0),
            max_pp: m.max_pp.or(m.pp).unwrap_or(0),
            disabled: m.disabled,
        })
        .collect();

    let mut poke = BattlePokemon::new(species, mon.level.unwrap_or(DEFAULT_LEVEL), max_hp);
    poke.current_hp = mon.current_hp.unwrap_or(max_hp);
    poke.moves = moves;
    poke.status = mon.status.and_then(code_to_status);
    poke.status_turns = mon.status_turns;
    poke.volatile = volatile_from_records(&mon.volatile);
    poke.current_ability = mon
        .current_ability
        .clone()
        .unwrap_or_else(|| default_ability.clone());
    poke.original_ability = mon.original_ability.clone().unwrap_or(default_ability);
    poke.ability_changed = mon.ability_changed;
    poke
}
