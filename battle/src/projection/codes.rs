//! Fixed tables between stored codes and domain types

use std::collections::BTreeMap;

use versus_protocol::{
    Boosts, FieldRecord, SideConditionRecord, StatusCode, VolatileRecord, WirePhase,
};

use crate::types::{
    FieldState, Phase, SideCondition, SideConditionState, StatModifiers, Status, Terrain,
    Volatile, VolatileState, Weather,
};

/// Every ailment has a code; `Confused` is published as `CNF`.
pub fn status_to_code(status: Status) -> StatusCode {
    match status {
        Status::Paralyzed => StatusCode::Par,
        Status::Poisoned => StatusCode::Psn,
        Status::Burned => StatusCode::Brn,
        Status::Frozen => StatusCode::Frz,
        Status::Asleep => StatusCode::Slp,
        Status::Confused => StatusCode::Cnf,
    }
}

/// `CNF` reads back as no primary ailment; confusion lives in `volatile`.
pub fn code_to_status(code: StatusCode) -> Option<Status> {
    match code {
        StatusCode::Par => Some(Status::Paralyzed),
        StatusCode::Psn => Some(Status::Poisoned),
        StatusCode::Brn => Some(Status::Burned),
        StatusCode::Frz => Some(Status::Frozen),
        StatusCode::Slp => Some(Status::Asleep),
        StatusCode::Cnf => None,
    }
}

pub fn phase_from_wire(phase: WirePhase) -> Phase {
    match phase {
        WirePhase::Choosing => Phase::Choice,
        WirePhase::Resolving => Phase::Resolution,
        WirePhase::Replacement => Phase::Replacement,
        WirePhase::Ended => Phase::Ended,
    }
}

pub fn phase_to_wire(phase: Phase) -> WirePhase {
    match phase {
        Phase::Choice => WirePhase::Choosing,
        Phase::Resolution => WirePhase::Resolving,
        Phase::Replacement => WirePhase::Replacement,
        Phase::Ended => WirePhase::Ended,
    }
}

pub fn boosts_to_modifiers(boosts: &Boosts) -> StatModifiers {
    StatModifiers {
        attack: boosts.atk,
        defense: boosts.def,
        special_attack: boosts.spa,
        special_defense: boosts.spd,
        speed: boosts.spe,
        accuracy: boosts.acc,
        evasion: boosts.eva,
    }
    .clamped()
}

pub fn modifiers_to_boosts(modifiers: &StatModifiers) -> Boosts {
    let m = modifiers.clamped();
    Boosts {
        atk: m.attack,
        def: m.defense,
        spa: m.special_attack,
        spd: m.special_defense,
        spe: m.speed,
        acc: m.accuracy,
        eva: m.evasion,
    }
}

pub fn volatile_from_records(
    records: &BTreeMap<String, VolatileRecord>,
) -> BTreeMap<Volatile, VolatileState> {
    records
        .iter()
        .map(|(id, record)| {
            let state = VolatileState {
                turns: record.turns,
                counter: record.counter,
                source: record.source.clone(),
            };
            (Volatile::from_protocol(id), state)
        })
        .collect()
}

pub fn volatile_to_records(
    volatile: &BTreeMap<Volatile, VolatileState>,
) -> BTreeMap<String, VolatileRecord> {
    volatile
        .iter()
        .map(|(v, state)| {
            let record = VolatileRecord {
                turns: state.turns,
                counter: state.counter,
                source: state.source.clone(),
            };
            (v.to_protocol().to_string(), record)
        })
        .collect()
}

pub fn side_conditions_from_records(
    records: &BTreeMap<String, SideConditionRecord>,
) -> BTreeMap<SideCondition, SideConditionState> {
    let mut conditions = BTreeMap::new();
    for (id, record) in records {
        match SideCondition::from_protocol(id) {
            Some(condition) => {
                conditions.insert(
                    condition,
                    SideConditionState {
                        turns: record.turns,
                        layers: record.layers,
                    },
                );
            }
            None => tracing::debug!(condition = %id, "Dropping unknown side condition"),
        }
    }
    conditions
}

pub fn side_conditions_to_records(
    conditions: &BTreeMap<SideCondition, SideConditionState>,
) -> BTreeMap<String, SideConditionRecord> {
    conditions
        .iter()
        .map(|(condition, state)| {
            let record = SideConditionRecord {
                turns: state.turns,
                layers: state.layers,
            };
            (condition.to_protocol().to_string(), record)
        })
        .collect()
}

pub fn field_from_record(record: &FieldRecord) -> FieldState {
    let weather = record.weather.as_deref().and_then(|w| {
        let parsed = Weather::from_protocol(w);
        if parsed.is_none() {
            tracing::debug!(weather = %w, "Dropping unknown weather");
        }
        parsed
    });
    let terrain = record.terrain.as_deref().and_then(|t| {
        let parsed = Terrain::from_protocol(t);
        if parsed.is_none() {
            tracing::debug!(terrain = %t, "Dropping unknown terrain");
        }
        parsed
    });

    FieldState {
        weather_turns: weather.and(record.weather_turns),
        weather,
        terrain_turns: terrain.and(record.terrain_turns),
        terrain,
        trick_room_turns: record.trick_room_turns,
    }
}

pub fn field_to_record(field: &FieldState) -> FieldRecord {
    FieldRecord {
        weather: field.weather.map(|w| w.to_protocol().to_string()),
        weather_turns: field.weather.and(field.weather_turns),
        terrain: field.terrain.map(|t| t.to_protocol().to_string()),
        terrain_turns: field.terrain.and(field.terrain_turns),
        trick_room_turns: field.trick_room_turns,
    }
}
