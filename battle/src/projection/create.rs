use std::collections::BTreeMap;

use versus_protocol::{
    Meta, PlayerRef, Players, PrivateRecord, PublicState, Snapshot, TurnRecord, WirePhase,
};

use super::codes::field_to_record;
use super::commit::project_team;
use crate::types::{BattleTeam, FieldState};

/// Build the first snapshot of a battle once host and guest are paired
///
/// The result is version 1, turn 1, in the choosing phase, with an empty
/// record for turn 1.
pub fn create_snapshot(
    host: &str,
    guest: &str,
    host_team: &BattleTeam,
    guest_team: &BattleTeam,
    seed: u64,
) -> Snapshot {
    let host_side = project_team(host_team, None, None);
    let guest_side = project_team(guest_team, None, None);

    let mut private = BTreeMap::new();
    private.insert(host.to_string(), PrivateRecord::new(host_side.team));
    private.insert(guest.to_string(), PrivateRecord::new(guest_side.team));

    let mut turns = BTreeMap::new();
    turns.insert(1, TurnRecord::default());

    Snapshot {
        meta: Some(Meta {
            players: Players::new(PlayerRef::new(host), PlayerRef::new(guest)),
            turn: 1,
            phase: WirePhase::Choosing,
            version: 1,
            rng: seed,
            winner_id: None,
        }),
        public: Some(PublicState {
            p1: Some(host_side.public),
            p2: Some(guest_side.public),
            field: field_to_record(&FieldState::new()),
        }),
        private,
        turns,
    }
}
