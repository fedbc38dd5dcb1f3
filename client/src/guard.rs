//! Authorization and phase checks.
//!
//! Every check is a pure classification over records that were already
//! fetched. Layers run in a fixed order and stop at the first denial:
//!
//! ```text
//! authentication -> battle data -> participancy -> turn -> phase
//!                                              \-> capacity / role (rooms)
//! ```
//!
//! Denials are returned as a [`PermissionCheck`], never raised. The only
//! place a denial becomes an error is the coordinator boundary
//! ([`crate::SyncError::Denied`]).

use versus_battle::projection::phase_from_wire;
use versus_battle::Phase;
use versus_protocol::{Meta, RoomRecord, Slot};

use crate::error::StoreError;

/// Why an operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialCode {
    Unauthenticated,
    InvalidUser,
    NoBattleData,
    NotParticipant,
    NotCurrentTurn,
    InvalidPhase,
    RoomFull,
    NotHost,
    /// Raised by the store's own access rules
    PermissionDenied,
}

impl DenialCode {
    pub fn code(&self) -> &'static str {
        match self {
            DenialCode::Unauthenticated => "unauthenticated",
            DenialCode::InvalidUser => "invalid-user",
            DenialCode::NoBattleData => "no-battle-data",
            DenialCode::NotParticipant => "not-participant",
            DenialCode::NotCurrentTurn => "not-current-turn",
            DenialCode::InvalidPhase => "invalid-phase",
            DenialCode::RoomFull => "room-full",
            DenialCode::NotHost => "not-host",
            DenialCode::PermissionDenied => "permission-denied",
        }
    }

    /// The one sentence shown to a user for this denial
    ///
    /// Callers add their own context around it.
    pub fn message(&self) -> &'static str {
        match self {
            DenialCode::Unauthenticated => "Please sign in to access this feature.",
            DenialCode::InvalidUser => "Invalid user session. Please sign in again.",
            DenialCode::NoBattleData => "Battle data not available.",
            DenialCode::NotParticipant => "You are not a participant in this battle.",
            DenialCode::NotCurrentTurn => "It is not your turn to make a move.",
            DenialCode::InvalidPhase => "Cannot perform this action in the current battle phase.",
            DenialCode::RoomFull => "This room is full. Please try joining another room.",
            DenialCode::NotHost => "Only the host can perform this action.",
            DenialCode::PermissionDenied => {
                "You do not have permission to perform this action. Please ensure you are logged in and have the correct permissions."
            }
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "unauthenticated" => Some(DenialCode::Unauthenticated),
            "invalid-user" => Some(DenialCode::InvalidUser),
            "no-battle-data" => Some(DenialCode::NoBattleData),
            "not-participant" => Some(DenialCode::NotParticipant),
            "not-current-turn" => Some(DenialCode::NotCurrentTurn),
            "invalid-phase" => Some(DenialCode::InvalidPhase),
            "room-full" => Some(DenialCode::RoomFull),
            "not-host" => Some(DenialCode::NotHost),
            "permission-denied" => Some(DenialCode::PermissionDenied),
            _ => None,
        }
    }

    /// Denial carried by a store error, if it is an authorization failure
    pub fn from_store(error: &StoreError) -> Option<Self> {
        match error {
            StoreError::PermissionDenied(_) => Some(DenialCode::PermissionDenied),
            StoreError::Unauthenticated => Some(DenialCode::Unauthenticated),
            _ => None,
        }
    }
}

impl std::fmt::Display for DenialCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of one guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionCheck {
    pub has_permission: bool,
    pub code: Option<DenialCode>,
}

impl PermissionCheck {
    pub fn granted() -> Self {
        Self {
            has_permission: true,
            code: None,
        }
    }

    pub fn denied(code: DenialCode) -> Self {
        Self {
            has_permission: false,
            code: Some(code),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.has_permission
    }

    /// User-facing sentence for a denial
    pub fn error(&self) -> Option<&'static str> {
        self.code.map(|c| c.message())
    }

    pub fn into_result(self) -> Result<(), DenialCode> {
        match self.code {
            Some(code) if !self.has_permission => Err(code),
            _ => Ok(()),
        }
    }
}

/// Seat a participant holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn slot(&self) -> Slot {
        match self {
            Role::Host => Slot::P1,
            Role::Guest => Slot::P2,
        }
    }

    pub fn from_slot(slot: Slot) -> Self {
        match slot {
            Slot::P1 => Role::Host,
            Slot::P2 => Role::Guest,
        }
    }
}

/// The part of a battle or room record the guard looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleParticipants {
    pub host_id: String,
    pub guest_id: Option<String>,

    /// Side expected to act; `None` means both choose simultaneously
    pub current_turn: Option<Role>,

    pub phase: Option<Phase>,
}

impl BattleParticipants {
    pub fn from_meta(meta: &Meta) -> Self {
        Self {
            host_id: meta.players.id(Slot::P1).unwrap_or_default().to_string(),
            guest_id: meta.players.id(Slot::P2).map(str::to_string),
            current_turn: None,
            phase: Some(phase_from_wire(meta.phase)),
        }
    }

    /// A room before its battle exists has no phase
    pub fn from_room(room: &RoomRecord) -> Self {
        Self {
            host_id: room.host_id.clone(),
            guest_id: room.guest_id.clone(),
            current_turn: None,
            phase: None,
        }
    }

    pub fn with_current_turn(mut self, role: Role) -> Self {
        self.current_turn = Some(role);
        self
    }

    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        if !self.host_id.is_empty() && self.host_id == user_id {
            Some(Role::Host)
        } else if self.guest_id.as_deref() == Some(user_id) {
            Some(Role::Guest)
        } else {
            None
        }
    }
}

macro_rules! check {
    ($check:expr) => {{
        let check = $check;
        if !check.has_permission {
            return check;
        }
    }};
}

pub fn check_authentication(actor: Option<&str>) -> PermissionCheck {
    match actor {
        None => PermissionCheck::denied(DenialCode::Unauthenticated),
        Some(id) if id.trim().is_empty() => PermissionCheck::denied(DenialCode::InvalidUser),
        Some(_) => PermissionCheck::granted(),
    }
}

pub fn check_battle_participation(
    actor: Option<&str>,
    battle: Option<&BattleParticipants>,
) -> PermissionCheck {
    check!(check_authentication(actor));

    let (Some(actor), Some(battle)) = (actor, battle) else {
        return PermissionCheck::denied(DenialCode::NoBattleData);
    };
    if battle.role_of(actor).is_none() {
        return PermissionCheck::denied(DenialCode::NotParticipant);
    }

    PermissionCheck::granted()
}

/// Moves and switches during the choice phase
///
/// Turn ownership is checked before the phase, so an actor out of turn is
/// told so whatever the phase is.
pub fn check_battle_action_permission(
    actor: Option<&str>,
    battle: Option<&BattleParticipants>,
) -> PermissionCheck {
    check!(check_battle_participation(actor, battle));
    check!(check_turn(actor, battle));

    if battle.and_then(|b| b.phase) != Some(Phase::Choice) {
        return PermissionCheck::denied(DenialCode::InvalidPhase);
    }
    PermissionCheck::granted()
}

/// Replacement switches after a faint
pub fn check_replacement_permission(
    actor: Option<&str>,
    battle: Option<&BattleParticipants>,
) -> PermissionCheck {
    check!(check_battle_participation(actor, battle));
    check!(check_turn(actor, battle));

    if battle.and_then(|b| b.phase) != Some(Phase::Replacement) {
        return PermissionCheck::denied(DenialCode::InvalidPhase);
    }
    PermissionCheck::granted()
}

pub fn check_room_creation_permission(actor: Option<&str>) -> PermissionCheck {
    check_authentication(actor)
}

/// Members may always re-enter; newcomers need a free seat
pub fn check_room_join_permission(actor: Option<&str>, room: &RoomRecord) -> PermissionCheck {
    check!(check_authentication(actor));

    match actor {
        Some(id) if room.is_member(id) => PermissionCheck::granted(),
        _ if room.is_full() => PermissionCheck::denied(DenialCode::RoomFull),
        _ => PermissionCheck::granted(),
    }
}

pub fn check_battle_start_permission(
    actor: Option<&str>,
    battle: Option<&BattleParticipants>,
) -> PermissionCheck {
    check!(check_authentication(actor));

    let (Some(actor), Some(battle)) = (actor, battle) else {
        return PermissionCheck::denied(DenialCode::NoBattleData);
    };
    if battle.role_of(actor) != Some(Role::Host) {
        return PermissionCheck::denied(DenialCode::NotHost);
    }

    PermissionCheck::granted()
}

fn check_turn(actor: Option<&str>, battle: Option<&BattleParticipants>) -> PermissionCheck {
    let (Some(actor), Some(battle)) = (actor, battle) else {
        return PermissionCheck::denied(DenialCode::NoBattleData);
    };
    match battle.current_turn {
        Some(turn) if battle.role_of(actor) != Some(turn) => {
            PermissionCheck::denied(DenialCode::NotCurrentTurn)
        }
        _ => PermissionCheck::granted(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use versus_protocol::RoomStatus;

    fn battle(current_turn: Option<Role>, phase: Phase) -> BattleParticipants {
        BattleParticipants {
            host_id: "alice".to_string(),
            guest_id: Some("bob".to_string()),
            current_turn,
            phase: Some(phase),
        }
    }

    #[test]
    fn test_authentication() {
        assert_eq!(check_authentication(None).code, Some(DenialCode::Unauthenticated));
        assert_eq!(check_authentication(Some("")).code, Some(DenialCode::InvalidUser));
        assert!(check_authentication(Some("alice")).is_granted());
    }

    #[test]
    fn test_participation() {
        let b = battle(None, Phase::Choice);
        assert!(check_battle_participation(Some("bob"), Some(&b)).is_granted());
        assert_eq!(
            check_battle_participation(Some("carol"), Some(&b)).code,
            Some(DenialCode::NotParticipant)
        );
        assert_eq!(
            check_battle_participation(Some("alice"), None).code,
            Some(DenialCode::NoBattleData)
        );
        // Authentication runs first
        assert_eq!(
            check_battle_participation(None, None).code,
            Some(DenialCode::Unauthenticated)
        );
    }

    #[test]
    fn test_turn_gating_ignores_phase() {
        for phase in [Phase::Choice, Phase::Resolution, Phase::Replacement, Phase::Ended] {
            let b = battle(Some(Role::Host), phase);
            assert_eq!(
                check_battle_action_permission(Some("bob"), Some(&b)).code,
                Some(DenialCode::NotCurrentTurn),
                "phase {phase}"
            );
        }
    }

    #[test]
    fn test_phase_gating_on_own_turn() {
        for phase in [Phase::Resolution, Phase::Replacement, Phase::Ended] {
            let b = battle(Some(Role::Guest), phase);
            assert_eq!(
                check_battle_action_permission(Some("bob"), Some(&b)).code,
                Some(DenialCode::InvalidPhase)
            );
        }
        let b = battle(Some(Role::Guest), Phase::Choice);
        assert!(check_battle_action_permission(Some("bob"), Some(&b)).is_granted());
    }

    #[test]
    fn test_simultaneous_choice() {
        let b = battle(None, Phase::Choice);
        assert!(check_battle_action_permission(Some("alice"), Some(&b)).is_granted());
        assert!(check_battle_action_permission(Some("bob"), Some(&b)).is_granted());
    }

    #[test]
    fn test_replacement() {
        let b = battle(Some(Role::Host), Phase::Replacement);
        assert!(check_replacement_permission(Some("alice"), Some(&b)).is_granted());
        assert_eq!(
            check_replacement_permission(Some("bob"), Some(&b)).code,
            Some(DenialCode::NotCurrentTurn)
        );

        let b = battle(None, Phase::Choice);
        assert_eq!(
            check_replacement_permission(Some("alice"), Some(&b)).code,
            Some(DenialCode::InvalidPhase)
        );
    }

    #[test]
    fn test_join_re_entry_when_full() {
        let mut room = RoomRecord::new("room-1", "alice");
        room.guest_id = Some("bob".to_string());
        room.current_players = 2;
        room.status = RoomStatus::Ready;

        assert!(check_room_join_permission(Some("alice"), &room).is_granted());
        assert!(check_room_join_permission(Some("bob"), &room).is_granted());
        assert_eq!(
            check_room_join_permission(Some("carol"), &room).code,
            Some(DenialCode::RoomFull)
        );

        let open = RoomRecord::new("room-2", "alice");
        assert!(check_room_join_permission(Some("carol"), &open).is_granted());
    }

    #[test]
    fn test_start_needs_host() {
        let room = RoomRecord::new("room-1", "alice");
        let b = BattleParticipants::from_room(&room);
        assert!(check_battle_start_permission(Some("alice"), Some(&b)).is_granted());
        assert_eq!(
            check_battle_start_permission(Some("bob"), Some(&b)).code,
            Some(DenialCode::NotHost)
        );
        assert_eq!(check_room_creation_permission(None).code, Some(DenialCode::Unauthenticated));
    }

    #[test]
    fn test_into_result_and_messages() {
        assert_eq!(PermissionCheck::granted().into_result(), Ok(()));
        let denied = PermissionCheck::denied(DenialCode::RoomFull);
        assert_eq!(denied.into_result(), Err(DenialCode::RoomFull));
        assert_eq!(denied.error(), Some("This room is full. Please try joining another room."));

        for code in [
            DenialCode::Unauthenticated,
            DenialCode::InvalidUser,
            DenialCode::NoBattleData,
            DenialCode::NotParticipant,
            DenialCode::NotCurrentTurn,
            DenialCode::InvalidPhase,
            DenialCode::RoomFull,
            DenialCode::NotHost,
            DenialCode::PermissionDenied,
        ] {
            assert_eq!(DenialCode::from_code(code.code()), Some(code));
            assert!(!code.message().is_empty());
        }
        assert_eq!(
            DenialCode::from_store(&StoreError::NotFound("x".into())),
            None
        );
    }
}
