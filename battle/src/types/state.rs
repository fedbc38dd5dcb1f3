//! BattleState - the symmetric battle state handed to the resolution engine

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::field::FieldState;
use super::pokemon::BattlePokemon;
use super::team::BattleTeam;

/// One side of a two-player battle, relative to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// The host
    Player,
    /// The guest
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Battle phase
///
/// Phases advance `Choice -> Resolution -> {Choice | Replacement | Ended}`,
/// `Replacement -> Resolution`, and nothing leaves `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// Waiting for both players to choose
    #[default]
    Choice,
    /// The engine is resolving the submitted actions
    Resolution,
    /// A side must send in a replacement for a fainted active
    Replacement,
    Ended,
}

impl Phase {
    /// Check a single phase step
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Choice, Resolution)
                | (Replacement, Resolution)
                | (Resolution, Choice)
                | (Resolution, Replacement)
                | (Resolution, Ended)
        )
    }

    /// Check the phase change produced by one committed resolution,
    /// which always passes through `Resolution`
    pub fn can_resolve_to(self, next: Phase) -> bool {
        self.can_transition_to(Phase::Resolution) && Phase::Resolution.can_transition_to(next)
    }

    pub fn is_final(self) -> bool {
        self == Phase::Ended
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Choice => "choice",
            Phase::Resolution => "resolution",
            Phase::Replacement => "replacement",
            Phase::Ended => "ended",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a side chose to do this turn
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    Move {
        move_id: String,
        target: Option<String>,
    },
    Switch {
        index: usize,
    },
    Forfeit,
}

/// An action waiting in the resolution queue
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueuedAction {
    pub side: Side,
    pub action: Action,
}

/// Both sides' actions for one turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnActions {
    pub player: Option<Action>,
    pub opponent: Option<Action>,
}

impl TurnActions {
    pub fn get(&self, side: Side) -> Option<&Action> {
        match side {
            Side::Player => self.player.as_ref(),
            Side::Opponent => self.opponent.as_ref(),
        }
    }

    pub fn set(&mut self, side: Side, action: Action) {
        match side {
            Side::Player => self.player = Some(action),
            Side::Opponent => self.opponent = Some(action),
        }
    }

    /// Both sides have chosen
    pub fn is_complete(&self) -> bool {
        self.player.is_some() && self.opponent.is_some()
    }

    /// First side (host first) that forfeited
    pub fn forfeiting_side(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| matches!(self.get(side), Some(Action::Forfeit)))
    }

    /// Flatten into queue order (host first)
    pub fn queue(&self) -> Vec<QueuedAction> {
        Side::BOTH
            .into_iter()
            .filter_map(|side| {
                self.get(side).map(|action| QueuedAction {
                    side,
                    action: action.clone(),
                })
            })
            .collect()
    }
}

/// Complete symmetric battle state
///
/// This exists only transiently between loading a snapshot and committing
/// the engine's output; it is never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BattleState {
    /// The host's team
    pub player: BattleTeam,

    /// The guest's team
    pub opponent: BattleTeam,

    /// Current turn number (starts at 1)
    pub turn: u32,

    /// Seed for the deterministic engine
    pub rng: u64,

    /// Events of the most recent resolution
    pub battle_log: Vec<String>,

    // === Outcome ===
    pub is_complete: bool,
    pub winner: Option<Side>,

    pub phase: Phase,

    pub action_queue: Vec<QueuedAction>,

    /// Global field state (weather, terrain, etc.)
    pub field: FieldState,
}

impl BattleState {
    /// Create a fresh battle at turn 1
    pub fn new(player: BattleTeam, opponent: BattleTeam, rng: u64) -> Self {
        Self {
            player,
            opponent,
            turn: 1,
            rng,
            battle_log: Vec::new(),
            is_complete: false,
            winner: None,
            phase: Phase::Choice,
            action_queue: Vec::new(),
            field: FieldState::new(),
        }
    }

    /// Get a side's team
    pub fn team(&self, side: Side) -> &BattleTeam {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    /// Get a side's team mutably
    pub fn team_mut(&mut self, side: Side) -> &mut BattleTeam {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Get a side's active Pokemon
    pub fn active(&self, side: Side) -> Option<&BattlePokemon> {
        self.team(side).active()
    }

    /// Append an event to the log
    pub fn log(&mut self, event: impl Into<String>) {
        self.battle_log.push(event.into());
    }

    /// End the battle
    pub fn finish(&mut self, winner: Option<Side>) {
        self.is_complete = true;
        self.winner = winner;
        self.phase = Phase::Ended;
        self.action_queue.clear();
    }

    /// Winner implied by the teams, if one side is wiped out
    pub fn decided_winner(&self) -> Option<Side> {
        match (self.player.all_fainted(), self.opponent.all_fainted()) {
            (true, false) => Some(Side::Opponent),
            (false, true) => Some(Side::Player),
            _ => None,
        }
    }

    /// Sides whose active Pokemon has fainted with a healthy bench behind it
    pub fn sides_needing_replacement(&self) -> Vec<Side> {
        Side::BOTH
            .into_iter()
            .filter(|&side| {
                let team = self.team(side);
                team.active().is_some_and(|p| p.is_fainted()) && team.alive_count() > 0
            })
            .collect()
    }
}
