//! Contract for the deterministic resolution engine

use crate::types::{BattleState, TurnActions};

/// Output of resolving one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// State after the turn, including the next turn number and phase
    pub state: BattleState,

    /// Events of the turn, in order
    pub log: Vec<String>,
}

/// A pure function from (state, actions, seed) to the next state
///
/// Implementations must be deterministic: the same inputs always produce the
/// same [`Resolved`]. The engine runs in a trusted context and sees both
/// teams in full.
pub trait ResolutionEngine: Send + Sync {
    fn resolve(&self, state: BattleState, actions: &TurnActions, seed: u64) -> Resolved;
}

impl<F> ResolutionEngine for F
where
    F: Fn(BattleState, &TurnActions, u64) -> Resolved + Send + Sync,
{
    fn resolve(&self, state: BattleState, actions: &TurnActions, seed: u64) -> Resolved {
        self(state, actions, seed)
    }
}
