//! Domain types for the symmetric battle state

mod conditions;
mod field;
mod pokemon;
mod state;
mod stats;
mod status;
mod team;

pub use conditions::{SideCondition, SideConditionState, Terrain, Weather};
pub use field::FieldState;
pub use pokemon::{BattlePokemon, MoveSlot, Species};
pub use state::{Action, BattleState, Phase, QueuedAction, Side, TurnActions};
pub use stats::{Stat, StatModifiers, MAX_STAGE, MIN_STAGE};
pub use status::{Status, Volatile, VolatileState};
pub use team::{BattleTeam, MAX_TEAM_SIZE};
