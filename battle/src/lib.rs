//! Symmetric battle state, its projection to the store, and the engine contract.
//!
//! # Overview
//!
//! `versus-battle` sits between `versus-protocol` (stored document shapes) and
//! `versus-client` (store access and turn orchestration):
//!
//! ```text
//! versus-protocol (snapshot shapes)
//!        │
//!        ▼
//! versus-battle (domain types + projection) ← THIS CRATE
//!        │
//!        └─> versus-client (retry, guard, turn coordinator)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`BattleState`] - Both teams, turn, seed, phase and field
//! - [`BattleTeam`] / [`BattlePokemon`] - One side and its members
//! - [`Status`] - Primary ailments (at most one per Pokemon)
//! - [`Volatile`] - Volatile conditions (Confusion, Taunt, etc.)
//! - [`StatModifiers`] - Stat stages (-6 to +6)
//! - [`Weather`], [`Terrain`], [`SideCondition`] - Field conditions
//!
//! ## Projection
//! - [`projection::load`] - Snapshot to [`BattleState`]
//! - [`projection::commit`] - [`BattleState`] back into a new snapshot version
//! - [`projection::create_snapshot`] - First snapshot of a paired battle
//!
//! ## Engine and Validation
//! - [`ResolutionEngine`] - The deterministic turn resolver, supplied by the caller
//! - [`validate_state`] - Checks run on engine output before it is committed
//!
//! # Example Usage
//!
//! ```ignore
//! use versus_battle::projection;
//!
//! let state = projection::load(&snapshot)?;
//! let resolved = engine.resolve(state, &actions, seed);
//! let next = projection::commit(&snapshot, &resolved.state)?;
//! assert_eq!(next.version(), snapshot.version() + 1);
//! ```

pub mod engine;
pub mod projection;
pub mod types;
pub mod validation;

// Re-export main types at crate root for convenience
pub use engine::{ResolutionEngine, Resolved};
pub use projection::{AdapterError, MissingPart};
pub use types::{
    Action, BattlePokemon, BattleState, BattleTeam, FieldState, MoveSlot, Phase, QueuedAction,
    Side, SideCondition, SideConditionState, Species, Stat, StatModifiers, Status, Terrain,
    TurnActions, Volatile, VolatileState, Weather,
};
pub use validation::{validate_state, ValidationReport};
