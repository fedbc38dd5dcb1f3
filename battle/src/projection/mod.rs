//! State projection between the partitioned snapshot and [`BattleState`].
//!
//! [`load`] rebuilds the symmetric state from `meta`, both public sides and
//! both private records. [`commit`] goes the other way: it bumps the
//! version, recomputes each side's public projection from that side's team
//! only, rewrites the private records and closes the turn. Neither touches
//! a clock or a random source, so identical inputs give identical outputs.
//!
//! The host always plays [`Side::Player`] (slot `p1`), the guest
//! [`Side::Opponent`] (slot `p2`).
//!
//! [`BattleState`]: crate::BattleState

mod codes;
mod commit;
mod create;
mod load;

use thiserror::Error;
use versus_protocol::Slot;

use crate::types::Side;

pub use codes::{code_to_status, phase_from_wire, phase_to_wire, status_to_code};
pub use commit::commit;
pub use create::create_snapshot;
pub use load::load;

/// Part of a snapshot that must be present to load a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
    Meta,
    Player(Slot),
    Public(Slot),
    Private(Slot),
}

impl std::fmt::Display for MissingPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingPart::Meta => write!(f, "meta"),
            MissingPart::Player(slot) => write!(f, "meta.players.{slot}"),
            MissingPart::Public(slot) => write!(f, "public.{slot}"),
            MissingPart::Private(slot) => write!(f, "private record for {slot}"),
        }
    }
}

/// Errors raised by the projection adapter
///
/// These are structural problems with the document and are never retried
/// at this layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Incomplete snapshot: missing {0}")]
    IncompleteSnapshot(MissingPart),

    #[error("Battle has already ended")]
    BattleEnded,
}

/// Side played from a slot
pub fn side_of(slot: Slot) -> Side {
    match slot {
        Slot::P1 => Side::Player,
        Slot::P2 => Side::Opponent,
    }
}

/// Slot holding a side
pub fn slot_of(side: Side) -> Slot {
    match side {
        Side::Player => Slot::P1,
        Side::Opponent => Slot::P2,
    }
}
