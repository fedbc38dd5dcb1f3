//! Store-facing record shapes for synchronized two-player battles.
//!
//! A battle lives in the remote document store as a partitioned [`Snapshot`]:
//!
//! ```text
//! battles/<id>/meta      players, turn, phase, version, rng, winner
//! battles/<id>/public    what both players may see
//! battles/<id>/private   per-player full team, readable by its owner only
//! battles/<id>/turns     per-turn choices and committed resolutions
//! ```
//!
//! Rooms (the lobby record two players pair through) are described by
//! [`RoomRecord`]. Nothing in this crate performs I/O; it only fixes the
//! JSON shape both clients and the store agree on.

use thiserror::Error;

pub mod room;
pub mod snapshot;

pub use room::{RoomRecord, RoomStatus};
pub use snapshot::{
    BenchPublic, Boosts, Choice, ChoiceAction, ChoiceLock, ChoicePayload, FieldRecord, HpPair,
    Meta, MoveRecord, PlayerRef, Players, PrivateMon, PrivateRecord, PublicActive, PublicSide,
    PublicState, Resolution, SideConditionRecord, Slot, Snapshot, SpeciesRef, StatusCode,
    TurnRecord, VolatileRecord, WirePhase,
};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid record format: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}
