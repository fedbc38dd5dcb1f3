//! Contract for the remote document store.
//!
//! The store is replicated and eventually consistent: a read may return a
//! version older than one just written, or report a document as missing
//! shortly after it was created. Callers wrap every call in
//! [`crate::Retry`]. Concurrent resolutions are serialized by
//! [`SnapshotStore::commit`], a compare-and-set on `meta.version`.

mod memory;

use async_trait::async_trait;
use versus_protocol::{Choice, RoomRecord, Snapshot};

use crate::error::StoreError;

pub use memory::MemoryStore;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read a whole battle document
    ///
    /// Missing documents are reported as [`StoreError::NotFound`].
    async fn read_battle(&self, battle_id: &str) -> Result<Snapshot, StoreError>;

    /// Create a battle document; fails if one already exists
    async fn create_battle(&self, battle_id: &str, snapshot: Snapshot) -> Result<(), StoreError>;

    /// Record a player's choice for a turn
    ///
    /// Rejected with [`StoreError::PermissionDenied`] when `turn` is not the
    /// battle's current turn, the phase does not accept choices, or the user
    /// is not a participant.
    async fn write_choice(
        &self,
        battle_id: &str,
        turn: u32,
        user_id: &str,
        choice: Choice,
    ) -> Result<(), StoreError>;

    /// Replace the battle document if its version is still `expected_version`
    ///
    /// Returns the new version. A concurrent writer makes this fail with
    /// [`StoreError::Aborted`].
    async fn commit(
        &self,
        battle_id: &str,
        expected_version: u64,
        snapshot: Snapshot,
    ) -> Result<u64, StoreError>;

    async fn read_room(&self, room_id: &str) -> Result<RoomRecord, StoreError>;

    /// Create or replace a room record
    async fn write_room(&self, room: RoomRecord) -> Result<(), StoreError>;
}
