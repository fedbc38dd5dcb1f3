use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use versus_protocol::{Choice, RoomRecord, Snapshot, WirePhase};

use super::SnapshotStore;
use crate::error::StoreError;

/// A document with its replicated view
///
/// Writes land in `latest` at once. Readers keep seeing `visible` until
/// `reads_until_visible` reads have gone by.
#[derive(Debug, Clone)]
struct Replicated<T> {
    latest: T,
    visible: Option<T>,
    reads_until_visible: u32,
}

impl<T: Clone> Replicated<T> {
    fn new(value: T, lag: u32) -> Self {
        let mut doc = Self {
            latest: value.clone(),
            visible: None,
            reads_until_visible: lag,
        };
        if lag == 0 {
            doc.visible = Some(value);
        }
        doc
    }

    fn write(&mut self, value: T, lag: u32) {
        self.latest = value;
        self.reads_until_visible = lag;
        if lag == 0 {
            self.visible = Some(self.latest.clone());
        }
    }

    fn read(&mut self) -> Option<T> {
        if self.reads_until_visible == 0 {
            self.visible = Some(self.latest.clone());
        } else {
            self.reads_until_visible -= 1;
        }
        self.visible.clone()
    }
}

#[derive(Debug, Default)]
struct Inner {
    battles: HashMap<String, Replicated<Snapshot>>,
    rooms: HashMap<String, Replicated<RoomRecord>>,

    /// Reads a write stays invisible for
    lag: u32,

    /// Errors returned by the next operations, in order
    faults: VecDeque<StoreError>,

    commits: u64,
}

/// In-process store with simulated replication lag
///
/// Clones share the same documents, so two clients built from clones of one
/// store see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write becomes visible to readers only after `reads` reads
    pub fn with_lag(reads: u32) -> Self {
        let store = Self::new();
        store.lock().lag = reads;
        store
    }

    /// Change the lag applied to subsequent writes
    pub fn set_lag(&self, reads: u32) {
        self.lock().lag = reads;
    }

    /// Fail the next operation with `error`
    pub fn fail_next(&self, error: StoreError) {
        self.lock().faults.push_back(error);
    }

    /// Fail the next `count` operations with clones of `error`
    pub fn fail_times(&self, count: usize, error: StoreError) {
        let mut inner = self.lock();
        for _ in 0..count {
            inner.faults.push_back(error.clone());
        }
    }

    /// Number of successful commits across all battles
    pub fn commit_count(&self) -> u64 {
        self.lock().commits
    }

    /// Latest written battle document, ignoring replication lag
    pub fn latest_battle(&self, battle_id: &str) -> Option<Snapshot> {
        self.lock().battles.get(battle_id).map(|d| d.latest.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock and take the next injected fault, if any
    fn begin(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self.lock();
        let fault = inner.faults.pop_front();
        match fault {
            Some(fault) => Err(fault),
            None => Ok(inner),
        }
    }
}

fn battle_path(battle_id: &str) -> String {
    format!("battles/{battle_id}")
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn read_battle(&self, battle_id: &str) -> Result<Snapshot, StoreError> {
        let mut inner = self.begin()?;
        inner
            .battles
            .get_mut(battle_id)
            .and_then(|doc| doc.read())
            .ok_or_else(|| StoreError::NotFound(battle_path(battle_id)))
    }

    async fn create_battle(&self, battle_id: &str, snapshot: Snapshot) -> Result<(), StoreError> {
        let mut inner = self.begin()?;
        if let Some(existing) = inner.battles.get(battle_id) {
            return Err(StoreError::Aborted {
                expected: 0,
                actual: existing.latest.version(),
            });
        }
        let lag = inner.lag;
        inner
            .battles
            .insert(battle_id.to_string(), Replicated::new(snapshot, lag));
        Ok(())
    }

    async fn write_choice(
        &self,
        battle_id: &str,
        turn: u32,
        user_id: &str,
        choice: Choice,
    ) -> Result<(), StoreError> {
        let mut inner = self.begin()?;
        let lag = inner.lag;
        let doc = inner
            .battles
            .get_mut(battle_id)
            .ok_or_else(|| StoreError::NotFound(battle_path(battle_id)))?;

        let mut snapshot = doc.latest.clone();
        let meta = snapshot
            .meta
            .as_ref()
            .ok_or_else(|| StoreError::Internal(format!("{} has no meta", battle_path(battle_id))))?;

        if meta.players.slot_of(user_id).is_none() {
            return Err(StoreError::PermissionDenied(format!(
                "{user_id} is not a participant"
            )));
        }
        if meta.turn != turn {
            return Err(StoreError::PermissionDenied(format!(
                "turn {turn} is not the current turn ({})",
                meta.turn
            )));
        }
        if !matches!(meta.phase, WirePhase::Choosing | WirePhase::Replacement) {
            return Err(StoreError::PermissionDenied(format!(
                "choices are closed in phase {}",
                meta.phase.as_str()
            )));
        }

        let choices = &mut snapshot.turn_entry(turn).choices;
        match choices.get(user_id) {
            Some(existing) if existing == &choice => return Ok(()),
            Some(_) => {
                return Err(StoreError::PermissionDenied(format!(
                    "{user_id} already chose for turn {turn}"
                )));
            }
            None => {
                choices.insert(user_id.to_string(), choice);
            }
        }

        doc.write(snapshot, lag);
        Ok(())
    }

    async fn commit(
        &self,
        battle_id: &str,
        expected_version: u64,
        snapshot: Snapshot,
    ) -> Result<u64, StoreError> {
        let mut inner = self.begin()?;
        let lag = inner.lag;
        let doc = inner
            .battles
            .get_mut(battle_id)
            .ok_or_else(|| StoreError::NotFound(battle_path(battle_id)))?;

        let actual = doc.latest.version();
        if actual != expected_version {
            return Err(StoreError::Aborted {
                expected: expected_version,
                actual,
            });
        }
        let version = snapshot.version();
        if version != expected_version + 1 {
            return Err(StoreError::PermissionDenied(format!(
                "version must advance from {expected_version} by one, got {version}"
            )));
        }

        doc.write(snapshot, lag);
        inner.commits += 1;
        Ok(version)
    }

    async fn read_room(&self, room_id: &str) -> Result<RoomRecord, StoreError> {
        let mut inner = self.begin()?;
        inner
            .rooms
            .get_mut(room_id)
            .and_then(|doc| doc.read())
            .ok_or_else(|| StoreError::NotFound(format!("rooms/{room_id}")))
    }

    async fn write_room(&self, room: RoomRecord) -> Result<(), StoreError> {
        let mut inner = self.begin()?;
        let lag = inner.lag;
        match inner.rooms.entry(room.id.clone()) {
            Entry::Occupied(mut doc) => doc.get_mut().write(room, lag),
            Entry::Vacant(slot) => {
                slot.insert(Replicated::new(room, lag));
            }
        }
        Ok(())
    }
}
