//! Polling subscriptions to a battle document.
//!
//! Each [`Subscription`] owns one background task that reads the battle
//! through the battle retry profile and publishes every snapshot whose
//! version is newer than the last one published. Readers only ever see
//! whole snapshots. The task stops on [`Subscription::cancel`], when the
//! handle is dropped, once the battle has ended, or on an authorization
//! failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use versus_protocol::Snapshot;

use crate::error::StoreError;
use crate::guard::DenialCode;
use crate::retry::Retry;
use crate::store::SnapshotStore;

/// Handle to a running subscription
#[derive(Debug)]
pub struct Subscription {
    battle_id: String,
    receiver: watch::Receiver<Option<Snapshot>>,
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn spawn<S>(
        store: Arc<S>,
        battle_id: &str,
        retry: Retry<StoreError>,
        poll_interval: Duration,
    ) -> Self
    where
        S: SnapshotStore + ?Sized + 'static,
    {
        let (sender, receiver) = watch::channel(None);
        let id = battle_id.to_string();
        let task = tokio::spawn(poll(store, id, retry, poll_interval, sender));

        Self {
            battle_id: battle_id.to_string(),
            receiver,
            task,
        }
    }

    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    /// Stop polling; the last published snapshot stays readable
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Option<Snapshot> {
        self.receiver.borrow().clone()
    }

    pub fn borrow(&self) -> watch::Ref<'_, Option<Snapshot>> {
        self.receiver.borrow()
    }

    /// Wait for the next publication
    ///
    /// Returns `false` once the subscription has stopped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until a published snapshot satisfies `predicate`
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<Snapshot>
    where
        F: FnMut(&Snapshot) -> bool,
    {
        self.receiver
            .wait_for(|s| s.as_ref().is_some_and(&mut predicate))
            .await
            .ok()
            .and_then(|s| s.as_ref().cloned())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll<S>(
    store: Arc<S>,
    battle_id: String,
    retry: Retry<StoreError>,
    poll_interval: Duration,
    sender: watch::Sender<Option<Snapshot>>,
) where
    S: SnapshotStore + ?Sized,
{
    let mut published: Option<u64> = None;

    loop {
        if sender.is_closed() {
            break;
        }

        match retry.execute(|| store.read_battle(&battle_id)).await {
            Ok(snapshot) => {
                let version = snapshot.version();
                if published.is_none_or(|v| version > v) {
                    let ended = snapshot.meta.as_ref().is_some_and(|m| m.is_ended());
                    tracing::debug!(battle_id = %battle_id, version, "Publishing snapshot");
                    published = Some(version);
                    sender.send_replace(Some(snapshot));
                    if ended {
                        tracing::debug!(battle_id = %battle_id, "Battle ended, subscription finished");
                        break;
                    }
                }
            }
            Err(e) => {
                if DenialCode::from_store(&e).is_some() {
                    tracing::warn!(battle_id = %battle_id, error = %e, "Subscription denied");
                    break;
                }
                tracing::warn!(battle_id = %battle_id, error = %e, "Subscription read failed");
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
