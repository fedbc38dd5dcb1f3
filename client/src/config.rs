//! Coordinator configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetrySettings;

/// Timings used by [`crate::BattleSync`]
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "poll_interval_ms": 250, "operation_timeout_ms": 10000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Backoff for battle documents
    pub battle_retry: RetrySettings,

    /// Backoff for room records
    pub room_retry: RetrySettings,

    /// Delay between subscription polls
    pub poll_interval_ms: u64,

    /// Deadline for each retried store call; none when unset
    pub operation_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            battle_retry: RetrySettings::BATTLE,
            room_retry: RetrySettings::ROOM,
            poll_interval_ms: 1_000,
            operation_timeout_ms: None,
        }
    }
}

impl SyncConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}
