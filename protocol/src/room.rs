//! Lobby room records (`rooms/<id>`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Ready,
    Battling,
    Finished,
}

/// A room two players pair through before a battle exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub id: String,

    pub host_id: String,

    #[serde(default)]
    pub guest_id: Option<String>,

    #[serde(default)]
    pub current_players: u8,

    #[serde(default = "default_max_players")]
    pub max_players: u8,

    #[serde(default)]
    pub status: RoomStatus,

    /// Battle document created for this room, once started
    #[serde(default)]
    pub battle_id: Option<String>,
}

fn default_max_players() -> u8 {
    2
}

impl RoomRecord {
    /// A fresh room with only its host seated
    pub fn new(id: impl Into<String>, host_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            host_id: host_id.into(),
            guest_id: None,
            current_players: 1,
            max_players: default_max_players(),
            status: RoomStatus::Waiting,
            battle_id: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current_players >= self.max_players
    }

    /// Check if a user already holds a seat
    pub fn is_member(&self, user_id: &str) -> bool {
        self.host_id == user_id || self.guest_id.as_deref() == Some(user_id)
    }
}
