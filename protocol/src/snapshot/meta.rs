//! Battle metadata: who is playing, where the battle is, and its version.

use serde::{Deserialize, Serialize};

/// Player slot in a two-player battle
///
/// `P1` is always the host (the room creator), `P2` the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    P1,
    P2,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::P1, Slot::P2];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Slot::P1),
            "p2" => Some(Slot::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::P1 => "p1",
            Slot::P2 => "p2",
        }
    }

    /// The other slot
    pub fn other(&self) -> Self {
        match self {
            Slot::P1 => Slot::P2,
            Slot::P2 => Slot::P1,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    /// Authenticated user id (the key of the player's private record)
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PlayerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Both participants, fixed when the snapshot is created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    #[serde(default)]
    pub p1: Option<PlayerRef>,

    #[serde(default)]
    pub p2: Option<PlayerRef>,
}

impl Players {
    pub fn new(host: PlayerRef, guest: PlayerRef) -> Self {
        Self {
            p1: Some(host),
            p2: Some(guest),
        }
    }

    /// Player id in a slot, if present and non-empty
    pub fn id(&self, slot: Slot) -> Option<&str> {
        let player = match slot {
            Slot::P1 => self.p1.as_ref(),
            Slot::P2 => self.p2.as_ref(),
        };
        player.map(|p| p.id.as_str()).filter(|id| !id.is_empty())
    }

    /// Slot occupied by a user id
    pub fn slot_of(&self, id: &str) -> Option<Slot> {
        Slot::BOTH
            .into_iter()
            .find(|&slot| self.id(slot) == Some(id))
    }
}

/// Phase names as the store spells them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WirePhase {
    #[default]
    Choosing,
    Resolving,
    Replacement,
    Ended,
}

impl WirePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WirePhase::Choosing => "choosing",
            WirePhase::Resolving => "resolving",
            WirePhase::Replacement => "replacement",
            WirePhase::Ended => "ended",
        }
    }
}

/// `battles/<id>/meta`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub players: Players,

    /// Current turn number (turn 1 is the first choice phase)
    #[serde(default)]
    pub turn: u32,

    #[serde(default)]
    pub phase: WirePhase,

    /// Bumped by exactly one on every committed resolution
    #[serde(default)]
    pub version: u64,

    /// Seed handed to the resolution engine for the current turn
    #[serde(default)]
    pub rng: u64,

    #[serde(default)]
    pub winner_id: Option<String>,
}

impl Meta {
    pub fn is_ended(&self) -> bool {
        self.phase == WirePhase::Ended
    }
}
