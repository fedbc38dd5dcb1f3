//! `battles/<id>/private/<uid>`: a player's full team.
//!
//! Only the owning player can read their record through the store's access
//! rules, and only the projection adapter writes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::public::StatusCode;

/// Species data carried with a team member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRef {
    pub name: String,

    #[serde(default)]
    pub types: Vec<String>,

    /// Abilities the species can have, first one is the default
    #[serde(default)]
    pub abilities: Vec<String>,
}

/// A move slot with its remaining PP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub id: String,

    #[serde(default)]
    pub pp: Option<u8>,

    #[serde(default)]
    pub max_pp: Option<u8>,

    #[serde(default)]
    pub disabled: bool,
}

/// A volatile condition with its counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatileRecord {
    /// Turns remaining, for conditions that expire
    #[serde(default)]
    pub turns: Option<u8>,

    /// Consecutive-use counter (Protect and friends)
    #[serde(default)]
    pub counter: Option<u8>,

    /// Move or effect that caused the condition
    #[serde(default)]
    pub source: Option<String>,
}

/// One team member with everything the opponent must not see
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMon {
    pub pokemon: SpeciesRef,

    #[serde(default)]
    pub level: Option<u8>,

    #[serde(default)]
    pub current_hp: Option<u32>,

    #[serde(default)]
    pub max_hp: Option<u32>,

    #[serde(default)]
    pub moves: Vec<MoveRecord>,

    #[serde(default)]
    pub status: Option<StatusCode>,

    #[serde(default)]
    pub status_turns: Option<u8>,

    /// Volatile conditions keyed by condition id ("confusion")
    #[serde(default)]
    pub volatile: BTreeMap<String, VolatileRecord>,

    #[serde(default)]
    pub current_ability: Option<String>,

    #[serde(default)]
    pub original_ability: Option<String>,

    #[serde(default)]
    pub ability_changed: bool,
}

/// Move a player is locked into (Choice items, Encore)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceLock {
    #[serde(default)]
    pub move_id: Option<String>,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub locked: bool,
}

/// `battles/<id>/private/<uid>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateRecord {
    #[serde(default)]
    pub team: Vec<PrivateMon>,

    #[serde(default)]
    pub choice_lock: ChoiceLock,
}

impl PrivateRecord {
    pub fn new(team: Vec<PrivateMon>) -> Self {
        Self {
            team,
            choice_lock: ChoiceLock::default(),
        }
    }
}
