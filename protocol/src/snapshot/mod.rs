mod meta;
mod private;
mod public;
mod tests;
mod turns;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

pub use meta::{Meta, PlayerRef, Players, Slot, WirePhase};
pub use private::{ChoiceLock, MoveRecord, PrivateMon, PrivateRecord, SpeciesRef, VolatileRecord};
pub use public::{
    BenchPublic, Boosts, FieldRecord, HpPair, PublicActive, PublicSide, PublicState,
    SideConditionRecord, StatusCode,
};
pub use turns::{Choice, ChoiceAction, ChoicePayload, Resolution, TurnRecord};

/// A whole battle document as read from the store
///
/// Every partition is optional on the wire: replication may deliver `meta`
/// before `public`, or a private record may not be readable yet. Consumers
/// decide what they require.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub meta: Option<Meta>,

    #[serde(default)]
    pub public: Option<PublicState>,

    /// Private records keyed by user id
    #[serde(default)]
    pub private: BTreeMap<String, PrivateRecord>,

    /// Turn records keyed by turn number
    #[serde(default)]
    pub turns: BTreeMap<u32, TurnRecord>,
}

impl Snapshot {
    /// Parse a snapshot from its JSON document
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a snapshot from an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to the JSON document stored remotely
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn version(&self) -> u64 {
        self.meta.as_ref().map_or(0, |m| m.version)
    }

    pub fn current_turn(&self) -> u32 {
        self.meta.as_ref().map_or(0, |m| m.turn)
    }

    /// Record for the turn currently being played
    pub fn current_turn_record(&self) -> Option<&TurnRecord> {
        self.turns.get(&self.current_turn())
    }

    /// Choices submitted for the current turn, keyed by user id
    pub fn current_choices(&self) -> Option<&BTreeMap<String, Choice>> {
        self.current_turn_record().map(|t| &t.choices)
    }

    /// Get or lazily create the record for a turn
    pub fn turn_entry(&mut self, turn: u32) -> &mut TurnRecord {
        self.turns.entry(turn).or_default()
    }
}
