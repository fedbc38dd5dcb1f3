//! `battles/<id>/turns/<n>`: choices submitted for a turn and its outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a player wants to do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceAction {
    Move,
    Switch,
    Forfeit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicePayload {
    #[serde(default)]
    pub move_id: Option<String>,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub switch_to_index: Option<usize>,
}

/// A submitted choice (`turns/<n>/choices/<uid>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub action: ChoiceAction,

    #[serde(default)]
    pub payload: ChoicePayload,

    /// `meta.version` the client saw when choosing
    #[serde(default)]
    pub client_version: u64,
}

impl Choice {
    pub fn use_move(move_id: impl Into<String>) -> Self {
        Self {
            action: ChoiceAction::Move,
            payload: ChoicePayload {
                move_id: Some(move_id.into()),
                ..ChoicePayload::default()
            },
            client_version: 0,
        }
    }

    pub fn switch_to(index: usize) -> Self {
        Self {
            action: ChoiceAction::Switch,
            payload: ChoicePayload {
                switch_to_index: Some(index),
                ..ChoicePayload::default()
            },
            client_version: 0,
        }
    }

    pub fn forfeit() -> Self {
        Self {
            action: ChoiceAction::Forfeit,
            payload: ChoicePayload::default(),
            client_version: 0,
        }
    }

    /// Check the payload carries what the action needs
    pub fn is_well_formed(&self) -> bool {
        match self.action {
            ChoiceAction::Move => self.payload.move_id.as_deref().is_some_and(|m| !m.is_empty()),
            ChoiceAction::Switch => self.payload.switch_to_index.is_some(),
            ChoiceAction::Forfeit => true,
        }
    }
}

/// A committed turn outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub log: Vec<String>,

    #[serde(default)]
    pub winner: Option<String>,
}

/// `battles/<id>/turns/<n>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Choices keyed by user id
    #[serde(default)]
    pub choices: BTreeMap<String, Choice>,

    #[serde(default)]
    pub resolution: Option<Resolution>,
}

impl TurnRecord {
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }
}
