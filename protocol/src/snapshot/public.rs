//! `battles/<id>/public`: the projection both players are allowed to read.
//!
//! These types deliberately have no room for hidden data. A bench entry can
//! only say which species sits there, whether it fainted and which moves it
//! has already shown; full stats, unrevealed moves and abilities exist only
//! in [`super::PrivateMon`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::meta::Slot;

/// Status codes shown in the public projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "PAR")]
    Par,
    #[serde(rename = "PSN")]
    Psn,
    #[serde(rename = "BRN")]
    Brn,
    #[serde(rename = "FRZ")]
    Frz,
    #[serde(rename = "SLP")]
    Slp,
    /// Confusion; written for display, never read back as a primary ailment
    #[serde(rename = "CNF")]
    Cnf,
}

impl StatusCode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PAR" => Some(StatusCode::Par),
            "PSN" => Some(StatusCode::Psn),
            "BRN" => Some(StatusCode::Brn),
            "FRZ" => Some(StatusCode::Frz),
            "SLP" => Some(StatusCode::Slp),
            "CNF" => Some(StatusCode::Cnf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Par => "PAR",
            StatusCode::Psn => "PSN",
            StatusCode::Brn => "BRN",
            StatusCode::Frz => "FRZ",
            StatusCode::Slp => "SLP",
            StatusCode::Cnf => "CNF",
        }
    }
}

/// Current and maximum HP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpPair {
    pub cur: u32,
    pub max: u32,
}

/// Stat stages as published, keyed by their short names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boosts {
    #[serde(default)]
    pub atk: i8,
    #[serde(default)]
    pub def: i8,
    #[serde(default)]
    pub spa: i8,
    #[serde(default)]
    pub spd: i8,
    #[serde(default)]
    pub spe: i8,
    #[serde(default)]
    pub acc: i8,
    #[serde(default)]
    pub eva: i8,
}

/// The active Pokemon as the opponent sees it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicActive {
    #[serde(default)]
    pub species: String,

    #[serde(default)]
    pub level: u8,

    pub hp: HpPair,

    #[serde(default)]
    pub status: Option<StatusCode>,

    #[serde(default)]
    pub boosts: Boosts,

    /// Moves this Pokemon has used in front of the opponent
    #[serde(default)]
    pub revealed_moves: Vec<String>,
}

/// A benched Pokemon as the opponent sees it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchPublic {
    pub species: String,

    #[serde(default)]
    pub fainted: bool,

    #[serde(default)]
    pub revealed_moves: Vec<String>,
}

/// Remaining duration and layers of a side condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConditionRecord {
    #[serde(default)]
    pub turns: Option<u8>,

    #[serde(default)]
    pub layers: u8,
}

/// One side of the public projection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSide {
    pub active: PublicActive,

    #[serde(default)]
    pub bench_public: Vec<BenchPublic>,

    /// Hazards, screens and the like, keyed by condition id ("stealth-rock")
    #[serde(default)]
    pub side_conditions: BTreeMap<String, SideConditionRecord>,
}

impl PublicSide {
    /// Species and revealed moves of the member at a persisted position
    ///
    /// Position 0 is the active Pokemon, the rest index `bench_public`.
    /// Two members may share a species, so lookups go by position.
    pub fn member_at(&self, position: usize) -> Option<(&str, &[String])> {
        match position {
            0 => Some((
                self.active.species.as_str(),
                self.active.revealed_moves.as_slice(),
            )),
            n => self
                .bench_public
                .get(n - 1)
                .map(|b| (b.species.as_str(), b.revealed_moves.as_slice())),
        }
    }
}

/// Shared battlefield conditions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    #[serde(default)]
    pub weather: Option<String>,

    #[serde(default)]
    pub weather_turns: Option<u8>,

    #[serde(default)]
    pub terrain: Option<String>,

    #[serde(default)]
    pub terrain_turns: Option<u8>,

    #[serde(default)]
    pub trick_room_turns: u8,
}

/// `battles/<id>/public`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    #[serde(default)]
    pub p1: Option<PublicSide>,

    #[serde(default)]
    pub p2: Option<PublicSide>,

    #[serde(default)]
    pub field: FieldRecord,
}

impl PublicState {
    pub fn side(&self, slot: Slot) -> Option<&PublicSide> {
        match slot {
            Slot::P1 => self.p1.as_ref(),
            Slot::P2 => self.p2.as_ref(),
        }
    }

    pub fn side_mut(&mut self, slot: Slot) -> &mut Option<PublicSide> {
        match slot {
            Slot::P1 => &mut self.p1,
            Slot::P2 => &mut self.p2,
        }
    }
}
