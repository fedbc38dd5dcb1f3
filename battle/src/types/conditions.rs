//! Field and side conditions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn normalize(s: &str) -> String {
    let clean = s.strip_prefix("move: ").unwrap_or(s);
    clean.to_lowercase().replace([' ', '-', '_'], "")
}

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Hail,
    Snow,
    HarshSun,
    HeavyRain,
    StrongWinds,
}

impl Weather {
    /// Parse a stored weather id, accepting display and move names as well
    pub fn from_protocol(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "sunnyday" | "sun" => Some(Weather::Sun),
            "raindance" | "rain" => Some(Weather::Rain),
            "sandstorm" | "sand" => Some(Weather::Sand),
            "hail" => Some(Weather::Hail),
            "snow" | "snowscape" => Some(Weather::Snow),
            "desolateland" | "harshsun" => Some(Weather::HarshSun),
            "primordialsea" | "heavyrain" => Some(Weather::HeavyRain),
            "deltastream" | "strongwinds" => Some(Weather::StrongWinds),
            _ => None,
        }
    }

    /// Canonical stored id
    pub fn to_protocol(&self) -> &'static str {
        match self {
            Weather::Sun => "sun",
            Weather::Rain => "rain",
            Weather::Sand => "sandstorm",
            Weather::Hail => "hail",
            Weather::Snow => "snow",
            Weather::HarshSun => "harsh-sun",
            Weather::HeavyRain => "heavy-rain",
            Weather::StrongWinds => "strong-winds",
        }
    }

    /// Primal weather ignores the turn counter
    pub fn is_primal(&self) -> bool {
        matches!(
            self,
            Weather::HarshSun | Weather::HeavyRain | Weather::StrongWinds
        )
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_protocol())
    }
}

/// Terrain conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl Terrain {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "electricterrain" | "electric" => Some(Terrain::Electric),
            "grassyterrain" | "grassy" => Some(Terrain::Grassy),
            "mistyterrain" | "misty" => Some(Terrain::Misty),
            "psychicterrain" | "psychic" => Some(Terrain::Psychic),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            Terrain::Electric => "electric",
            Terrain::Grassy => "grassy",
            Terrain::Misty => "misty",
            Terrain::Psychic => "psychic",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_protocol())
    }
}

/// Side conditions (hazards, screens, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SideCondition {
    // Screens
    Reflect,
    LightScreen,
    AuroraVeil,

    // Entry hazards
    Spikes,      // Stackable 1-3
    ToxicSpikes, // Stackable 1-2
    StealthRock,
    StickyWeb,

    // Other
    Tailwind,
    Safeguard,
    Mist,
}

impl SideCondition {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "reflect" => Some(SideCondition::Reflect),
            "lightscreen" => Some(SideCondition::LightScreen),
            "auroraveil" => Some(SideCondition::AuroraVeil),
            "spikes" => Some(SideCondition::Spikes),
            "toxicspikes" => Some(SideCondition::ToxicSpikes),
            "stealthrock" => Some(SideCondition::StealthRock),
            "stickyweb" => Some(SideCondition::StickyWeb),
            "tailwind" => Some(SideCondition::Tailwind),
            "safeguard" => Some(SideCondition::Safeguard),
            "mist" => Some(SideCondition::Mist),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            SideCondition::Reflect => "reflect",
            SideCondition::LightScreen => "light-screen",
            SideCondition::AuroraVeil => "aurora-veil",
            SideCondition::Spikes => "spikes",
            SideCondition::ToxicSpikes => "toxic-spikes",
            SideCondition::StealthRock => "stealth-rock",
            SideCondition::StickyWeb => "sticky-web",
            SideCondition::Tailwind => "tailwind",
            SideCondition::Safeguard => "safeguard",
            SideCondition::Mist => "mist",
        }
    }

    /// Get maximum layers for this condition
    pub fn max_layers(&self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }

    /// Check if this is an entry hazard
    pub fn is_hazard(&self) -> bool {
        matches!(
            self,
            SideCondition::Spikes
                | SideCondition::ToxicSpikes
                | SideCondition::StealthRock
                | SideCondition::StickyWeb
        )
    }
}

impl std::fmt::Display for SideCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_protocol())
    }
}

/// Remaining duration and layer count of a side condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideConditionState {
    /// `None` for conditions that last until removed (hazards)
    pub turns: Option<u8>,
    pub layers: u8,
}

impl Default for SideConditionState {
    fn default() -> Self {
        Self {
            turns: None,
            layers: 1,
        }
    }
}

impl SideConditionState {
    /// A single-layer condition lasting `turns` turns
    pub fn for_turns(turns: u8) -> Self {
        Self {
            turns: Some(turns),
            layers: 1,
        }
    }

    /// Add a layer, returns true if successful
    pub fn add_layer(&mut self, condition: SideCondition) -> bool {
        if self.layers < condition.max_layers() {
            self.layers += 1;
            true
        } else {
            false
        }
    }
}
