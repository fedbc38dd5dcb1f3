//! Status conditions (volatile and non-volatile)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Primary ailment (at most one per Pokemon, persists through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    Paralyzed,
    Poisoned,
    Burned,
    Frozen,
    Asleep,
    /// Engines that predate volatile confusion report it here. It is
    /// published as `CNF` but never read back as a primary ailment.
    Confused,
}

impl Status {
    /// Whether this is one of the mutually exclusive primary ailments
    pub fn is_primary(&self) -> bool {
        !matches!(self, Status::Confused)
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Paralyzed => "paralyzed",
            Status::Poisoned => "poisoned",
            Status::Burned => "burned",
            Status::Frozen => "frozen",
            Status::Asleep => "asleep",
            Status::Confused => "confused",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Volatile conditions (cleared on switching, may coexist with a status)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Volatile {
    // Mental effects
    Confusion,
    Taunt,
    Encore,
    Disable,
    Infatuation, // Attract

    // Turn-based states
    Flinch,
    Yawn,
    Recharging,
    Charging,

    // Protection
    Protect,
    Endure,
    Substitute,

    // Damage over time
    LeechSeed,
    PerishSong,

    // Movement restriction
    Trapped,
    PartialTrap,

    /// Locked into one move by a Choice item
    ChoiceLock,

    /// Unknown volatile, kept verbatim
    Other(String),
}

impl Volatile {
    /// Parse from a stored condition id
    pub fn from_protocol(s: &str) -> Self {
        let clean = s
            .strip_prefix("move: ")
            .or_else(|| s.strip_prefix("ability: "))
            .unwrap_or(s);

        // Normalize: lowercase and remove spaces, dashes, apostrophes
        let normalized = clean.to_lowercase().replace([' ', '-', '\''], "");

        match normalized.as_str() {
            "confusion" | "confused" => Volatile::Confusion,
            "taunt" => Volatile::Taunt,
            "encore" => Volatile::Encore,
            "disable" | "disabled" => Volatile::Disable,
            "attract" | "infatuation" => Volatile::Infatuation,

            "flinch" | "flinched" => Volatile::Flinch,
            "yawn" => Volatile::Yawn,
            "mustrecharge" | "recharging" => Volatile::Recharging,
            "twoturnmove" | "charging" => Volatile::Charging,

            "protect" | "detect" | "kingsshield" | "spikyshield" | "banefulbunker" => {
                Volatile::Protect
            }
            "endure" => Volatile::Endure,
            "substitute" => Volatile::Substitute,

            "leechseed" => Volatile::LeechSeed,
            "perishsong" => Volatile::PerishSong,

            "trapped" | "meanlook" | "block" => Volatile::Trapped,
            "partialtrap" | "bind" | "wrap" | "firespin" | "whirlpool" => Volatile::PartialTrap,

            "choicelock" => Volatile::ChoiceLock,

            _ => Volatile::Other(s.to_string()),
        }
    }

    /// Canonical id written back to the store
    pub fn to_protocol(&self) -> &str {
        match self {
            Volatile::Confusion => "confusion",
            Volatile::Taunt => "taunt",
            Volatile::Encore => "encore",
            Volatile::Disable => "disable",
            Volatile::Infatuation => "attract",
            Volatile::Flinch => "flinch",
            Volatile::Yawn => "yawn",
            Volatile::Recharging => "mustrecharge",
            Volatile::Charging => "twoturnmove",
            Volatile::Protect => "protect",
            Volatile::Endure => "endure",
            Volatile::Substitute => "substitute",
            Volatile::LeechSeed => "leechseed",
            Volatile::PerishSong => "perishsong",
            Volatile::Trapped => "trapped",
            Volatile::PartialTrap => "partialtrap",
            Volatile::ChoiceLock => "choicelock",
            Volatile::Other(s) => s.as_str(),
        }
    }

    /// Check if this is a known volatile (not Other)
    pub fn is_known(&self) -> bool {
        !matches!(self, Volatile::Other(_))
    }
}

impl std::fmt::Display for Volatile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_protocol())
    }
}

/// Counters attached to an active volatile condition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolatileState {
    /// Turns remaining, for conditions that expire
    pub turns: Option<u8>,

    /// Consecutive-use counter
    pub counter: Option<u8>,

    /// Move or effect that caused the condition
    pub source: Option<String>,
}

impl VolatileState {
    pub fn for_turns(turns: u8) -> Self {
        Self {
            turns: Some(turns),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confused_is_not_primary() {
        assert!(Status::Paralyzed.is_primary());
        assert!(Status::Asleep.is_primary());
        assert!(!Status::Confused.is_primary());
    }

    #[test]
    fn test_volatile_from_protocol_basic() {
        assert_eq!(Volatile::from_protocol("confusion"), Volatile::Confusion);
        assert_eq!(Volatile::from_protocol("Confusion"), Volatile::Confusion);
        assert_eq!(Volatile::from_protocol("taunt"), Volatile::Taunt);
        assert_eq!(Volatile::from_protocol("substitute"), Volatile::Substitute);
    }

    #[test]
    fn test_volatile_from_protocol_with_prefix() {
        assert_eq!(Volatile::from_protocol("move: Taunt"), Volatile::Taunt);
        assert_eq!(Volatile::from_protocol("move: Leech Seed"), Volatile::LeechSeed);
    }

    #[test]
    fn test_volatile_protocol_ids_round_trip() {
        for v in [
            Volatile::Confusion,
            Volatile::Infatuation,
            Volatile::Recharging,
            Volatile::Charging,
            Volatile::PerishSong,
            Volatile::ChoiceLock,
        ] {
            assert_eq!(Volatile::from_protocol(v.to_protocol()), v);
        }
    }

    #[test]
    fn test_volatile_unknown_is_kept_verbatim() {
        let v = Volatile::from_protocol("Salt Cure");
        assert_eq!(v, Volatile::Other("Salt Cure".to_string()));
        assert_eq!(v.to_protocol(), "Salt Cure");
        assert!(!v.is_known());
    }

    #[test]
    fn test_volatile_protect_variants() {
        assert_eq!(Volatile::from_protocol("protect"), Volatile::Protect);
        assert_eq!(Volatile::from_protocol("detect"), Volatile::Protect);
        assert_eq!(Volatile::from_protocol("King's Shield"), Volatile::Protect);
    }
}
