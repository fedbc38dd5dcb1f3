//! Stat-modifier stages

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// A stat that can carry a modifier stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stat {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
        Stat::Accuracy,
        Stat::Evasion,
    ];
}

/// Stat stages (-6 to +6), one per stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatModifiers {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatModifiers {
    /// Create new modifiers (all at 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get stage for a stat
    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    /// Set stage for a stat (clamped to -6..+6)
    pub fn set(&mut self, stat: Stat, value: i8) {
        let clamped = value.clamp(MIN_STAGE, MAX_STAGE);
        match stat {
            Stat::Attack => self.attack = clamped,
            Stat::Defense => self.defense = clamped,
            Stat::SpecialAttack => self.special_attack = clamped,
            Stat::SpecialDefense => self.special_defense = clamped,
            Stat::Speed => self.speed = clamped,
            Stat::Accuracy => self.accuracy = clamped,
            Stat::Evasion => self.evasion = clamped,
        }
    }

    /// Apply a boost to a stat, returns actual change applied
    pub fn boost(&mut self, stat: Stat, amount: i8) -> i8 {
        let current = self.get(stat);
        let new_value = current.saturating_add(amount).clamp(MIN_STAGE, MAX_STAGE);
        self.set(stat, new_value);
        new_value - current
    }

    /// Clamp every stage into range
    pub fn clamped(mut self) -> Self {
        for stat in Stat::ALL {
            self.set(stat, self.get(stat));
        }
        self
    }

    /// Check that every stage is within -6..+6
    pub fn in_range(&self) -> bool {
        Stat::ALL
            .iter()
            .all(|&s| (MIN_STAGE..=MAX_STAGE).contains(&self.get(s)))
    }

    /// Reset all stages to 0
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check if all stats are at 0
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    /// Get the multiplier for a stat stage (for atk/def/spa/spd/spe)
    /// +1 = 1.5x, +2 = 2x, ..., +6 = 4x
    /// -1 = 0.67x, -2 = 0.5x, ..., -6 = 0.25x
    pub fn multiplier(stage: i8) -> f32 {
        let stage = stage.clamp(MIN_STAGE, MAX_STAGE);
        if stage >= 0 {
            (2 + stage as i32) as f32 / 2.0
        } else {
            2.0 / (2 - stage as i32) as f32
        }
    }

    /// Get the multiplier for accuracy/evasion stages (different formula)
    pub fn accuracy_multiplier(stage: i8) -> f32 {
        let stage = stage.clamp(MIN_STAGE, MAX_STAGE);
        if stage >= 0 {
            (3 + stage as i32) as f32 / 3.0
        } else {
            3.0 / (3 - stage as i32) as f32
        }
    }
}
