//! Pokemon state types

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::stats::StatModifiers;
use super::status::{Status, Volatile, VolatileState};

/// Species reference (doesn't change during battle)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Species {
    /// Species name (including forme, e.g., "pikachu-alola")
    pub name: String,
    pub types: Vec<String>,
    /// Possible abilities, first is the default
    pub abilities: Vec<String>,
}

impl Species {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    /// Ability a freshly built Pokemon of this species starts with
    pub fn default_ability(&self) -> &str {
        self.abilities.first().map(String::as_str).unwrap_or("")
    }
}

/// One known move and its remaining PP
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveSlot {
    pub id: String,
    pub pp: u8,
    pub max_pp: u8,
    pub disabled: bool,
}

impl MoveSlot {
    pub fn new(id: impl Into<String>, max_pp: u8) -> Self {
        Self {
            id: id.into(),
            pp: max_pp,
            max_pp,
            disabled: false,
        }
    }

    /// Check if the move can be selected
    pub fn usable(&self) -> bool {
        self.pp > 0 && !self.disabled
    }
}

/// Pokemon state during battle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BattlePokemon {
    pub species: Species,

    /// Level (1-100)
    pub level: u8,

    // === HP ===
    pub current_hp: u32,
    pub max_hp: u32,

    pub moves: Vec<MoveSlot>,

    // === Status ===
    /// Primary ailment
    pub status: Option<Status>,

    /// Turns the current ailment has lasted (sleep counter)
    pub status_turns: Option<u8>,

    /// Active volatile conditions (cleared on switch)
    pub volatile: BTreeMap<Volatile, VolatileState>,

    // === Ability ===
    pub current_ability: String,
    pub original_ability: String,
    pub ability_changed: bool,

    /// Stat stage modifiers (cleared on switch)
    pub stat_modifiers: StatModifiers,
}

impl BattlePokemon {
    /// Create a healthy Pokemon with its species' default ability
    pub fn new(species: Species, level: u8, max_hp: u32) -> Self {
        let ability = species.default_ability().to_string();
        Self {
            species,
            level,
            current_hp: max_hp,
            max_hp,
            moves: Vec::new(),
            status: None,
            status_turns: None,
            volatile: BTreeMap::new(),
            current_ability: ability.clone(),
            original_ability: ability,
            ability_changed: false,
            stat_modifiers: StatModifiers::new(),
        }
    }

    pub fn with_move(mut self, id: impl Into<String>, max_pp: u8) -> Self {
        self.moves.push(MoveSlot::new(id, max_pp));
        self
    }

    /// Get the species name
    pub fn name(&self) -> &str {
        &self.species.name
    }

    /// Check if Pokemon has fainted
    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Check if Pokemon is alive (not fainted)
    pub fn is_alive(&self) -> bool {
        !self.is_fainted()
    }

    /// HP as percentage (0-100)
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        (self.current_hp * 100) / self.max_hp
    }

    /// Apply damage, returns the HP actually lost
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP up to the maximum, returns the HP actually gained
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.current_hp += gained;
        gained
    }

    pub fn find_move(&self, id: &str) -> Option<&MoveSlot> {
        self.moves.iter().find(|m| m.id == id)
    }

    /// Spend one PP of a move, returns false if it cannot be used
    pub fn use_move(&mut self, id: &str) -> bool {
        match self.moves.iter_mut().find(|m| m.id == id) {
            Some(slot) if slot.usable() => {
                slot.pp -= 1;
                true
            }
            _ => false,
        }
    }

    /// Inflict a primary ailment; fails if one is already present
    pub fn set_status(&mut self, status: Status) -> bool {
        if self.status.is_some() || self.is_fainted() {
            return false;
        }
        self.status = Some(status);
        self.status_turns = Some(0);
        true
    }

    pub fn cure_status(&mut self) {
        self.status = None;
        self.status_turns = None;
    }

    /// Check for a volatile condition
    pub fn has_volatile(&self, v: &Volatile) -> bool {
        self.volatile.contains_key(v)
    }

    /// Add a volatile condition
    pub fn add_volatile(&mut self, v: Volatile, state: VolatileState) {
        self.volatile.insert(v, state);
    }

    /// Remove a volatile condition
    pub fn remove_volatile(&mut self, v: &Volatile) -> bool {
        self.volatile.remove(v).is_some()
    }

    /// Replace the current ability (Skill Swap, Worry Seed, ...)
    pub fn set_ability(&mut self, ability: impl Into<String>) {
        self.current_ability = ability.into();
        self.ability_changed = self.current_ability != self.original_ability;
    }

    /// Called when this Pokemon switches out
    pub fn on_switch_out(&mut self) {
        self.stat_modifiers.clear();
        self.volatile.clear();
    }
}
