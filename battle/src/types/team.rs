//! One player's team

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::conditions::{SideCondition, SideConditionState};
use super::pokemon::BattlePokemon;

/// Maximum party size
pub const MAX_TEAM_SIZE: usize = 6;

/// One player's side of the battle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BattleTeam {
    /// Pokemon in party order
    pub pokemon: Vec<BattlePokemon>,

    /// Index of the active Pokemon
    pub current_index: usize,

    pub fainted_count: usize,

    /// Side conditions (hazards, screens, etc.)
    pub side_conditions: BTreeMap<SideCondition, SideConditionState>,
}

impl BattleTeam {
    /// Create a team with the first Pokemon active
    pub fn new(pokemon: Vec<BattlePokemon>) -> Self {
        let mut team = Self {
            pokemon,
            ..Self::default()
        };
        team.recount_fainted();
        team
    }

    /// Get the active Pokemon
    pub fn active(&self) -> Option<&BattlePokemon> {
        self.pokemon.get(self.current_index)
    }

    /// Get the active Pokemon mutably
    pub fn active_mut(&mut self) -> Option<&mut BattlePokemon> {
        self.pokemon.get_mut(self.current_index)
    }

    /// Iterate over bench Pokemon (everything but the active), with party index
    pub fn bench(&self) -> impl Iterator<Item = (usize, &BattlePokemon)> {
        let active = self.current_index;
        self.pokemon
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != active)
    }

    /// Count non-fainted Pokemon
    pub fn alive_count(&self) -> usize {
        self.pokemon.iter().filter(|p| p.is_alive()).count()
    }

    /// Recompute `fainted_count` from the Pokemon themselves
    pub fn recount_fainted(&mut self) -> usize {
        self.fainted_count = self.pokemon.iter().filter(|p| p.is_fainted()).count();
        self.fainted_count
    }

    /// Check if all Pokemon have fainted
    pub fn all_fainted(&self) -> bool {
        !self.pokemon.is_empty() && self.pokemon.iter().all(|p| p.is_fainted())
    }

    /// Check whether a switch to `index` is legal
    pub fn can_switch_to(&self, index: usize) -> bool {
        index != self.current_index && self.pokemon.get(index).is_some_and(|p| p.is_alive())
    }

    /// Switch the active Pokemon, returns false if the target is illegal
    pub fn switch_to(&mut self, index: usize) -> bool {
        if !self.can_switch_to(index) {
            return false;
        }
        if let Some(old) = self.active_mut() {
            old.on_switch_out();
        }
        self.current_index = index;
        true
    }

    /// Find a Pokemon by species name
    pub fn find_pokemon(&self, species: &str) -> Option<usize> {
        self.pokemon.iter().position(|p| p.name() == species)
    }

    /// Check if side has a condition
    pub fn has_condition(&self, cond: SideCondition) -> bool {
        self.side_conditions.contains_key(&cond)
    }

    /// Get layers for a condition (0 if not present)
    pub fn condition_layers(&self, cond: SideCondition) -> u8 {
        self.side_conditions.get(&cond).map_or(0, |s| s.layers)
    }

    /// Add a side condition
    /// Returns true if the condition was added (false if already at max layers)
    pub fn add_condition(&mut self, cond: SideCondition, state: SideConditionState) -> bool {
        if let Some(existing) = self.side_conditions.get_mut(&cond) {
            existing.add_layer(cond)
        } else {
            self.side_conditions.insert(cond, state);
            true
        }
    }

    /// Remove a side condition
    pub fn remove_condition(&mut self, cond: SideCondition) -> bool {
        self.side_conditions.remove(&cond).is_some()
    }
}
