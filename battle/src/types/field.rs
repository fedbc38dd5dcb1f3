//! Global field state

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::conditions::{Terrain, Weather};

/// Global field state affecting all Pokemon
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldState {
    /// Current weather condition
    pub weather: Option<Weather>,

    /// Turns of weather left, `None` for indefinite weather
    pub weather_turns: Option<u8>,

    /// Current terrain
    pub terrain: Option<Terrain>,

    pub terrain_turns: Option<u8>,

    /// Turns of Trick Room left (0 = inactive)
    pub trick_room_turns: u8,
}

impl FieldState {
    /// Create a new empty field state
    pub fn new() -> Self {
        Self::default()
    }

    /// Trick Room active (slower Pokemon move first)
    pub fn trick_room(&self) -> bool {
        self.trick_room_turns > 0
    }

    /// Set weather for a number of turns
    pub fn set_weather(&mut self, weather: Weather, turns: Option<u8>) {
        self.weather = Some(weather);
        self.weather_turns = turns;
    }

    /// Clear weather
    pub fn clear_weather(&mut self) {
        self.weather = None;
        self.weather_turns = None;
    }

    pub fn set_terrain(&mut self, terrain: Terrain, turns: Option<u8>) {
        self.terrain = Some(terrain);
        self.terrain_turns = turns;
    }

    pub fn clear_terrain(&mut self) {
        self.terrain = None;
        self.terrain_turns = None;
    }

    /// Count down every timed condition by one turn, clearing expired ones
    pub fn tick(&mut self) {
        if let Some(turns) = self.weather_turns {
            if turns <= 1 {
                self.clear_weather();
            } else {
                self.weather_turns = Some(turns - 1);
            }
        }
        if let Some(turns) = self.terrain_turns {
            if turns <= 1 {
                self.clear_terrain();
            } else {
                self.terrain_turns = Some(turns - 1);
            }
        }
        self.trick_room_turns = self.trick_room_turns.saturating_sub(1);
    }
}
