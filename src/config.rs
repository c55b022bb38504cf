//! Per-run configuration.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::player::PlayerClass;
use crate::profile::Upgrades;

/// Dungeon mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Normal,
    /// Deeper dungeon with scaled difficulty
    Gauntlet,
}

impl GameMode {
    /// Depth whose floor holds the Overlord and no stairs.
    pub fn final_depth(&self) -> u32 {
        match self {
            GameMode::Normal => NORMAL_FINAL_DEPTH,
            GameMode::Gauntlet => GAUNTLET_FINAL_DEPTH,
        }
    }

    /// Depth used for difficulty scaling.
    pub fn effective_depth(&self, depth: u32) -> f32 {
        match self {
            GameMode::Normal => depth as f32,
            GameMode::Gauntlet => depth as f32 * GAUNTLET_DEPTH_SCALE,
        }
    }

    pub fn enemy_room_chance(&self) -> f64 {
        match self {
            GameMode::Normal => ENEMY_ROOM_CHANCE,
            GameMode::Gauntlet => GAUNTLET_ENEMY_ROOM_CHANCE,
        }
    }
}

/// Everything needed to start a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub class: PlayerClass,
    pub mode: GameMode,
    /// Start on the scripted tutorial floor instead of depth 1
    pub tutorial: bool,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
    /// Permanent upgrades bought with void essence
    pub upgrades: Upgrades,
    pub cosmetic: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            class: PlayerClass::Warrior,
            mode: GameMode::Normal,
            tutorial: false,
            seed: None,
            upgrades: Upgrades::default(),
            cosmetic: "default".to_string(),
        }
    }
}

impl RunConfig {
    pub fn new(class: PlayerClass, mode: GameMode) -> Self {
        Self {
            class,
            mode,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tutorial(class: PlayerClass) -> Self {
        Self {
            class,
            tutorial: true,
            ..Self::default()
        }
    }
}
