//! Arcade settings
//!
//! Stored as JSON. Any field left out falls back to its default, so a file
//! can override just the seed or a single tick period.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arcade::GameKind;
use crate::consts::*;

/// Arcade configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base RNG seed; each session derives its own from this
    pub seed: u64,
    /// Game selected at startup
    pub default_game: GameKind,

    // === Tick periods (seconds) ===
    pub snake_tick_secs: f32,
    pub tetris_tick_secs: f32,
    pub breakout_tick_secs: f32,
    pub asteroids_tick_secs: f32,

    /// Maximum ticks per frame before time is dropped
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            default_game: GameKind::Snake,

            snake_tick_secs: SNAKE_TICK_SECS,
            tetris_tick_secs: TETRIS_TICK_SECS,
            breakout_tick_secs: BREAKOUT_TICK_SECS,
            asteroids_tick_secs: ASTEROIDS_TICK_SECS,

            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Tick period for a game
    pub fn tick_secs(&self, kind: GameKind) -> f32 {
        match kind {
            GameKind::Snake => self.snake_tick_secs,
            GameKind::Tetris => self.tetris_tick_secs,
            GameKind::BrickBreaker => self.breakout_tick_secs,
            GameKind::Asteroids => self.asteroids_tick_secs,
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Can't read settings {}: {}", path.display(), e);
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}", path.display(), e);
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
