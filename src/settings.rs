//! Simulation settings
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on a single tick's delta (seconds)
    pub max_delta: f32,
    /// Pause between a cleared stage and the next one (seconds)
    pub stage_transition_pause: f32,

    // === Player ===
    pub player_max_speed: f32,
    pub player_shots_per_second: f32,
    pub player_braking_force: f32,
    pub player_max_health: u32,

    /// Seed for destructible-projectile draws
    pub seed: u64,

    /// Simulated seconds for the headless runner
    pub demo_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_delta: consts::MAX_DELTA,
            stage_transition_pause: consts::STAGE_TRANSITION_PAUSE,

            player_max_speed: consts::PLAYER_MAX_SPEED,
            player_shots_per_second: consts::PLAYER_SHOTS_PER_SECOND,
            player_braking_force: consts::PLAYER_BRAKING_FORCE,
            player_max_health: consts::PLAYER_MAX_HEALTH,

            seed: 0x5eed,

            demo_seconds: 120.0,
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("max_delta", self.max_delta)?;
        positive("player_max_speed", self.player_max_speed)?;
        positive("player_shots_per_second", self.player_shots_per_second)?;
        positive("player_braking_force", self.player_braking_force)?;
        positive("demo_seconds", self.demo_seconds)?;

        if !self.stage_transition_pause.is_finite() || self.stage_transition_pause < 0.0 {
            return Err(SettingsError::Invalid {
                field: "stage_transition_pause",
                reason: format!("must not be negative, got {}", self.stage_transition_pause),
            });
        }
        if self.player_max_health == 0 {
            return Err(SettingsError::Invalid {
                field: "player_max_health",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}
