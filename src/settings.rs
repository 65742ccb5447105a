//! Game settings and tuning
//!
//! Loaded from a JSON file named by `DINO_DASH_CONFIG`; every field falls back
//! to its default when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::selection::Skin;
use crate::sim::{RegistryConfig, ScoreRules};

/// Options used only by the headless native driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessSettings {
    pub viewport_width: i32,
    pub viewport_height: i32,
    /// RNG seed; random when unset
    pub seed: Option<u64>,
    /// Ticks to run before exiting
    pub demo_ticks: u64,
    /// Start a new session after game over
    pub auto_restart: bool,
    /// Run ticks as fast as possible instead of at the tick period
    pub unpaced: bool,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            viewport_width: 1920,
            viewport_height: 1080,
            seed: None,
            demo_ticks: 1200,
            auto_restart: true,
            unpaced: false,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Entities ===
    pub player_size: i32,
    pub collectible_size: i32,
    pub hazard_size: i32,
    pub secret_size: i32,
    pub collectible_count: usize,
    pub hazard_count: usize,

    // === Movement ===
    /// Pixels per tick at 1x speed
    pub base_move_step: i32,
    /// Score per extra multiple of base speed
    pub speed_threshold: u64,
    pub max_speed_multiplier: u32,

    // === Scoring ===
    pub reward_increment: u64,
    pub reward_interval: u64,
    pub secret_bonus: u64,
    pub secret_a_threshold: u64,
    pub secret_b_threshold: u64,

    // === Lives ===
    pub starting_lives: u8,
    pub max_lives: u8,

    // === Timing ===
    pub tick_period_ms: u64,
    pub death_message_ticks: u64,

    // === Feedback ===
    pub screen_shake: bool,

    // === Debug ===
    /// Bind the add-points key
    pub debug_keys: bool,
    pub debug_points: u64,

    /// Player character
    pub skin: Skin,

    pub headless: HeadlessSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            collectible_size: COLLECTIBLE_SIZE,
            hazard_size: HAZARD_SIZE,
            secret_size: SECRET_SIZE,
            collectible_count: COLLECTIBLE_COUNT,
            hazard_count: HAZARD_COUNT,

            base_move_step: BASE_MOVE_STEP,
            speed_threshold: SPEED_THRESHOLD,
            max_speed_multiplier: MAX_SPEED_MULTIPLIER,

            reward_increment: REWARD_INCREMENT,
            reward_interval: REWARD_INTERVAL,
            secret_bonus: SECRET_BONUS,
            secret_a_threshold: SECRET_A_THRESHOLD,
            secret_b_threshold: SECRET_B_THRESHOLD,

            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,

            tick_period_ms: TICK_PERIOD_MS,
            death_message_ticks: DEATH_MESSAGE_TICKS,

            screen_shake: true,

            debug_keys: true,
            debug_points: DEBUG_POINTS,

            skin: Skin::default(),

            headless: HeadlessSettings::default(),
        }
    }
}

impl Settings {
    /// Environment variable naming the settings file
    pub const CONFIG_ENV: &'static str = "DINO_DASH_CONFIG";

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            player_size: self.player_size,
            collectible_size: self.collectible_size,
            hazard_size: self.hazard_size,
            secret_size: self.secret_size,
            collectible_count: self.collectible_count,
            hazard_count: self.hazard_count,
            secret_thresholds: [self.secret_a_threshold, self.secret_b_threshold],
        }
    }

    pub fn score_rules(&self) -> ScoreRules {
        ScoreRules {
            reward_increment: self.reward_increment,
            reward_interval: self.reward_interval,
            secret_bonus: self.secret_bonus,
            speed_threshold: self.speed_threshold,
            max_speed_multiplier: self.max_speed_multiplier,
        }
    }

    /// Reject values the core cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("player_size", self.player_size),
            ("collectible_size", self.collectible_size),
            ("hazard_size", self.hazard_size),
            ("secret_size", self.secret_size),
        ];
        for (field, size) in sizes {
            if size <= 0 {
                return Err(invalid(field, format!("must be positive, got {size}")));
            }
        }
        if self.base_move_step <= 0 {
            return Err(invalid("base_move_step", "must be positive".into()));
        }
        if self.speed_threshold == 0 {
            return Err(invalid("speed_threshold", "must be non-zero".into()));
        }
        if self.max_speed_multiplier == 0 {
            return Err(invalid("max_speed_multiplier", "must be at least 1".into()));
        }
        if self.reward_interval == 0 {
            return Err(invalid("reward_interval", "must be non-zero".into()));
        }
        if self.max_lives == 0 {
            return Err(invalid("max_lives", "must be at least 1".into()));
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(invalid(
                "starting_lives",
                format!("must be in 1..={}, got {}", self.max_lives, self.starting_lives),
            ));
        }
        if self.tick_period_ms == 0 {
            return Err(invalid("tick_period_ms", "must be non-zero".into()));
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `DINO_DASH_CONFIG`, falling back to defaults
    pub fn load() -> Self {
        match std::env::var_os(Self::CONFIG_ENV) {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("{}; using default settings", e);
                Self::default()
            }),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.registry_config(), RegistryConfig::default());
        assert_eq!(settings.score_rules(), ScoreRules::default());
        assert_eq!(settings.death_message_ticks, 40);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "starting_lives": 3, "skin": "Scout", "headless": { "seed": 7 } }"#)
                .unwrap();
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.skin, Skin::Scout);
        assert_eq!(settings.headless.seed, Some(7));
        assert_eq!(settings.headless.viewport_width, 1920);
        assert_eq!(settings.collectible_count, 10);
    }

    #[test]
    fn test_rejects_starting_lives_above_max() {
        let err = Settings::from_json(r#"{ "starting_lives": 4, "max_lives": 3 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "starting_lives",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load_from("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
