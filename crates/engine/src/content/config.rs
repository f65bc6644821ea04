use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frames available in the health bar sprite strip (0..=8).
pub const HEALTH_BAR_FRAMES: u32 = 9;

/// Gameplay tunables. Every field has a default, so a config file only needs
/// to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Pixels per second.
    pub player_speed: f64,
    /// Pixels per second; doubled and reversed while the shield is up.
    pub guard_speed: f64,
    /// Duration of each fade phase.
    pub fade_half_seconds: f64,
    pub coral_cooldown_seconds: f64,
    /// Shield window after a pearl is activated.
    pub pearl_cooldown_seconds: f64,
    pub max_health: u32,
    pub starting_health: u32,
    pub max_pearls: u32,
    pub fps_report_interval_seconds: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_speed: 90.0,
            guard_speed: 30.0,
            fade_half_seconds: 0.3,
            coral_cooldown_seconds: 1.5,
            pearl_cooldown_seconds: 3.0,
            max_health: 8,
            starting_health: 5,
            max_pearls: 5,
            fps_report_interval_seconds: 10.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameConfig {
    /// Loads the config at `path`, or the defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json_str(&raw).map_err(|error| match error {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Self = serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
            ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("player_speed", self.player_speed),
            ("guard_speed", self.guard_speed),
            ("fade_half_seconds", self.fade_half_seconds),
            ("coral_cooldown_seconds", self.coral_cooldown_seconds),
            ("pearl_cooldown_seconds", self.pearl_cooldown_seconds),
            ("fps_report_interval_seconds", self.fps_report_interval_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive finite number, got {value}"),
                });
            }
        }
        if self.max_health == 0 || self.max_health >= HEALTH_BAR_FRAMES {
            return Err(ConfigError::Invalid {
                field: "max_health",
                reason: format!(
                    "must be in 1..={}, got {}",
                    HEALTH_BAR_FRAMES - 1,
                    self.max_health
                ),
            });
        }
        if self.starting_health == 0 || self.starting_health > self.max_health {
            return Err(ConfigError::Invalid {
                field: "starting_health",
                reason: format!(
                    "must be in 1..={}, got {}",
                    self.max_health, self.starting_health
                ),
            });
        }
        if self.max_pearls == 0 {
            return Err(ConfigError::Invalid {
                field: "max_pearls",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
