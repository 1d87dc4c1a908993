use std::env;
use std::fmt::Display;
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "scroller.json";
pub const SEED_ENV_VAR: &str = "SCROLLER_SEED";

/// Tunables for one simulation run. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Generator seed; `None` draws from entropy.
    pub seed: Option<u64>,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub level_complete_x: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            spawn_x: 100.0,
            spawn_y: 200.0,
            level_complete_x: 3000.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config json: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("parse config json at {field_path}: {source}")]
    ParseAt {
        field_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {field_path}: expected {expected}, got {actual}")]
    Invalid {
        field_path: &'static str,
        expected: &'static str,
        actual: String,
    },
    #[error("invalid {var} value '{value}': {source}")]
    EnvOverride {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("spawn_x", self.spawn_x)?;
        check_finite("spawn_y", self.spawn_y)?;
        check_finite("level_complete_x", self.level_complete_x)?;
        check_positive("viewport_width", self.viewport_width)?;
        check_positive("viewport_height", self.viewport_height)?;
        if self.level_complete_x <= self.spawn_x {
            return Err(invalid(
                "level_complete_x",
                "value greater than spawn_x",
                self.level_complete_x,
            ));
        }
        Ok(())
    }

    /// Applies `SCROLLER_SEED` through `lookup`, so callers and tests can
    /// supply their own environment.
    pub fn with_seed_override(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(SEED_ENV_VAR) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|source| ConfigError::EnvOverride {
                    var: SEED_ENV_VAR,
                    value: value.clone(),
                    source,
                })?;
            self.seed = Some(seed);
        }
        Ok(self)
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_seed_override(|var| env::var(var).ok())
    }
}

pub fn parse_sim_config(raw: &str) -> Result<SimConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = match serde_path_to_error::deserialize::<_, SimConfig>(&mut deserializer) {
        Ok(config) => config,
        Err(error) => {
            let field_path = error.path().to_string();
            let source = error.into_inner();
            return if field_path.is_empty() || field_path == "." {
                Err(ConfigError::Parse { source })
            } else {
                Err(ConfigError::ParseAt { field_path, source })
            };
        }
    };
    config.validate()?;
    Ok(config)
}

/// Reads the config file at `path`. A missing file yields the defaults.
pub fn load_sim_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "sim_config_missing_using_defaults");
            return Ok(SimConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_sim_config(&raw)
}

fn check_finite(field_path: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field_path, "finite number", value))
    }
}

fn check_positive(field_path: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field_path, "positive finite number", value))
    }
}

fn invalid(field_path: &'static str, expected: &'static str, actual: impl Display) -> ConfigError {
    ConfigError::Invalid {
        field_path,
        expected,
        actual: actual.to_string(),
    }
}
