//! Configuration loading — TOML file with environment variable overrides.
//!
//! Reads `haulplan.toml` from the working directory unless another path is
//! given. Every field has a default so the file is optional. Environment
//! variables take precedence over file values.

use std::path::Path;

use haulplan_domain::error::HaulPlanError;
use haulplan_domain::limits::RegulatoryLimits;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Driving and rest limits applied to every evaluation.
    pub limits: RegulatoryLimits,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed,
    /// or if a limit ends up zero.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let minutes = |key: &str, slot: &mut u32| {
            if let Some(value) = var(key).and_then(|val| val.trim().parse().ok()) {
                *slot = value;
            }
        };
        minutes(
            "HAULPLAN_SHORT_BREAK_MINUTES",
            &mut self.limits.short_break_minutes,
        );
        minutes(
            "HAULPLAN_LONG_BREAK_MINUTES",
            &mut self.limits.long_break_minutes,
        );
        minutes(
            "HAULPLAN_MAX_CONTINUOUS_MINUTES",
            &mut self.limits.max_continuous_driving_minutes,
        );
        minutes(
            "HAULPLAN_MAX_DAILY_MINUTES",
            &mut self.limits.max_daily_driving_minutes,
        );
        minutes(
            "HAULPLAN_DAILY_REST_MINUTES",
            &mut self.limits.daily_rest_minutes,
        );

        if let Some(val) = var("HAULPLAN_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate().map_err(|err| match err {
            HaulPlanError::Validation(inner) => ConfigError::Validation(inner.to_string()),
            other => ConfigError::Validation(other.to_string()),
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "haulplan=info,haulplan_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
