//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::scoring::weights::ScoringWeights;
use crate::{AppError, Result};

/// Simulated customer reply settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Whether sends schedule a simulated reply.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delay between an outbound message and its reply.
    #[serde(default = "default_reply_delay_seconds")]
    pub reply_delay_seconds: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            reply_delay_seconds: default_reply_delay_seconds(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reply_delay_seconds() -> u64 {
    15
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Default lead seed file, used when the CLI gives none.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
    /// Score weights.
    #[serde(default)]
    pub scoring: ScoringWeights,
    /// Reply simulation.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// A relative `seed_path` is resolved against the config file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        let mut config = Self::from_toml_str(&raw)?;

        if let (Some(seed), Some(dir)) = (&config.seed_path, path.parent()) {
            if seed.is_relative() {
                config.seed_path = Some(dir.join(seed));
            }
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Delay between an outbound message and its simulated reply.
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_secs(self.simulation.reply_delay_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.simulation.reply_delay_seconds == 0 {
            return Err(AppError::Config(
                "simulation.reply_delay_seconds must be greater than zero".into(),
            ));
        }
        self.scoring.validate()
    }
}
