//! Driver configuration loaded from TOML.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::strategy::StrategyKind;
use crate::wait::WaitStrategy;

/// Settings for the producer/consumer stress driver
///
/// Every field has a default, so an empty file is a valid configuration. The defaults
/// reproduce the reference scenario: payload `"Sample text"`, auxiliary value `2014`,
/// 10,000 runs.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HandoffConfig {
    /// Strategies to exercise, in order
    #[serde(default = "defaults::strategies")]
    pub strategies: Vec<StrategyKind>,
    #[serde(default)]
    pub wait: WaitStrategy,
    #[serde(default = "defaults::runs")]
    pub runs: usize,
    /// Upper bound of the random spin delay applied to each side before it acts
    #[serde(default = "defaults::max_spin")]
    pub max_spin: u32,
    #[serde(default = "defaults::payload")]
    pub payload: String,
    #[serde(default = "defaults::auxiliary")]
    pub auxiliary: i64,
    /// Per-run bound on the consumer's poll loop, in milliseconds
    #[serde(default = "defaults::timeout_ms")]
    pub timeout_ms: u64,
    /// Fixed seed for the delay generator; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

mod defaults {
    use crate::strategy::StrategyKind;

    pub fn strategies() -> Vec<StrategyKind> {
        StrategyKind::ALL.to_vec()
    }

    pub fn runs() -> usize {
        10_000
    }

    pub fn max_spin() -> u32 {
        2_048
    }

    pub fn payload() -> String {
        "Sample text".into()
    }

    pub fn auxiliary() -> i64 {
        2014
    }

    pub fn timeout_ms() -> u64 {
        5_000
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            strategies: defaults::strategies(),
            wait: WaitStrategy::default(),
            runs: defaults::runs(),
            max_spin: defaults::max_spin(),
            payload: defaults::payload(),
            auxiliary: defaults::auxiliary(),
            timeout_ms: defaults::timeout_ms(),
            seed: None,
            log_level: defaults::log_level(),
        }
    }
}

impl HandoffConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&toml_to_str)
    }

    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: HandoffConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid("at least one strategy is required"));
        }
        if self.runs == 0 {
            return Err(ConfigError::Invalid("runs must be positive"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
