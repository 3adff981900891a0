//! Runtime configuration.
//!
//! Unlike the engine's internal event model, configuration is cold path:
//! it is read once at startup, so it is plain `serde`-derived structs
//! loaded from a JSON file rather than anything that needs to be const or
//! cache-aligned. Environment variables with an `ENGINE_` prefix override
//! individual fields after the file is loaded, the same override order a
//! TOML-plus-env setup would use.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::portfolio::RiskLimits;

/// Top-level runtime configuration for a dispatcher run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Symbol universe, in the order the portfolio manager should index them.
    pub symbols: Vec<String>,
    pub starting_cash: f64,
    pub risk: RiskLimits,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_ledger_capacity")]
    pub ledger_capacity: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_queue_capacity() -> usize {
    65_536
}

fn default_ledger_capacity() -> usize {
    4_096
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            starting_cash: 0.0,
            risk: RiskLimits::default(),
            queue_capacity: default_queue_capacity(),
            ledger_capacity: default_ledger_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file, then apply `ENGINE_*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables override individual scalar fields so an
    /// operator doesn't need to edit the file to change a single knob.
    fn apply_env_overrides(&mut self) {
        if let Ok(cash) = std::env::var("ENGINE_STARTING_CASH") {
            if let Ok(parsed) = cash.parse() {
                self.starting_cash = parsed;
            }
        }
        if let Ok(level) = std::env::var("ENGINE_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("config must name at least one symbol");
        }
        if !(self.starting_cash >= 0.0) || !self.starting_cash.is_finite() {
            anyhow::bail!("starting_cash must be non-negative and finite");
        }
        if self.queue_capacity == 0 {
            anyhow::bail!("queue_capacity must be non-zero");
        }
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            anyhow::bail!("invalid log level '{}', must be one of {:?}", self.log_level, valid_log_levels);
        }
        Ok(())
    }
}
