//! Configuration loaded from TOML.

use crate::calculator::DEFAULT_RISK_FREE_RATE;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Calculation and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Annual risk-free rate for the Sharpe ratio
    pub risk_free_rate: f64,
    /// Cost of the hedging instrument, used for the hedging cost ratio
    pub hedging_tool_cost: Option<f64>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            hedging_tool_cost: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl RiskConfig {
    /// Get the default config file path.
    ///
    /// Can be overridden with the `FXRISK_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("FXRISK_CONFIG") {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "fxrisk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("fxrisk.toml"))
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load from a specific path. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
