//! Analysis configuration — indicator parameters plus data-window settings.
//!
//! Stored as TOML. Every field has a default, so an empty file (or no file)
//! yields the standard 50/200, 20/50, RSI 14, MACD 12/26/9, BB 20/2 setup.
//! Loading does not validate. Callers apply overrides first and then call
//! [`AnalysisConfig::validate`] once.

use crate::engine::{IndicatorParams, ParamError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("lookback_days must be > 0")]
    ZeroLookback,

    #[error(transparent)]
    Params(#[from] ParamError),
}

/// Price-history window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Calendar days fetched when no explicit start date is given.
    pub lookback_days: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { lookback_days: 365 }
    }
}

impl DataConfig {
    /// Start date of the default window ending at `end`.
    pub fn default_start(&self, end: NaiveDate) -> NaiveDate {
        end - Duration::days(i64::from(self.lookback_days))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub data: DataConfig,
}

impl AnalysisConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.lookback_days == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        self.indicators.validate()?;
        Ok(())
    }
}
