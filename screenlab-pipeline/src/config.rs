//! Pipeline configuration.
//!
//! Both pipelines are driven by plain config structs with usable defaults;
//! the screen thresholds can additionally be overridden from a TOML file.

use crate::classify::Thresholds;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default fetch window when no dates are given: [today - 500 days, today].
pub const DEFAULT_LOOKBACK_DAYS: i64 = 500;

/// Exchange suffix appended to symbols for provider queries.
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".NS";

/// Trailing history window used for the screen's technical indicators.
pub const DEFAULT_HISTORY_DAYS: i64 = 365;

/// Errors loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Configuration for the historical fetch pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Index-constituent reference list (must carry a SYMBOL column).
    pub index_list: PathBuf,
    /// ETF reference list (must carry a SYMBOL column).
    pub etf_list: PathBuf,
    /// Directory receiving one CSV per ticker.
    pub out_dir: PathBuf,
    /// Suffix appended to each ticker for the provider query only.
    pub exchange_suffix: String,
    /// Replace existing (ticker, range) files. Overwrite-by-default is the
    /// documented policy; set false to leave existing files untouched.
    pub overwrite: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            index_list: PathBuf::from("nifty/nifty500.csv"),
            etf_list: PathBuf::from("etf/etf_list_nse.csv"),
            out_dir: PathBuf::from("historical_data"),
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            overwrite: true,
        }
    }
}

/// Configuration for the overvaluation screen pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Directory holding dated portfolio snapshot files.
    pub portfolio_dir: PathBuf,
    /// Directory receiving the dated report CSV.
    pub output_dir: PathBuf,
    /// Suffix appended to portfolio symbols before querying the provider.
    pub exchange_suffix: String,
    /// Trailing calendar days of history fetched per symbol.
    pub history_days: i64,
    /// Classifier thresholds.
    pub thresholds: Thresholds,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            portfolio_dir: PathBuf::from("portfolio/equity"),
            output_dir: PathBuf::from("output"),
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            history_days: DEFAULT_HISTORY_DAYS,
            thresholds: Thresholds::default(),
        }
    }
}

/// Load classifier thresholds from a TOML file.
pub fn thresholds_from_file(path: &Path) -> Result<Thresholds, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
