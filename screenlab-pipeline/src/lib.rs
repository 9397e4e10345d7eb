//! Screenlab Pipeline — fetch and screen orchestration.
//!
//! This crate builds on `screenlab-core` to provide:
//! - The sequential historical fetch loop with per-ticker skip policy
//! - Portfolio enrichment (fundamentals + RSI/MACD) with per-symbol skip policy
//! - The overvaluation classifier and its thresholds
//! - Report writers (per-run CSV artifacts) and the console summary
//! - Pipeline configuration with TOML threshold overrides

pub mod classify;
pub mod config;
pub mod enrich;
pub mod fetch;
pub mod report;
pub mod screen;

pub use classify::{apply_flags, is_overvalued, Thresholds};
pub use config::{thresholds_from_file, ConfigError, FetchConfig, ScreenConfig};
pub use enrich::{enrich_symbols, EnrichError, Enrichment};
pub use fetch::{run_fetch, FetchOutcome, FetchProgress, FetchSummary, StdoutProgress};
pub use report::{report_filename, write_report_csv, write_symbols_csv, ReportError};
pub use screen::{run_screen, ScreenError, ScreenSummary};
