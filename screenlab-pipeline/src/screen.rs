//! Overvaluation screen — end-to-end orchestration.
//!
//! Select the latest portfolio snapshot, derive the symbols list, enrich
//! every symbol, classify, and persist the dated report. Per-symbol failures
//! never abort the run; only configuration-level problems (no valid
//! snapshot, unwritable report) are fatal.

use crate::classify::apply_flags;
use crate::config::ScreenConfig;
use crate::enrich::{enrich_symbols, EnrichError};
use crate::report::{print_summary, report_filename, write_report_csv, write_symbols_csv, ReportError};
use chrono::NaiveDate;
use screenlab_core::data::{latest_snapshot, load_symbols, DataProvider, FundamentalsProvider, SnapshotError};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal screen-pipeline errors.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to create output dir {path}: {reason}")]
    OutputDir { path: String, reason: String },
}

/// Summary of a screen run.
#[derive(Debug)]
pub struct ScreenSummary {
    pub snapshot_path: PathBuf,
    pub snapshot_date: NaiveDate,
    pub symbols_total: usize,
    pub enriched: usize,
    pub flagged: usize,
    pub failures: Vec<(String, EnrichError)>,
    pub report_path: PathBuf,
}

/// Run the overvaluation screen.
///
/// `as_of` dates both the history window and the report filename; callers
/// pass today outside of tests.
pub fn run_screen(
    config: &ScreenConfig,
    bars: &dyn DataProvider,
    fundamentals: &dyn FundamentalsProvider,
    as_of: NaiveDate,
) -> Result<ScreenSummary, ScreenError> {
    let snapshot = latest_snapshot(&config.portfolio_dir)?;
    println!("Reading latest snapshot: {}", snapshot.path.display());

    let symbols: Vec<String> = load_symbols(&snapshot.path)?
        .into_iter()
        .map(|s| format!("{s}{}", config.exchange_suffix))
        .collect();
    println!("Total symbols found: {}", symbols.len());

    write_symbols_csv(&config.portfolio_dir.join("symbols_list.csv"), &symbols)?;

    let enrichment = enrich_symbols(&symbols, bars, fundamentals, config.history_days, as_of);

    let mut records = enrichment.records;
    apply_flags(&mut records, &config.thresholds);

    std::fs::create_dir_all(&config.output_dir).map_err(|e| ScreenError::OutputDir {
        path: config.output_dir.display().to_string(),
        reason: e.to_string(),
    })?;
    let report_path = config.output_dir.join(report_filename(as_of));
    write_report_csv(&report_path, &records)?;

    print_summary(&records);
    println!("Overvalued stocks flagged and saved to {}", report_path.display());

    let flagged = records.iter().filter(|r| r.overvalued).count();

    Ok(ScreenSummary {
        snapshot_path: snapshot.path,
        snapshot_date: snapshot.date,
        symbols_total: symbols.len(),
        enriched: records.len(),
        flagged,
        failures: enrichment.failures,
        report_path,
    })
}
