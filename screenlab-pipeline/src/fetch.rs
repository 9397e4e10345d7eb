//! Historical fetch pipeline — sequential per-ticker download loop.
//!
//! One attempt per ticker, strictly in input order. An empty result is
//! logged and skipped without counting as an error; a provider or store
//! error is logged with the ticker and the loop continues. Nothing here
//! retries, backs off, or aborts remaining tickers.

use crate::config::FetchConfig;
use chrono::NaiveDate;
use screenlab_core::data::{DataError, DataProvider, HistoryStore, WriteOutcome};

/// Per-ticker outcome of the fetch loop.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Bars fetched and written.
    Written { rows: usize },
    /// Provider returned zero bars for the window; nothing written.
    NoData,
    /// Output file already existed and overwrite was disabled.
    SkippedExisting,
}

/// Progress callback for multi-ticker fetches.
pub trait FetchProgress: Send {
    /// Called when starting to fetch a ticker.
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    /// Called when a ticker fetch completes.
    fn on_complete(
        &self,
        ticker: &str,
        index: usize,
        total: usize,
        result: &Result<FetchOutcome, DataError>,
    );

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, written: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {ticker}...", index + 1, total);
    }

    fn on_complete(
        &self,
        ticker: &str,
        _index: usize,
        _total: usize,
        result: &Result<FetchOutcome, DataError>,
    ) {
        match result {
            Ok(FetchOutcome::Written { rows }) => println!("  OK: {ticker} ({rows} rows)"),
            Ok(FetchOutcome::NoData) => println!("  no data: {ticker}"),
            Ok(FetchOutcome::SkippedExisting) => println!("  exists: {ticker} (skipped)"),
            Err(e) => println!("  FAIL: {ticker}: {e}"),
        }
    }

    fn on_batch_complete(&self, written: usize, failed: usize, total: usize) {
        println!("\nFetch complete: {written}/{total} written, {failed} failed");
    }
}

/// Summary of a fetch run.
#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub written: usize,
    pub no_data: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fetch history for every ticker and persist one CSV per success.
///
/// The exchange suffix is appended for the provider query only; the store
/// always receives the untransformed ticker.
pub fn run_fetch(
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
    provider: &dyn DataProvider,
    store: &HistoryStore,
    config: &FetchConfig,
    progress: &dyn FetchProgress,
) -> FetchSummary {
    let total = tickers.len();
    let mut written = 0;
    let mut no_data = 0;
    let mut skipped_existing = 0;
    let mut failed = 0;
    let mut errors: Vec<(String, DataError)> = Vec::new();

    for (i, ticker) in tickers.iter().enumerate() {
        progress.on_start(ticker, i, total);

        let result = fetch_one(ticker, start, end, provider, store, config);
        progress.on_complete(ticker, i, total, &result);

        match result {
            Ok(FetchOutcome::Written { .. }) => written += 1,
            Ok(FetchOutcome::NoData) => no_data += 1,
            Ok(FetchOutcome::SkippedExisting) => skipped_existing += 1,
            Err(e) => {
                errors.push((ticker.clone(), e));
                failed += 1;
            }
        }
    }

    progress.on_batch_complete(written, failed, total);

    FetchSummary {
        total,
        written,
        no_data,
        skipped_existing,
        failed,
        errors,
    }
}

/// Fetch and persist a single ticker: query → (maybe) write.
fn fetch_one(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    provider: &dyn DataProvider,
    store: &HistoryStore,
    config: &FetchConfig,
) -> Result<FetchOutcome, DataError> {
    // Skip before spending a network call when the file is to be kept
    if !config.overwrite && store.file_path(ticker, start, end).exists() {
        return Ok(FetchOutcome::SkippedExisting);
    }

    let query = format!("{ticker}{}", config.exchange_suffix);
    let result = provider.fetch_daily(&query, start, end)?;

    if result.bars.is_empty() {
        return Ok(FetchOutcome::NoData);
    }

    match store.write(ticker, start, end, &result.bars, config.overwrite)? {
        WriteOutcome::Written { rows, .. } => Ok(FetchOutcome::Written { rows }),
        WriteOutcome::SkippedExisting { .. } => Ok(FetchOutcome::SkippedExisting),
    }
}
