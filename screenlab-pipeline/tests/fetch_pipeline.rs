//! Integration tests for the historical fetch pipeline.

use chrono::{Duration, NaiveDate};
use screenlab_core::data::{DataError, DataProvider, FetchResult, HistoryStore};
use screenlab_core::domain::DailyBar;
use screenlab_pipeline::config::FetchConfig;
use screenlab_pipeline::fetch::{run_fetch, FetchOutcome, FetchProgress};
use std::collections::HashMap;

/// Canned provider: known symbols return bars, "EMPTY" returns nothing,
/// everything else errors.
struct CannedProvider {
    series: HashMap<String, Vec<f64>>,
}

impl CannedProvider {
    fn new() -> Self {
        Self {
            series: HashMap::from([
                ("GOOD.NS".to_string(), vec![100.0, 101.0, 102.0]),
                ("EMPTY.NS".to_string(), vec![]),
            ]),
        }
    }
}

impl DataProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let closes = self.series.get(symbol).ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
                adj_close: close,
            })
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
        })
    }
}

/// Progress sink that stays quiet and records completions.
struct Quiet;

impl FetchProgress for Quiet {
    fn on_start(&self, _ticker: &str, _index: usize, _total: usize) {}
    fn on_complete(
        &self,
        _ticker: &str,
        _index: usize,
        _total: usize,
        _result: &Result<FetchOutcome, DataError>,
    ) {
    }
    fn on_batch_complete(&self, _written: usize, _failed: usize, _total: usize) {}
}

fn range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    )
}

fn config_for(dir: &std::path::Path) -> FetchConfig {
    FetchConfig {
        out_dir: dir.to_path_buf(),
        ..FetchConfig::default()
    }
}

#[test]
fn mixed_batch_writes_skips_and_fails_independently() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path());
    let provider = CannedProvider::new();
    let (start, end) = range();

    let tickers = vec!["GOOD".to_string(), "EMPTY".to_string(), "BOGUS".to_string()];
    let config = config_for(dir.path());

    let summary = run_fetch(&tickers, start, end, &provider, &store, &config, &Quiet);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.no_data, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_succeeded());
    assert_eq!(summary.errors[0].0, "BOGUS");

    // Only the successful ticker produced a file
    assert!(store.file_path("GOOD", start, end).exists());
    assert!(!store.file_path("EMPTY", start, end).exists());
    assert!(!store.file_path("BOGUS", start, end).exists());
}

#[test]
fn written_file_carries_untransformed_ticker() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path());
    let provider = CannedProvider::new();
    let (start, end) = range();

    let tickers = vec!["GOOD".to_string()];
    let config = config_for(dir.path());
    run_fetch(&tickers, start, end, &provider, &store, &config, &Quiet);

    let mut reader = csv::Reader::from_path(store.file_path("GOOD", start, end)).unwrap();
    let headers = reader.headers().unwrap().clone();
    let ticker_col = headers.iter().position(|h| h == "Ticker").unwrap();

    let mut rows = 0;
    for record in reader.records() {
        let record = record.unwrap();
        // Query used GOOD.NS; the stored column holds the plain ticker
        assert_eq!(record.get(ticker_col), Some("GOOD"));
        rows += 1;
    }
    assert_eq!(rows, 3);
}

#[test]
fn rerun_with_overwrite_disabled_skips_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path());
    let provider = CannedProvider::new();
    let (start, end) = range();

    let tickers = vec!["GOOD".to_string()];
    let config = config_for(dir.path());
    run_fetch(&tickers, start, end, &provider, &store, &config, &Quiet);

    let keep = FetchConfig {
        overwrite: false,
        ..config_for(dir.path())
    };
    let summary = run_fetch(&tickers, start, end, &provider, &store, &keep, &Quiet);

    assert_eq!(summary.written, 0);
    assert_eq!(summary.skipped_existing, 1);
}

#[test]
fn rerun_with_overwrite_enabled_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path());
    let provider = CannedProvider::new();
    let (start, end) = range();

    let tickers = vec!["GOOD".to_string()];
    let config = config_for(dir.path());

    run_fetch(&tickers, start, end, &provider, &store, &config, &Quiet);
    let first = std::fs::read_to_string(store.file_path("GOOD", start, end)).unwrap();

    let summary = run_fetch(&tickers, start, end, &provider, &store, &config, &Quiet);
    let second = std::fs::read_to_string(store.file_path("GOOD", start, end)).unwrap();

    assert_eq!(summary.written, 1);
    assert_eq!(first, second);
}
