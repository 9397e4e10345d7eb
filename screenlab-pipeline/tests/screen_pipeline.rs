//! Integration tests for the overvaluation screen pipeline.

use chrono::{Duration, NaiveDate};
use screenlab_core::data::{DataError, DataProvider, FetchResult, FundamentalsProvider};
use screenlab_core::domain::{DailyBar, FundamentalSnapshot};
use screenlab_pipeline::config::ScreenConfig;
use screenlab_pipeline::screen::{run_screen, ScreenError};
use std::collections::HashMap;
use std::path::Path;

/// Bars provider serving deterministic trends per symbol.
struct TrendBars {
    rising: Vec<String>,
    falling: Vec<String>,
}

impl DataProvider for TrendBars {
    fn name(&self) -> &str {
        "trend_bars"
    }

    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let closes: Vec<f64> = if self.rising.iter().any(|s| s == symbol) {
            (0..60).map(|i| 100.0 + i as f64).collect()
        } else if self.falling.iter().any(|s| s == symbol) {
            (0..60).map(|i| 200.0 - i as f64).collect()
        } else {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        };

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

/// Fundamentals provider with per-symbol canned snapshots.
struct CannedFundamentals {
    snapshots: HashMap<String, FundamentalSnapshot>,
}

impl FundamentalsProvider for CannedFundamentals {
    fn name(&self) -> &str {
        "canned_fundamentals"
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, DataError> {
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::Other(format!("fundamentals unavailable for {symbol}")))
    }
}

fn cheap_snapshot() -> FundamentalSnapshot {
    FundamentalSnapshot {
        pe_ratio: Some(10.0),
        pb_ratio: Some(1.5),
        revenue_growth: Some(1000.0),
        price: Some(100.0),
        earnings_growth: Some(0.2),
    }
}

fn write_snapshot(dir: &Path, name: &str, symbols: &[&str]) {
    let mut content = String::from("tradingsymbol,quantity\n");
    for s in symbols {
        content.push_str(&format!("{s},10\n"));
    }
    std::fs::write(dir.join(name), content).unwrap();
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[test]
fn screen_selects_latest_snapshot_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio_dir = dir.path().join("portfolio");
    let output_dir = dir.path().join("output");
    std::fs::create_dir_all(&portfolio_dir).unwrap();

    write_snapshot(&portfolio_dir, "equity_portfolio_2024-01-01.csv", &["OLD"]);
    write_snapshot(&portfolio_dir, "equity_portfolio_2024-03-15.csv", &["CALM", "HOT"]);
    // A stray file with an unparseable date must not abort selection
    write_snapshot(&portfolio_dir, "equity_portfolio_backup.csv", &["JUNK"]);

    let bars = TrendBars {
        rising: vec!["HOT.NS".into()],
        falling: vec!["CALM.NS".into()],
    };
    let fundamentals = CannedFundamentals {
        snapshots: HashMap::from([
            ("CALM.NS".to_string(), cheap_snapshot()),
            ("HOT.NS".to_string(), cheap_snapshot()),
        ]),
    };

    let config = ScreenConfig {
        portfolio_dir: portfolio_dir.clone(),
        output_dir: output_dir.clone(),
        ..ScreenConfig::default()
    };

    let summary = run_screen(&config, &bars, &fundamentals, as_of()).unwrap();

    assert_eq!(
        summary.snapshot_date,
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    );
    assert_eq!(summary.symbols_total, 2);
    assert_eq!(summary.enriched, 2);
    // Rising closes → RSI 100 and positive MACD → flagged; falling → clean
    assert_eq!(summary.flagged, 1);
    assert!(summary.failures.is_empty());

    // Symbols list derived from the snapshot, suffixed
    let symbols = std::fs::read_to_string(portfolio_dir.join("symbols_list.csv")).unwrap();
    assert_eq!(symbols.lines().collect::<Vec<_>>(), ["Symbol", "CALM.NS", "HOT.NS"]);

    // Dated report with one row per enriched symbol
    let report = std::fs::read_to_string(
        output_dir.join("overvalued_stocks_with_technical_indicators_2024-06-01.csv"),
    )
    .unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Symbol,P/E,"));
    let hot = lines.iter().find(|l| l.starts_with("HOT.NS")).unwrap();
    assert!(hot.ends_with(",1"));
    let calm = lines.iter().find(|l| l.starts_with("CALM.NS")).unwrap();
    assert!(calm.ends_with(",0"));
}

#[test]
fn failing_symbol_is_dropped_without_aborting_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio_dir = dir.path().join("portfolio");
    let output_dir = dir.path().join("output");
    std::fs::create_dir_all(&portfolio_dir).unwrap();

    write_snapshot(&portfolio_dir, "equity_portfolio_2024-03-15.csv", &["CALM", "DEAD"]);

    let bars = TrendBars {
        rising: vec![],
        falling: vec!["CALM.NS".into(), "DEAD.NS".into()],
    };
    // DEAD.NS has no fundamentals entry → per-symbol error
    let fundamentals = CannedFundamentals {
        snapshots: HashMap::from([("CALM.NS".to_string(), cheap_snapshot())]),
    };

    let config = ScreenConfig {
        portfolio_dir,
        output_dir: output_dir.clone(),
        ..ScreenConfig::default()
    };

    let summary = run_screen(&config, &bars, &fundamentals, as_of()).unwrap();

    assert_eq!(summary.symbols_total, 2);
    assert_eq!(summary.enriched, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, "DEAD.NS");

    let report = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(report.contains("CALM.NS"));
    assert!(!report.contains("DEAD.NS"));
}

#[test]
fn empty_portfolio_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio_dir = dir.path().join("portfolio");
    std::fs::create_dir_all(&portfolio_dir).unwrap();

    let bars = TrendBars {
        rising: vec![],
        falling: vec![],
    };
    let fundamentals = CannedFundamentals {
        snapshots: HashMap::new(),
    };

    let config = ScreenConfig {
        portfolio_dir,
        output_dir: dir.path().join("output"),
        ..ScreenConfig::default()
    };

    let result = run_screen(&config, &bars, &fundamentals, as_of());
    assert!(matches!(result, Err(ScreenError::Snapshot(_))));
}
