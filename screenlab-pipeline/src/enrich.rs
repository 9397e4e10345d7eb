//! Portfolio enrichment — fundamentals plus technical indicators per symbol.
//!
//! For each symbol: fetch the current fundamental snapshot and a trailing
//! window of daily closes, compute RSI(14) and MACD(12,26,9), and keep the
//! final value of each series. Any single-symbol failure is logged and that
//! symbol contributes no record; the run continues with the rest.

use chrono::{Duration, NaiveDate};
use screenlab_core::data::{DataError, DataProvider, FundamentalsProvider};
use screenlab_core::domain::EnrichedRecord;
use screenlab_core::indicators::{macd, rsi, IndicatorError};
use thiserror::Error;

/// RSI lookback used by the screen.
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA period.
pub const MACD_FAST: usize = 12;
/// MACD slow EMA period.
pub const MACD_SLOW: usize = 26;
/// MACD signal EMA period.
pub const MACD_SIGNAL: usize = 9;

/// Per-symbol enrichment failures.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("{indicator} is undefined at the latest bar")]
    UndefinedIndicator { indicator: &'static str },
}

/// Result of an enrichment pass.
#[derive(Debug)]
pub struct Enrichment {
    /// One record per symbol that fully resolved. Overvalued flags are not
    /// set yet; classification is a separate step.
    pub records: Vec<EnrichedRecord>,
    /// Symbols dropped from the output, with the reason.
    pub failures: Vec<(String, EnrichError)>,
}

/// Enrich every symbol, skipping per-symbol failures.
///
/// `as_of` anchors the trailing history window, `[as_of - history_days,
/// as_of]`; callers pass today outside of tests.
pub fn enrich_symbols(
    symbols: &[String],
    bars: &dyn DataProvider,
    fundamentals: &dyn FundamentalsProvider,
    history_days: i64,
    as_of: NaiveDate,
) -> Enrichment {
    let total = symbols.len();
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        println!("[{}/{}] Enriching {symbol}...", i + 1, total);

        match enrich_one(symbol, bars, fundamentals, history_days, as_of) {
            Ok(record) => records.push(record),
            Err(e) => {
                eprintln!("Error enriching {symbol}: {e}");
                failures.push((symbol.clone(), e));
            }
        }
    }

    Enrichment { records, failures }
}

/// Enrich a single symbol: fundamentals → history → indicators.
fn enrich_one(
    symbol: &str,
    bars: &dyn DataProvider,
    fundamentals: &dyn FundamentalsProvider,
    history_days: i64,
    as_of: NaiveDate,
) -> Result<EnrichedRecord, EnrichError> {
    let snapshot = fundamentals.fetch_fundamentals(symbol)?;

    let start = as_of - Duration::days(history_days);
    let history = bars.fetch_daily(symbol, start, as_of)?;
    let closes: Vec<f64> = history.bars.iter().map(|b| b.close).collect();

    let rsi_series = rsi(&closes, RSI_PERIOD)?;
    let macd_series = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?;

    Ok(EnrichedRecord {
        symbol: symbol.to_string(),
        fundamentals: snapshot,
        rsi: latest(&rsi_series, "RSI")?,
        macd: latest(&macd_series.macd, "MACD")?,
        macd_signal: latest(&macd_series.signal, "MACD signal")?,
        macd_hist: latest(&macd_series.histogram, "MACD histogram")?,
        overvalued: false,
    })
}

/// Final value of a series, rejecting NaN (e.g. a void bar tainted the tail).
fn latest(series: &[f64], indicator: &'static str) -> Result<f64, EnrichError> {
    match series.last() {
        Some(&v) if !v.is_nan() => Ok(v),
        _ => Err(EnrichError::UndefinedIndicator { indicator }),
    }
}
