//! Data provider traits and structured error types.
//!
//! The provider traits abstract over the upstream market-data source so the
//! pipelines can swap implementations and mock for tests. The error enum is
//! the typed taxonomy consumed by the per-item skip logic: a pipeline logs
//! the offending symbol with the error and moves on.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{DailyBar, FundamentalSnapshot};

/// Structured error types for data operations.
///
/// Providers perform exactly one attempt per call; recovery policy (skip the
/// item, abort the run) belongs to the caller, not to the provider.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("io error: {0}")]
    Io(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful daily-bars fetch for a single symbol.
///
/// `bars` may be empty: a known symbol with no trading days in the requested
/// window is a valid, non-error outcome that callers log and skip.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<DailyBar>,
}

/// Trait for daily-bar providers.
///
/// Whether `end` is inclusive or exclusive is provider-defined and not
/// normalized here; callers must not assume either convention.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over a date range.
    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

/// Trait for current-fundamentals providers.
pub trait FundamentalsProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the current fundamental snapshot for a symbol.
    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, DataError>;
}
