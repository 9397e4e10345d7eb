//! Fundamental snapshots and enriched output records.

use serde::{Deserialize, Serialize};

/// Current fundamental ratios for one symbol, as reported by a provider.
///
/// Every field is optional: providers legitimately omit ratios (no trailing
/// P/E for an unprofitable company, no revenue growth for a fresh listing).
/// Absence is data, not an error — the classifier decides what a missing
/// operand means for each predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub price: Option<f64>,
    pub earnings_growth: Option<f64>,
}

/// One output row of the overvaluation screen.
///
/// A record only exists for symbols whose fundamentals and price history both
/// resolved; a symbol that failed enrichment never produces a partial row.
/// The technical fields hold the most recent value of their series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub symbol: String,
    pub fundamentals: FundamentalSnapshot,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub overvalued: bool,
}
