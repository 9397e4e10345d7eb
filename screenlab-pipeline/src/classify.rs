//! Overvaluation classifier.
//!
//! Four independent fixed-threshold predicates combined with logical OR:
//! P/E, price over revenue growth, RSI, and MACD. A predicate with a
//! missing operand does not trigger; division by an exactly-zero revenue
//! growth follows IEEE 754, so a positive price over zero growth yields
//! +inf and triggers the ratio predicate. No row is dropped here.

use screenlab_core::domain::EnrichedRecord;
use serde::{Deserialize, Serialize};

/// Classifier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// P/E above this flags the stock.
    pub max_pe: f64,
    /// Price / revenue growth above this flags the stock.
    pub price_to_revenue_growth: f64,
    /// RSI above this indicates overbought.
    pub rsi_overbought: f64,
    /// MACD above this indicates a bullish (potentially overextended) trend.
    pub macd_bullish: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_pe: 30.0,
            price_to_revenue_growth: 1.5,
            rsi_overbought: 70.0,
            macd_bullish: 0.0,
        }
    }
}

/// Evaluate the overvaluation predicate for one record.
pub fn is_overvalued(record: &EnrichedRecord, thresholds: &Thresholds) -> bool {
    let f = &record.fundamentals;

    let pe_high = f.pe_ratio.is_some_and(|pe| pe > thresholds.max_pe);

    let ratio_high = match (f.price, f.revenue_growth) {
        (Some(price), Some(growth)) => price / growth > thresholds.price_to_revenue_growth,
        _ => false,
    };

    let rsi_high = record.rsi > thresholds.rsi_overbought;
    let macd_bullish = record.macd > thresholds.macd_bullish;

    pe_high || ratio_high || rsi_high || macd_bullish
}

/// Set the overvalued flag on every record.
pub fn apply_flags(records: &mut [EnrichedRecord], thresholds: &Thresholds) {
    for record in records.iter_mut() {
        record.overvalued = is_overvalued(record, thresholds);
    }
}
