//! Close-series indicators.
//!
//! Indicators operate on a slice of close prices and return a full series
//! aligned to the input; callers that need "the value as of the most recent
//! trading day" take the final element. A series too short to produce a
//! single defined value is an error from the indicator routine itself —
//! callers are not expected to pre-check lengths.

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::ema_of_series;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;

use thiserror::Error;

/// Errors from indicator computation.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("insufficient history: need {required} closes, got {got}")]
    InsufficientHistory { required: usize, got: usize },
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
