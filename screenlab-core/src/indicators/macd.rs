//! Moving Average Convergence/Divergence (MACD).
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal_period) of
//! the MACD line's defined region; histogram = MACD - signal.
//! The first defined signal value sits at index slow + signal_period - 2.

use super::ema::ema_of_series;
use super::IndicatorError;

/// The three MACD output series, aligned to the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute the MACD triple over a close-price series.
///
/// Errors when the series is too short for a single defined signal value,
/// which requires `slow + signal_period - 1` closes.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries, IndicatorError> {
    assert!(fast >= 1 && slow >= 1 && signal_period >= 1, "MACD periods must be >= 1");
    assert!(fast < slow, "MACD fast period must be shorter than slow");

    let n = closes.len();
    let required = slow + signal_period - 1;
    if n < required {
        return Err(IndicatorError::InsufficientHistory { required, got: n });
    }

    let fast_ema = ema_of_series(closes, fast);
    let slow_ema = ema_of_series(closes, slow);

    let mut macd_line = vec![f64::NAN; n];
    for i in 0..n {
        if !fast_ema[i].is_nan() && !slow_ema[i].is_nan() {
            macd_line[i] = fast_ema[i] - slow_ema[i];
        }
    }

    // The MACD line is defined from index slow-1 on; the signal EMA runs
    // over that region and is padded back to input alignment.
    let first_defined = slow - 1;
    let signal_tail = ema_of_series(&macd_line[first_defined..], signal_period);

    let mut signal = vec![f64::NAN; n];
    signal[first_defined..].copy_from_slice(&signal_tail);

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if !macd_line[i].is_nan() && !signal[i].is_nan() {
            histogram[i] = macd_line[i] - signal[i];
        }
    }

    Ok(MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    })
}
