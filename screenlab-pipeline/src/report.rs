//! Report artifacts — symbols list, overvaluation report CSV, console summary.

use chrono::NaiveDate;
use screenlab_core::domain::EnrichedRecord;
use std::path::Path;
use thiserror::Error;

/// Errors writing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Header row of the overvaluation report.
const REPORT_HEADERS: [&str; 11] = [
    "Symbol",
    "P/E",
    "P/B",
    "Revenue Growth",
    "Price",
    "Earnings Growth",
    "RSI",
    "MACD",
    "MACD Signal",
    "MACD Hist",
    "Overvalued",
];

/// Filename of the dated overvaluation report.
pub fn report_filename(date: NaiveDate) -> String {
    format!(
        "overvalued_stocks_with_technical_indicators_{}.csv",
        date.format("%Y-%m-%d")
    )
}

/// Write the derived symbols list (single `Symbol` column).
pub fn write_symbols_csv(path: &Path, symbols: &[String]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;

    writer
        .write_record(["Symbol"])
        .map_err(|e| write_error(path, e))?;
    for symbol in symbols {
        writer
            .write_record([symbol.as_str()])
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| write_error(path, e))?;
    Ok(())
}

/// Write the full enriched table with the overvalued flag as 0/1.
///
/// Missing fundamentals serialize as empty cells.
pub fn write_report_csv(path: &Path, records: &[EnrichedRecord]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;

    writer
        .write_record(REPORT_HEADERS)
        .map_err(|e| write_error(path, e))?;

    for record in records {
        let f = &record.fundamentals;
        writer
            .write_record([
                record.symbol.clone(),
                opt_cell(f.pe_ratio),
                opt_cell(f.pb_ratio),
                opt_cell(f.revenue_growth),
                opt_cell(f.price),
                opt_cell(f.earnings_growth),
                record.rsi.to_string(),
                record.macd.to_string(),
                record.macd_signal.to_string(),
                record.macd_hist.to_string(),
                if record.overvalued { "1" } else { "0" }.to_string(),
            ])
            .map_err(|e| write_error(path, e))?;
    }

    writer.flush().map_err(|e| write_error(path, e))?;
    Ok(())
}

/// Print the screen's console summary table.
pub fn print_summary(records: &[EnrichedRecord]) {
    println!();
    println!(
        "{:<14} {:>8} {:>10} {:>10} {:>7} {:>8} {:>8} {:>10}",
        "Symbol", "P/E", "RevGrowth", "Price", "RSI", "MACD", "Signal", "Overvalued"
    );
    println!("{}", "-".repeat(82));
    for record in records {
        let f = &record.fundamentals;
        println!(
            "{:<14} {:>8} {:>10} {:>10} {:>7.2} {:>8.2} {:>8.2} {:>10}",
            record.symbol,
            fmt_opt(f.pe_ratio),
            fmt_opt(f.revenue_growth),
            fmt_opt(f.price),
            record.rsi,
            record.macd,
            record.macd_signal,
            if record.overvalued { "1" } else { "0" },
        );
    }
    println!();
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> ReportError {
    ReportError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
