//! Per-ticker CSV history store.
//!
//! Layout: `{out_dir}/{TICKER}_{YYYYMMDD}_{YYYYMMDD}_historical_data.csv`,
//! one file per (ticker, range). The Ticker column always holds the
//! untransformed symbol — exchange suffixes used for querying are never
//! persisted. Overwrite-by-default is an explicit policy: re-running the
//! same (ticker, range) replaces the file unless `overwrite` is false.

use super::provider::DataError;
use crate::domain::DailyBar;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Column headers of a history file.
const HEADERS: [&str; 8] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Adj Close",
    "Volume",
    "Ticker",
];

/// Outcome of a store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File written (created or replaced).
    Written { path: PathBuf, rows: usize },
    /// File already existed and `overwrite` was false.
    SkippedExisting { path: PathBuf },
}

/// The history store.
pub struct HistoryStore {
    out_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Deterministic path for a (ticker, range) file.
    pub fn file_path(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> PathBuf {
        self.out_dir.join(format!(
            "{ticker}_{}_{}_historical_data.csv",
            start.format("%Y%m%d"),
            end.format("%Y%m%d")
        ))
    }

    /// Write one ticker's bars, creating the output directory if absent.
    pub fn write(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        bars: &[DailyBar],
        overwrite: bool,
    ) -> Result<WriteOutcome, DataError> {
        fs::create_dir_all(&self.out_dir)
            .map_err(|e| DataError::Io(format!("failed to create output dir: {e}")))?;

        let path = self.file_path(ticker, start, end);
        if !overwrite && path.exists() {
            return Ok(WriteOutcome::SkippedExisting { path });
        }

        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| DataError::Io(format!("failed to create {}: {e}", path.display())))?;

        writer
            .write_record(HEADERS)
            .map_err(|e| DataError::Io(format!("failed to write header: {e}")))?;

        for bar in bars {
            writer
                .write_record([
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open.to_string(),
                    bar.high.to_string(),
                    bar.low.to_string(),
                    bar.close.to_string(),
                    bar.adj_close.to_string(),
                    bar.volume.to_string(),
                    ticker.to_string(),
                ])
                .map_err(|e| DataError::Io(format!("failed to write row: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| DataError::Io(format!("failed to flush {}: {e}", path.display())))?;

        Ok(WriteOutcome::Written {
            path,
            rows: bars.len(),
        })
    }
}
