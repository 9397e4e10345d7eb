//! Ticker universe — reference lists of index constituents and ETFs.
//!
//! The universe is the deduplicated union of two reference CSV files, each
//! carrying a `SYMBOL` column. There is no fallback universe: a missing or
//! malformed reference file is fatal to the run.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Column expected in both reference files.
pub const SYMBOL_COLUMN: &str = "SYMBOL";

/// Errors while resolving the ticker universe.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read reference list {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("reference list {path} has no '{column}' column")]
    MissingColumn { path: String, column: String },
}

/// The resolved ticker universe.
///
/// Ordering is first-seen insertion order (index constituents first, then
/// ETFs); nothing downstream depends on it.
#[derive(Debug, Clone)]
pub struct Universe {
    tickers: Vec<String>,
}

impl Universe {
    /// Load the universe from the index-constituent list and the ETF list.
    pub fn load(index_list: &Path, etf_list: &Path) -> Result<Self, UniverseError> {
        let mut tickers = Vec::new();
        let mut seen = HashSet::new();

        for path in [index_list, etf_list] {
            for symbol in read_symbol_column(path)? {
                if seen.insert(symbol.clone()) {
                    tickers.push(symbol);
                }
            }
        }

        Ok(Self { tickers })
    }

    /// All tickers in the universe.
    pub fn all_tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Total number of tickers.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// Read every non-empty value of the `SYMBOL` column from a reference CSV.
fn read_symbol_column(path: &Path) -> Result<Vec<String>, UniverseError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| UniverseError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let headers = reader.headers().map_err(|e| UniverseError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let column = headers
        .iter()
        .position(|h| h.trim() == SYMBOL_COLUMN)
        .ok_or_else(|| UniverseError::MissingColumn {
            path: path.display().to_string(),
            column: SYMBOL_COLUMN.to_string(),
        })?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| UniverseError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                symbols.push(value.to_string());
            }
        }
    }

    Ok(symbols)
}
