//! Portfolio snapshot resolution.
//!
//! Snapshots are dated exports named `equity_portfolio_{YYYY-MM-DD}.csv`.
//! The active snapshot is the one with the maximum date parsed from the
//! filename — identity and freshness come from the name alone, never from
//! file content or modification time. Ties on equal dates are broken by
//! filename so selection is deterministic.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename prefix for portfolio snapshot files.
pub const SNAPSHOT_PREFIX: &str = "equity_portfolio_";

/// Column holding the instrument symbol in a snapshot file.
pub const SYMBOL_COLUMN: &str = "tradingsymbol";

/// Errors while selecting or reading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no valid snapshot files in {dir}")]
    NoValidSnapshots { dir: String },

    #[error("failed to read snapshot {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("snapshot {path} has no '{column}' column")]
    MissingColumn { path: String, column: String },
}

/// A snapshot file together with the date parsed from its name.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// Select the most recent snapshot in `dir`.
///
/// Files whose trailing date token does not parse are logged to stderr and
/// excluded; the scan only fails when nothing parseable remains.
pub fn latest_snapshot(dir: &Path) -> Result<SnapshotFile, SnapshotError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SnapshotError::Read {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut candidates: Vec<(NaiveDate, String, PathBuf)> = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| SnapshotError::Read {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = entry.file_name().to_string_lossy().to_string();

        if !name.starts_with(SNAPSHOT_PREFIX) || !name.ends_with(".csv") {
            continue;
        }

        match parse_date_token(&name) {
            Some(date) => candidates.push((date, name, entry.path())),
            None => eprintln!("Skipping {name}: unparseable date token"),
        }
    }

    candidates
        .into_iter()
        .max_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)))
        .map(|(date, _, path)| SnapshotFile { path, date })
        .ok_or_else(|| SnapshotError::NoValidSnapshots {
            dir: dir.display().to_string(),
        })
}

/// Parse the `YYYY-MM-DD` token after the last underscore of a filename.
fn parse_date_token(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".csv")?;
    let token = stem.rsplit('_').next()?;
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

/// Load the deduplicated symbol list from a snapshot file.
///
/// Preserves first-seen order and skips blank cells.
pub fn load_symbols(path: &Path) -> Result<Vec<String>, SnapshotError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| SnapshotError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let headers = reader.headers().map_err(|e| SnapshotError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let column = headers
        .iter()
        .position(|h| h.trim() == SYMBOL_COLUMN)
        .ok_or_else(|| SnapshotError::MissingColumn {
            path: path.display().to_string(),
            column: SYMBOL_COLUMN.to_string(),
        })?;

    let mut symbols = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for record in reader.records() {
        let record = record.map_err(|e| SnapshotError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() && seen.insert(value.to_string()) {
                symbols.push(value.to_string());
            }
        }
    }

    Ok(symbols)
}
