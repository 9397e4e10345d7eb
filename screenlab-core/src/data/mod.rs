//! Data acquisition: provider traits, Yahoo Finance client, reference lists,
//! portfolio snapshots, and the per-ticker CSV history store.

pub mod provider;
pub mod snapshot;
pub mod store;
pub mod universe;
pub mod yahoo;

pub use provider::{DataError, DataProvider, FetchResult, FundamentalsProvider};
pub use snapshot::{latest_snapshot, load_symbols, SnapshotError, SnapshotFile};
pub use store::{HistoryStore, WriteOutcome};
pub use universe::{Universe, UniverseError};
pub use yahoo::YahooProvider;
