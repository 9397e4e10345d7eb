//! Screenlab Core — domain types, data providers, indicators, and stores.
//!
//! This crate contains the building blocks shared by both pipelines:
//! - Domain types (daily bars, fundamental snapshots, enriched records)
//! - Data provider traits with a structured error taxonomy
//! - Yahoo Finance provider (daily bars + fundamentals)
//! - Reference ticker lists and portfolio snapshot resolution
//! - Per-ticker CSV history store
//! - Close-series indicators (EMA, RSI, MACD)

pub mod data;
pub mod domain;
pub mod indicators;
