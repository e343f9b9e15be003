//!
//! Common types and utilities shared by the market-data feed and the viewer.
//!
//! This crate aggregates:
//! - `error` — `DataUnavailable` and the unified `StockError`.
//! - `result` — handy `Result<T, StockError>` alias.
//! - `symbol` — ticker symbols and symbol-file parsing.
//! - `model` — `Quote`, `HistoricalSeries` and `StockInfo` records.
//! - `config` — immutable `Settings` loaded at startup.
//! - `format` — display helpers for prices and fundamentals.
#![warn(missing_docs)]
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod result;
pub mod symbol;

pub use config::Settings;
pub use error::{DataUnavailable, StockError, UnavailableCause};
pub use result::Result;
pub use symbol::Symbol;
