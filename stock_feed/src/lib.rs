//! Market-data access for the stock viewer.
//!
//! This crate is the only place that talks to a market-data provider. It
//! wires together three building blocks:
//!
//! - `provider` — the `MarketDataProvider` seam with Yahoo Finance and
//!   simulated implementations.
//! - `manager` — `StockDataManager`, the fetch contract used by the UI
//!   (`get_quote`, `get_history`, `get_info`).
//! - `worker` — a background thread that serves fetch requests one at a time
//!   and reports results over `crossbeam_channel`.
#![warn(missing_docs)]
pub mod manager;
pub mod provider;
pub mod worker;

pub use manager::StockDataManager;
pub use provider::MarketDataProvider;
pub use worker::{FeedEvent, FeedHandle, FeedRequest, FeedWorker};
