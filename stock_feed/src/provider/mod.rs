//! Market-data providers.
//!
//! A provider turns a symbol (and, for history, a window) into the shared
//! record types, reporting every failure as [`DataUnavailable`]. Two
//! implementations exist:
//! - `yahoo` — blocking HTTP client for the Yahoo Finance chart and quote APIs.
//! - `simulated` — offline random walk over a fixed ticker catalogue.
use stock_common::model::{HistoricalSeries, HistoryWindow, Quote, StockInfo};
use stock_common::{DataUnavailable, Symbol};

pub mod simulated;
pub mod yahoo;

pub use simulated::SimulatedProvider;
pub use yahoo::YahooProvider;

/// Source of quotes, price history and detail facts.
///
/// Calls are synchronous round trips; implementations do not retry or cache.
pub trait MarketDataProvider: Send {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Current price and previous close for `symbol`.
    fn quote(&self, symbol: &Symbol) -> Result<Quote, DataUnavailable>;

    /// Prices for `symbol` over `window` at the window's sampling interval.
    fn history(&self, symbol: &Symbol, window: HistoryWindow) -> Result<HistoricalSeries, DataUnavailable>;

    /// Fundamentals and price ranges for the detail panel.
    fn info(&self, symbol: &Symbol) -> Result<StockInfo, DataUnavailable>;
}
