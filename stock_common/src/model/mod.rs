//! Record shapes produced by the feed and consumed by the viewer.
//!
//! - `quote` — current price snapshot with its derived direction.
//! - `history` — time-ordered price series and lookback windows.
//! - `info` — detail-panel facts for a symbol.
pub mod history;
pub mod info;
pub mod quote;

pub use history::{HistoricalSeries, HistoryWindow, PricePoint};
pub use info::StockInfo;
pub use quote::{Direction, Quote};
