//! Detail-panel facts for a symbol.

use crate::format;
use crate::symbol::Symbol;

/// Fundamentals and ranges shown next to the chart.
///
/// Providers fill what they know; everything else stays `None` and renders as
/// `N/A`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockInfo {
    /// Ticker the facts describe.
    pub symbol: Option<Symbol>,
    /// Display name of the company.
    pub name: Option<String>,
    /// Market capitalization in quote currency.
    pub market_cap: Option<f64>,
    /// Trailing twelve-month price/earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Dividend yield as a fraction (`0.0042` is 0.42%).
    pub dividend_yield: Option<f64>,
    /// Highest price over the last 52 weeks.
    pub week_52_high: Option<f64>,
    /// Lowest price over the last 52 weeks.
    pub week_52_low: Option<f64>,
    /// Highest price of the current session.
    pub day_high: Option<f64>,
    /// Lowest price of the current session.
    pub day_low: Option<f64>,
}

impl StockInfo {
    /// Empty record for `symbol`.
    pub fn for_symbol(symbol: Symbol) -> Self {
        Self {
            symbol: Some(symbol),
            ..Self::default()
        }
    }

    /// Labelled, formatted rows in panel order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Market Cap", format::large_money(self.market_cap)),
            ("P/E Ratio", format::ratio(self.pe_ratio)),
            ("Dividend Yield", format::percent(self.dividend_yield.map(|v| v * 100.0))),
            ("52-Week High", format::price(self.week_52_high)),
            ("52-Week Low", format::price(self.week_52_low)),
            ("Day High", format::price(self.day_high)),
            ("Day Low", format::price(self.day_low)),
        ]
    }

    /// Fills missing fields from `other`, keeping values already present.
    pub fn merge_missing(mut self, other: StockInfo) -> Self {
        self.symbol = self.symbol.or(other.symbol);
        self.name = self.name.or(other.name);
        self.market_cap = self.market_cap.or(other.market_cap);
        self.pe_ratio = self.pe_ratio.or(other.pe_ratio);
        self.dividend_yield = self.dividend_yield.or(other.dividend_yield);
        self.week_52_high = self.week_52_high.or(other.week_52_high);
        self.week_52_low = self.week_52_low.or(other.week_52_low);
        self.day_high = self.day_high.or(other.day_high);
        self.day_low = self.day_low.or(other.day_low);
        self
    }
}
