//! Quote snapshot for a single symbol.
//!
//! A `Quote` is built fresh on every fetch and never stored. Its `direction` is
//! always computed from the sign of `price - previous_close`; there is no
//! constructor that accepts a direction.

use chrono::{DateTime, Utc};
use strum_macros::Display;

use crate::symbol::Symbol;

/// Direction of change against the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Current price above the previous close.
    Up,
    /// Current price below the previous close.
    Down,
    /// Current price equal to the previous close.
    Unchanged,
}

impl Direction {
    /// Direction implied by `current - previous`.
    pub fn between(current: f64, previous: f64) -> Self {
        let change = current - previous;
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Unchanged
        }
    }
}

/// Current price snapshot for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    symbol: Symbol,
    price: f64,
    previous_close: f64,
    direction: Direction,
    currency: Option<String>,
    market_time: Option<DateTime<Utc>>,
}

impl Quote {
    /// Builds a quote and derives its direction.
    pub fn new(symbol: Symbol, price: f64, previous_close: f64) -> Self {
        Self {
            symbol,
            price,
            previous_close,
            direction: Direction::between(price, previous_close),
            currency: None,
            market_time: None,
        }
    }

    /// Attaches the currency the provider quoted in.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Attaches the provider's market timestamp.
    pub fn with_market_time(mut self, market_time: DateTime<Utc>) -> Self {
        self.market_time = Some(market_time);
        self
    }

    /// Ticker the quote is for.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Current price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Previous session close.
    pub fn previous_close(&self) -> f64 {
        self.previous_close
    }

    /// Direction derived from the change.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Quote currency, when the provider reports one.
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Provider market timestamp, when reported.
    pub fn market_time(&self) -> Option<DateTime<Utc>> {
        self.market_time
    }

    /// Absolute change against the previous close.
    pub fn change(&self) -> f64 {
        self.price - self.previous_close
    }

    /// Relative change in percent, `None` when the previous close is zero.
    pub fn change_percent(&self) -> Option<f64> {
        (self.previous_close != 0.0).then(|| self.change() / self.previous_close * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Symbol {
        Symbol::new("AAPL").unwrap()
    }

    #[test]
    fn price_above_previous_close_is_up() {
        let quote = Quote::new(aapl(), 150.00, 148.00);
        assert_eq!(quote.direction(), Direction::Up);
        assert!((quote.change() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn equal_prices_are_unchanged() {
        let quote = Quote::new(aapl(), 148.00, 148.00);
        assert_eq!(quote.direction(), Direction::Unchanged);
        assert_eq!(quote.change_percent(), Some(0.0));
    }

    #[test]
    fn price_below_previous_close_is_down() {
        let quote = Quote::new(aapl(), 147.10, 148.00);
        assert_eq!(quote.direction(), Direction::Down);
        assert!(quote.change_percent().unwrap() < 0.0);
    }

    #[test]
    fn direction_always_matches_sign_of_change() {
        let pairs = [(1.0, 2.0), (2.0, 1.0), (5.5, 5.5), (0.01, 0.0), (0.0, 0.01)];
        for (price, previous) in pairs {
            let quote = Quote::new(aapl(), price, previous);
            let expected = match quote.change().partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Greater) => Direction::Up,
                Some(std::cmp::Ordering::Less) => Direction::Down,
                _ => Direction::Unchanged,
            };
            assert_eq!(quote.direction(), expected, "{price} vs {previous}");
        }
    }

    #[test]
    fn zero_previous_close_has_no_percent() {
        assert_eq!(Quote::new(aapl(), 1.0, 0.0).change_percent(), None);
    }

    #[test]
    fn direction_displays_lowercase() {
        assert_eq!(Direction::Unchanged.to_string(), "unchanged");
    }
}
