//! Offline provider that synthesizes market data.
//!
//! Each known ticker gets a base price derived from its name. Quotes follow a
//! small random walk around the last price (uniform step in `[-1%, +1%]`),
//! compared against a fixed previous close. History and detail facts are
//! generated from a seeded RNG so the same symbol and window always produce the
//! same series shape. Tickers outside the catalogue are reported as unknown,
//! which keeps the "unavailable card" path reachable without a network.
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use chrono::{DurationRound, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stock_common::model::{HistoricalSeries, HistoryWindow, PricePoint, Quote, StockInfo};
use stock_common::{DataUnavailable, Symbol};

use super::MarketDataProvider;

/// Tickers the simulator knows about.
pub const KNOWN_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOG", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "JPM", "JNJ", "V", "PG",
    "UNH", "HD", "DIS", "PYPL", "NFLX", "ADBE", "CRM", "INTC", "CSCO", "PFE", "ABT", "TMO",
    "ABBV", "LLY", "PEP", "COST", "TXN", "AVGO", "ACN", "QCOM", "AMD", "IBM", "ORCL", "NKE",
    "MCD", "SBUX", "INTU", "GS", "MS", "BLK", "CAT", "GE", "LMT", "BKNG", "KO", "WMT",
];

/// Lowest price the walk may reach.
const MIN_PRICE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Walk {
    last: f64,
    previous_close: f64,
}

/// Random-walk market data for [`KNOWN_SYMBOLS`].
pub struct SimulatedProvider {
    walks: Mutex<HashMap<Symbol, Walk>>,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProvider {
    /// Creates a simulator with no price state.
    pub fn new() -> Self {
        Self {
            walks: Mutex::new(HashMap::new()),
        }
    }

    /// True when `symbol` is in the catalogue.
    pub fn knows(symbol: &Symbol) -> bool {
        KNOWN_SYMBOLS.contains(&symbol.as_str())
    }

    /// Next price one random step away from `current_price`, never below
    /// [`MIN_PRICE`].
    pub fn next_price<R: Rng + ?Sized>(rng: &mut R, current_price: f64) -> f64 {
        let change: f64 = rng.random_range(-0.01..0.01);
        (current_price * (1.0 + change)).max(MIN_PRICE)
    }

    fn check_known(symbol: &Symbol) -> Result<(), DataUnavailable> {
        if Self::knows(symbol) {
            Ok(())
        } else {
            Err(DataUnavailable::unknown_symbol(
                symbol.as_str(),
                "not in the simulated catalogue",
            ))
        }
    }

    fn seed(symbol: &Symbol, salt: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        salt.hash(&mut hasher);
        hasher.finish()
    }

    /// Stable starting price in `[20, 520)` for a ticker.
    fn base_price(symbol: &Symbol) -> f64 {
        let mut rng = StdRng::seed_from_u64(Self::seed(symbol, "base"));
        rng.random_range(20.0..520.0)
    }

    fn generate_series(symbol: &Symbol, window: HistoryWindow) -> HistoricalSeries {
        let step = window.sampling_interval();
        let now = Utc::now();
        let end = now.duration_trunc(step).unwrap_or(now);
        let count = window.lookback().num_seconds() / step.num_seconds().max(1);
        let mut rng = StdRng::seed_from_u64(Self::seed(symbol, window.range_token()));

        let mut price = Self::base_price(symbol);
        let points = (0..=count)
            .map(|i| {
                let timestamp = end - step * i32::try_from(count - i).unwrap_or(i32::MAX);
                price = Self::next_price(&mut rng, price);
                PricePoint::new(timestamp, price)
            })
            .collect();
        HistoricalSeries::new(symbol.clone(), window, points)
    }
}

impl MarketDataProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn quote(&self, symbol: &Symbol) -> Result<Quote, DataUnavailable> {
        Self::check_known(symbol)?;
        let mut walks = self.walks.lock().unwrap_or_else(PoisonError::into_inner);
        let walk = walks.entry(symbol.clone()).or_insert_with(|| {
            let base = Self::base_price(symbol);
            Walk {
                last: base,
                previous_close: base,
            }
        });
        walk.last = Self::next_price(&mut rand::rng(), walk.last);
        Ok(Quote::new(symbol.clone(), walk.last, walk.previous_close).with_currency("USD"))
    }

    fn history(&self, symbol: &Symbol, window: HistoryWindow) -> Result<HistoricalSeries, DataUnavailable> {
        Self::check_known(symbol)?;
        Ok(Self::generate_series(symbol, window))
    }

    fn info(&self, symbol: &Symbol) -> Result<StockInfo, DataUnavailable> {
        Self::check_known(symbol)?;
        let mut rng = StdRng::seed_from_u64(Self::seed(symbol, "info"));
        let year = Self::generate_series(symbol, HistoryWindow::OneYear);
        let day = Self::generate_series(symbol, HistoryWindow::OneDay);
        let (week_52_low, week_52_high) = year.price_bounds().unzip();
        let (day_low, day_high) = day.price_bounds().unzip();
        let shares: f64 = rng.random_range(1.0e8..1.6e10);

        Ok(StockInfo {
            symbol: Some(symbol.clone()),
            name: Some(format!("{} (simulated)", symbol)),
            market_cap: day.last().map(|point| point.price * shares),
            pe_ratio: Some(rng.random_range(8.0..60.0)),
            dividend_yield: rng.random_bool(0.6).then(|| rng.random_range(0.001..0.04)),
            week_52_high,
            week_52_low,
            day_high,
            day_low,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_common::UnavailableCause;

    #[test]
    fn next_price_stays_within_one_percent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let next = SimulatedProvider::next_price(&mut rng, 100.0);
            assert!((99.0..=101.0).contains(&next), "{next}");
        }
    }

    #[test]
    fn next_price_never_reaches_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(SimulatedProvider::next_price(&mut rng, 0.0) >= MIN_PRICE);
    }

    #[test]
    fn unknown_ticker_is_unavailable() {
        let provider = SimulatedProvider::new();
        let zzzz = Symbol::new("ZZZZ").unwrap();
        assert_eq!(provider.quote(&zzzz).unwrap_err().cause, UnavailableCause::UnknownSymbol);
        assert!(provider.history(&zzzz, HistoryWindow::OneDay).is_err());
        assert!(provider.info(&zzzz).is_err());
    }

    #[test]
    fn quotes_compare_against_a_fixed_previous_close() {
        let provider = SimulatedProvider::new();
        let aapl = Symbol::new("AAPL").unwrap();
        let first = provider.quote(&aapl).unwrap();
        let second = provider.quote(&aapl).unwrap();
        assert_eq!(first.previous_close(), second.previous_close());
    }

    #[test]
    fn history_is_evenly_sampled() {
        let provider = SimulatedProvider::new();
        let msft = Symbol::new("MSFT").unwrap();
        for window in [HistoryWindow::OneDay, HistoryWindow::OneMonth, HistoryWindow::OneYear] {
            let series = provider.history(&msft, window).unwrap();
            assert!(series.is_ascending());
            assert_eq!(series.max_gap(), Some(window.sampling_interval()));
        }
    }

    #[test]
    fn info_ranges_are_ordered() {
        let info = SimulatedProvider::new().info(&Symbol::new("NVDA").unwrap()).unwrap();
        assert!(info.week_52_low.unwrap() <= info.week_52_high.unwrap());
        assert!(info.day_low.unwrap() <= info.day_high.unwrap());
        assert!(info.market_cap.unwrap() > 0.0);
    }
}
