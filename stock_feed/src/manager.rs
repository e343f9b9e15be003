//! `StockDataManager`: the single entry point to market data.
//!
//! The manager owns one provider and exposes the three fetch operations the
//! viewer needs. Every call is an independent synchronous round trip; nothing
//! is cached, retried or batched. Failures of any kind come back as
//! [`DataUnavailable`] and are logged here once.
use std::time::Duration;

use log::{debug, info, warn};
use stock_common::config::{ProviderKind, ProviderSettings};
use stock_common::model::{HistoricalSeries, HistoryWindow, Quote, StockInfo};
use stock_common::{DataUnavailable, Result, Symbol};

use crate::provider::{MarketDataProvider, SimulatedProvider, YahooProvider};

/// Decouples callers from the provider's response shape.
pub struct StockDataManager {
    provider: Box<dyn MarketDataProvider>,
}

impl StockDataManager {
    /// Wraps an already-built provider.
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        info!("Market data provider: {}", provider.name());
        Self { provider }
    }

    /// Builds the provider described by `settings`.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        let provider: Box<dyn MarketDataProvider> = match settings.kind {
            ProviderKind::Yahoo => Box::new(YahooProvider::new(
                &settings.base_url,
                settings.timeout_secs.map(Duration::from_secs),
            )?),
            ProviderKind::Simulated => Box::new(SimulatedProvider::new()),
        };
        Ok(Self::new(provider))
    }

    /// Name of the wrapped provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Current price, previous close and direction for `symbol`.
    pub fn get_quote(&self, symbol: &Symbol) -> Result<Quote, DataUnavailable> {
        debug!("Fetching quote for {}", symbol);
        let result = self.provider.quote(symbol);
        match &result {
            Ok(quote) => debug!(
                "QUOTE: {} Price={:.2} PrevClose={:.2} Direction={}",
                symbol,
                quote.price(),
                quote.previous_close(),
                quote.direction()
            ),
            Err(e) => warn!("{}", e),
        }
        result
    }

    /// Ascending price series for `symbol` over `window`.
    pub fn get_history(&self, symbol: &Symbol, window: HistoryWindow) -> Result<HistoricalSeries, DataUnavailable> {
        debug!("Fetching {} history for {}", window, symbol);
        let result = self.provider.history(symbol, window);
        match &result {
            Ok(series) => debug!("HISTORY: {} window={} points={}", symbol, window, series.len()),
            Err(e) => warn!("{}", e),
        }
        result
    }

    /// Detail-panel facts for `symbol`.
    pub fn get_info(&self, symbol: &Symbol) -> Result<StockInfo, DataUnavailable> {
        debug!("Fetching info for {}", symbol);
        let result = self.provider.info(symbol);
        if let Err(e) = &result {
            warn!("{}", e);
        }
        result
    }
}
