//! Error types shared by the feed and the viewer.
//!
//! `DataUnavailable` is the one data error: whatever goes wrong between a fetch
//! request and a usable record ends up here. `StockError` unifies the startup
//! failures (configuration, symbol files, channels) so crates can propagate a
//! single error type.
use std::io;

use strum_macros::Display;
use thiserror::Error;

/// Why the provider could not produce a usable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnavailableCause {
    /// Connection, DNS, TLS, timeout or a non-success HTTP status.
    #[strum(serialize = "provider unreachable")]
    Unreachable,
    /// The provider does not know the symbol or returned no data for it.
    #[strum(serialize = "unknown symbol")]
    UnknownSymbol,
    /// The payload arrived but required fields were missing or invalid.
    #[strum(serialize = "malformed response")]
    Malformed,
}

/// Market data for a symbol could not be obtained.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("data unavailable for {symbol}: {cause} ({detail})")]
pub struct DataUnavailable {
    /// Ticker the request was made for.
    pub symbol: String,
    /// Failure category.
    pub cause: UnavailableCause,
    /// Human-readable detail from the transport or the parser.
    pub detail: String,
}

impl DataUnavailable {
    /// Builds an error for `symbol`.
    pub fn new(symbol: impl Into<String>, cause: UnavailableCause, detail: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            cause,
            detail: detail.into(),
        }
    }

    /// Shorthand for [`UnavailableCause::Unreachable`].
    pub fn unreachable(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(symbol, UnavailableCause::Unreachable, detail)
    }

    /// Shorthand for [`UnavailableCause::UnknownSymbol`].
    pub fn unknown_symbol(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(symbol, UnavailableCause::UnknownSymbol, detail)
    }

    /// Shorthand for [`UnavailableCause::Malformed`].
    pub fn malformed(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(symbol, UnavailableCause::Malformed, detail)
    }

    /// Short text suitable for a card placeholder.
    pub fn placeholder(&self) -> String {
        format!("Data unavailable ({})", self.cause)
    }
}

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum StockError {
    /// I/O error while reading configuration or symbol files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML settings could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Settings parsed but failed validation.
    #[error("Invalid config: {0}")]
    Config(String),

    /// A ticker string does not look like a ticker.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Error while parsing the symbols file.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),

    /// The HTTP transport could not be set up.
    #[error("Transport setup failed: {0}")]
    Transport(String),

    /// The provider could not deliver data.
    #[error(transparent)]
    Data(#[from] DataUnavailable),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_names_the_cause() {
        let err = DataUnavailable::unknown_symbol("ZZZZ", "empty result");
        assert_eq!(err.placeholder(), "Data unavailable (unknown symbol)");
        assert_eq!(
            err.to_string(),
            "data unavailable for ZZZZ: unknown symbol (empty result)"
        );
    }

    #[test]
    fn data_errors_convert_into_stock_error() {
        let err: StockError = DataUnavailable::unreachable("AAPL", "connection refused").into();
        assert!(matches!(&err, StockError::Data(d) if d.cause == UnavailableCause::Unreachable));
        assert!(err.to_string().contains("provider unreachable"));
    }
}
