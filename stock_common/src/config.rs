//! Immutable application settings.
//!
//! Settings are read once at startup (built-in defaults, optionally overlaid by
//! a TOML file) and then shared read-only with the feed and the viewer. Every
//! section has defaults, so a file only needs the keys it changes:
//!
//! ```toml
//! symbols = ["AAPL", "MSFT", "ZZZZ"]
//!
//! [refresh]
//! price_interval_secs = 15
//!
//! [provider]
//! kind = "simulated"
//! history_window = "1mo"
//! ```
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::model::HistoryWindow;
use crate::result::Result;
use crate::symbol::Symbol;

/// Tickers shown when no list is configured.
pub const DEFAULT_SYMBOLS: [&str; 15] = [
    "AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "GOOG", "META", "NFLX", "AMD", "INTC", "CSCO",
    "ADBE", "CRM", "ORCL", "IBM",
];

/// Public Yahoo Finance endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Symbols in card order.
    pub symbols: Vec<Symbol>,
    /// Layout and colors.
    pub display: DisplaySettings,
    /// Refresh cadence.
    pub refresh: RefreshSettings,
    /// Market-data source.
    pub provider: ProviderSettings,
}

/// Layout and palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Cards per grid row.
    pub grid_columns: usize,
    /// Color palette as `#rrggbb` strings.
    pub palette: Palette,
}

/// Named colors as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Screen background.
    pub background: String,
    /// Header and footer bars.
    pub frame: String,
    /// Card background.
    pub card: String,
    /// Primary text.
    pub text: String,
    /// Axis labels and secondary text.
    pub secondary_text: String,
    /// Price above previous close.
    pub up: String,
    /// Price below previous close.
    pub down: String,
    /// Unchanged or unknown.
    pub neutral: String,
    /// Selection and chart line.
    pub accent: String,
    /// Card and chart borders.
    pub border: String,
}

/// How often data is refetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Seconds between quote refreshes of the card grid.
    pub price_interval_secs: u64,
    /// Seconds between chart refreshes while a detail view is open.
    pub chart_interval_secs: u64,
}

/// Which provider to use and how to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider implementation.
    pub kind: ProviderKind,
    /// Base URL for HTTP providers.
    pub base_url: String,
    /// Request timeout; the transport default applies when unset.
    pub timeout_secs: Option<u64>,
    /// Window a detail chart opens with.
    pub history_window: HistoryWindow,
}

/// Available market-data providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Yahoo Finance over HTTPS.
    #[default]
    Yahoo,
    /// Offline random-walk generator.
    Simulated,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS
                .iter()
                .filter_map(|raw| Symbol::new(raw).ok())
                .collect(),
            display: DisplaySettings::default(),
            refresh: RefreshSettings::default(),
            provider: ProviderSettings::default(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            grid_columns: 3,
            palette: Palette::default(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#0f172a".into(),
            frame: "#1e293b".into(),
            card: "#334155".into(),
            text: "#ffffff".into(),
            secondary_text: "#cbd5e1".into(),
            up: "#10b981".into(),
            down: "#ef4444".into(),
            neutral: "#64748b".into(),
            accent: "#3b82f6".into(),
            border: "#475569".into(),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            price_interval_secs: 30,
            chart_interval_secs: 60,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: None,
            history_window: HistoryWindow::default(),
        }
    }
}

impl Settings {
    /// Reads and validates a TOML settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(text)?;
        settings.symbols = dedup_symbols(settings.symbols);
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the invariants the viewer relies on.
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(StockError::Config("at least one symbol is required".into()));
        }
        if self.display.grid_columns == 0 {
            return Err(StockError::Config("display.grid_columns must be at least 1".into()));
        }
        if self.refresh.price_interval_secs == 0 || self.refresh.chart_interval_secs == 0 {
            return Err(StockError::Config("refresh intervals must be at least 1 second".into()));
        }
        if self.provider.timeout_secs == Some(0) {
            return Err(StockError::Config("provider.timeout_secs must be at least 1".into()));
        }
        for (name, value) in self.display.palette.entries() {
            if parse_hex_color(value).is_none() {
                return Err(StockError::Config(format!(
                    "palette.{name} is not a #rrggbb color: {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// Replaces the symbol list, keeping everything else.
    /// Repeated tickers keep their first position.
    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = dedup_symbols(symbols);
        self
    }

    /// Quote refresh period.
    pub fn price_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.price_interval_secs)
    }

    /// Chart refresh period.
    pub fn chart_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.chart_interval_secs)
    }
}

impl Palette {
    /// `(key, value)` pairs for every color.
    pub fn entries(&self) -> [(&'static str, &str); 10] {
        [
            ("background", self.background.as_str()),
            ("frame", self.frame.as_str()),
            ("card", self.card.as_str()),
            ("text", self.text.as_str()),
            ("secondary_text", self.secondary_text.as_str()),
            ("up", self.up.as_str()),
            ("down", self.down.as_str()),
            ("neutral", self.neutral.as_str()),
            ("accent", self.accent.as_str()),
            ("border", self.border.as_str()),
        ]
    }
}

/// One card per ticker: `AAPL` and `aapl` are the same symbol.
fn dedup_symbols(symbols: Vec<Symbol>) -> Vec<Symbol> {
    let mut unique: Vec<Symbol> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !unique.contains(&symbol) {
            unique.push(symbol);
        }
    }
    unique
}

/// Parses `#rrggbb` into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_dashboard() {
        let settings = Settings::default();
        assert_eq!(settings.symbols.len(), 15);
        assert_eq!(settings.symbols[0].as_str(), "AAPL");
        assert_eq!(settings.display.grid_columns, 3);
        assert_eq!(settings.price_interval(), Duration::from_secs(30));
        assert_eq!(settings.chart_interval(), Duration::from_secs(60));
        assert_eq!(settings.provider.kind, ProviderKind::Yahoo);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            symbols = ["aapl", "zzzz"]

            [refresh]
            price_interval_secs = 5

            [provider]
            kind = "simulated"
            history_window = "1mo"
            "#,
        )
        .unwrap();
        assert_eq!(settings.symbols[1].as_str(), "ZZZZ");
        assert_eq!(settings.refresh.price_interval_secs, 5);
        assert_eq!(settings.refresh.chart_interval_secs, 60);
        assert_eq!(settings.provider.kind, ProviderKind::Simulated);
        assert_eq!(settings.provider.history_window, HistoryWindow::OneMonth);
        assert_eq!(settings.display.palette.up, "#10b981");
    }

    #[test]
    fn invalid_symbol_in_file_is_a_parse_error() {
        let err = Settings::from_toml_str(r#"symbols = ["not a ticker"]"#).unwrap_err();
        assert!(matches!(err, StockError::ConfigParse(_)));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let err = Settings::from_toml_str("symbols = []").unwrap_err();
        assert!(matches!(err, StockError::Config(_)));

        let err = Settings::from_toml_str("[display]\ngrid_columns = 0").unwrap_err();
        assert!(matches!(err, StockError::Config(_)));

        let err = Settings::from_toml_str("[display.palette]\nup = \"green\"").unwrap_err();
        assert!(err.to_string().contains("palette.up"));
    }

    #[test]
    fn repeated_symbols_are_collapsed() {
        let settings = Settings::from_toml_str(r#"symbols = ["AAPL", "aapl", "MSFT", "AAPL"]"#).unwrap();
        let names: Vec<&str> = settings.symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT"]);

        let symbols = ["IBM", "ibm", "ORCL"].iter().map(|s| Symbol::new(s).unwrap()).collect();
        assert_eq!(Settings::default().with_symbols(symbols).symbols.len(), 2);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#0f172a"), Some((0x0f, 0x17, 0x2a)));
        assert_eq!(parse_hex_color("0f172a"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#+f+f+f"), None);
    }
}
