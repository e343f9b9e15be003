//! Ticker symbols and helpers for reading symbol lists.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StockError;

/// Longest ticker accepted, exchange suffix included (e.g. `BRK-B`, `SHOP.TO`).
const MAX_SYMBOL_LEN: usize = 12;

/// Stock ticker identifier, normalized to upper case.
///
/// Only the shape is checked here. Whether a provider knows the ticker is
/// decided at fetch time, so `ZZZZ` is a valid `Symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parses and normalizes a ticker.
    pub fn new(raw: &str) -> Result<Self, StockError> {
        let normalized = raw.trim().to_ascii_uppercase();
        let valid_chars = normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if normalized.is_empty() || normalized.len() > MAX_SYMBOL_LEN || !valid_chars {
            return Err(StockError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The ticker text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trait providing file parsing for symbol lists.
pub trait SymbolParser: Sized {
    /// Parses symbols from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines. Empty
    /// entries are skipped and duplicates keep their first position. Returns an
    /// error if any entry is not a valid ticker.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, StockError>;
}

impl SymbolParser for Symbol {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, StockError> {
        let mut symbols: Vec<Symbol> = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(StockError::Io)?;
            let entries = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|entry| !entry.is_empty());

            for entry in entries {
                match entry.parse::<Self>() {
                    Ok(symbol) if !symbols.contains(&symbol) => symbols.push(symbol),
                    Ok(_) => {}
                    Err(e) => return Err(StockError::ParseSymbolsFile(e.to_string())),
                }
            }
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn normalizes_case_and_whitespace() {
        let symbol = Symbol::new("  aapl ").unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn accepts_exchange_suffixes() {
        assert!(Symbol::new("BRK-B").is_ok());
        assert!(Symbol::new("SHOP.TO").is_ok());
        assert!(Symbol::new("^GSPC").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Symbol::new(""), Err(StockError::InvalidSymbol(_))));
        assert!(matches!(Symbol::new("AA PL"), Err(StockError::InvalidSymbol(_))));
        assert!(matches!(Symbol::new("TOOLONGTICKER1"), Err(StockError::InvalidSymbol(_))));
    }

    #[test]
    fn unknown_but_well_formed_ticker_is_valid() {
        assert_eq!(Symbol::new("zzzz").unwrap().to_string(), "ZZZZ");
    }

    #[test]
    fn parses_mixed_separators_and_dedups() {
        let input = "AAPL, msft\n\nnvda TSLA,,AAPL\n";
        let symbols = Symbol::parse_from_file(Cursor::new(input)).unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "NVDA", "TSLA"]);
    }

    #[test]
    fn file_with_bad_entry_fails() {
        let input = "AAPL\nnot/a/ticker\n";
        let err = Symbol::parse_from_file(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, StockError::ParseSymbolsFile(_)));
    }

    #[test]
    fn serde_round_trips_through_plain_strings() {
        let symbols: Vec<Symbol> = serde_json::from_str(r#"["ibm","orcl"]"#).unwrap();
        assert_eq!(symbols[0].as_str(), "IBM");
        assert_eq!(serde_json::to_string(&symbols).unwrap(), r#"["IBM","ORCL"]"#);
    }
}
