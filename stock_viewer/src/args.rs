//! Command-line arguments for the stock viewer.
//!
//! Every flag is optional; with none the viewer uses built-in settings and the
//! Yahoo Finance provider.
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use stock_common::config::ProviderKind;
use stock_common::symbol::SymbolParser;
use stock_common::{Result, Settings, Symbol};

/// Parsed command-line arguments.
#[derive(Debug, Default, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML settings file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Path to a text file with symbols to show, replacing the configured list.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub symbols: Option<PathBuf>,

    /// Use simulated prices instead of a network provider.
    #[clap(long)]
    pub offline: bool,

    /// Where to write the log; the terminal is owned by the UI.
    #[clap(long, default_value = "stock_viewer.log")]
    pub log_file: PathBuf,
}

impl Args {
    /// Builds the immutable settings: defaults, then the settings file, then
    /// flag overrides.
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(path) = &self.symbols {
            let reader = BufReader::new(File::open(path)?);
            settings = settings.with_symbols(Symbol::parse_from_file(reader)?);
        }
        if self.offline {
            settings.provider.kind = ProviderKind::Simulated;
        }
        settings.validate()?;
        Ok(settings)
    }
}
