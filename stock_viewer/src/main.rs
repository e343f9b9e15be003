//! Stock Viewer: a terminal grid of stock quotes with a detail view per symbol.
//!
//! The UI thread owns the terminal and the view-model. A single feed worker
//! thread performs every network fetch and reports back over a channel, so a
//! slow provider never freezes input or drawing.
//!
//! Usage example (CLI):
//! ```bash
//! stock_viewer --config ./config/stock_viewer.toml --symbols ./tickers.txt
//! stock_viewer --offline
//! ```
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event};
use log::{error, info};
use ratatui::DefaultTerminal;
use stock_common::{Result, Settings, StockError};
use stock_feed::{FeedHandle, FeedRequest, FeedWorker, StockDataManager};
use stock_viewer::input::key_action;
use stock_viewer::theme::Theme;
use stock_viewer::{Action, App, Args, ui};

/// How long to wait for a key before checking feed events and timers.
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<(), StockError> {
    let args = Args::parse();
    init_logger(&args.log_file)?;

    let settings = Arc::new(args.load_settings().inspect_err(|e| error!("Invalid settings: {}", e))?);
    info!(
        "Starting with {} symbols, provider {:?}",
        settings.symbols.len(),
        settings.provider.kind
    );

    let manager = StockDataManager::from_settings(&settings.provider)?;
    let mut feed = FeedWorker::start(manager);
    let mut app = App::new(Arc::clone(&settings));
    let theme = Theme::from_palette(&settings.display.palette);

    let mut terminal = ratatui::try_init()?;
    let result = run(&mut terminal, &mut app, &feed, &theme, &settings);
    ratatui::restore();
    feed.shutdown();

    if let Err(e) = &result {
        error!("Viewer stopped: {}", e);
    }
    info!("Bye");
    result
}

/// Draw, read input, apply feed results and fire refresh timers until quit.
fn run(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    feed: &FeedHandle,
    theme: &Theme,
    settings: &Settings,
) -> Result<()> {
    let price_interval = settings.price_interval();
    let chart_interval = settings.chart_interval();
    let mut next_quotes = Instant::now();
    let mut next_chart = Instant::now() + chart_interval;

    while !app.should_quit() {
        let now = Instant::now();
        if now >= next_quotes {
            feed.send_all(app.dispatch(Action::RefreshQuotes))?;
            next_quotes = now + price_interval;
        }
        if now >= next_chart {
            feed.send_all(app.dispatch(Action::RefreshChart))?;
            next_chart = now + chart_interval;
        }

        for event in feed.try_events() {
            app.dispatch(Action::Feed(event));
        }

        terminal.draw(|frame| ui::render(frame, app, theme))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = key_action(key, app.screen()) {
                    let requests = app.dispatch(action);
                    // a fresh chart load restarts the chart timer
                    if requests.iter().any(|r| matches!(r, FeedRequest::LoadHistory { .. })) {
                        next_chart = Instant::now() + chart_interval;
                    }
                    feed.send_all(requests)?;
                }
            }
        }
    }
    Ok(())
}

/// Logs go to a file because the terminal belongs to the UI.
/// `RUST_LOG` overrides the default `info` level.
fn init_logger(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
