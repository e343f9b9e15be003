//! View-model and the single dispatch function.
//!
//! Everything the screen shows lives in [`App`]. Input, timers and feed results
//! all arrive as [`Action`] values; [`App::dispatch`] applies one action and
//! returns the fetch requests it implies. No I/O happens here, so the whole
//! presentation flow can be driven from tests.
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::debug;
use stock_common::model::{HistoricalSeries, HistoryWindow, Quote, StockInfo};
use stock_common::{DataUnavailable, Settings, Symbol};
use stock_feed::{FeedEvent, FeedRequest};

/// Something that happened: a key, a timer, or a feed result.
#[derive(Debug, Clone)]
pub enum Action {
    /// Selection one card left.
    MoveLeft,
    /// Selection one card right.
    MoveRight,
    /// Selection one row up.
    MoveUp,
    /// Selection one row down.
    MoveDown,
    /// Open the selected card.
    Open,
    /// Show the detail view for a symbol.
    SymbolSelected(Symbol),
    /// Return to the grid.
    Back,
    /// Switch the detail chart to the next window.
    CycleWindow,
    /// Refetch every card's quote.
    RefreshQuotes,
    /// Refetch the open chart.
    RefreshChart,
    /// A result from the feed worker.
    Feed(FeedEvent),
    /// Leave the application.
    Quit,
}

/// Fetch state of one displayed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// Request issued, nothing received yet.
    Loading,
    /// Last successful value.
    Ready(T),
    /// Last fetch failed; the text is shown instead of the value.
    Unavailable(String),
}

impl<T> Slot<T> {
    fn from_result(result: Result<T, DataUnavailable>) -> Self {
        match result {
            Ok(value) => Slot::Ready(value),
            Err(e) => Slot::Unavailable(e.placeholder()),
        }
    }

    /// The value when ready.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// One card of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Ticker shown on the card.
    pub symbol: Symbol,
    /// Latest quote state.
    pub quote: Slot<Quote>,
}

/// Detail view for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    /// Ticker being shown.
    pub symbol: Symbol,
    /// Chart window.
    pub window: HistoryWindow,
    /// Chart data.
    pub chart: Slot<HistoricalSeries>,
    /// Detail-panel data.
    pub info: Slot<StockInfo>,
}

impl DetailView {
    /// A detail view with chart and panel still loading.
    pub fn new(symbol: Symbol, window: HistoryWindow) -> Self {
        Self {
            symbol,
            window,
            chart: Slot::Loading,
            info: Slot::Loading,
        }
    }

    fn history_request(&self) -> FeedRequest {
        FeedRequest::LoadHistory {
            symbol: self.symbol.clone(),
            window: self.window,
        }
    }
}

/// Which screen is visible.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Card grid.
    Grid,
    /// Chart and detail panel.
    Detail(DetailView),
}

/// Presentation state owned by the UI thread.
#[derive(Debug)]
pub struct App {
    settings: Arc<Settings>,
    cards: Vec<Card>,
    selected: usize,
    screen: Screen,
    refreshing: bool,
    last_refresh: Option<DateTime<Local>>,
    should_quit: bool,
}

impl App {
    /// One loading card per configured symbol, grid visible.
    pub fn new(settings: Arc<Settings>) -> Self {
        let cards = settings
            .symbols
            .iter()
            .map(|symbol| Card {
                symbol: symbol.clone(),
                quote: Slot::Loading,
            })
            .collect();
        Self {
            settings,
            cards,
            selected: 0,
            screen: Screen::Grid,
            refreshing: false,
            last_refresh: None,
            should_quit: false,
        }
    }

    /// Shared settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Cards in configured order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Index of the highlighted card.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Visible screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// True while a quote refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// When the last quote refresh completed.
    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Card for `symbol`, if configured.
    pub fn card(&self, symbol: &Symbol) -> Option<&Card> {
        self.cards.iter().find(|card| &card.symbol == symbol)
    }

    /// Applies `action` and returns the fetches to issue, in order.
    pub fn dispatch(&mut self, action: Action) -> Vec<FeedRequest> {
        match action {
            Action::MoveLeft => self.move_horizontal(-1),
            Action::MoveRight => self.move_horizontal(1),
            Action::MoveUp => self.move_vertical(-1),
            Action::MoveDown => self.move_vertical(1),
            Action::Open => {
                if matches!(self.screen, Screen::Grid) {
                    if let Some(card) = self.cards.get(self.selected) {
                        let symbol = card.symbol.clone();
                        return self.dispatch(Action::SymbolSelected(symbol));
                    }
                }
                Vec::new()
            }
            Action::SymbolSelected(symbol) => self.open_detail(symbol),
            Action::Back => {
                self.screen = Screen::Grid;
                Vec::new()
            }
            Action::CycleWindow => match &mut self.screen {
                Screen::Detail(detail) => {
                    detail.window = detail.window.next();
                    detail.chart = Slot::Loading;
                    vec![detail.history_request()]
                }
                Screen::Grid => Vec::new(),
            },
            Action::RefreshQuotes => {
                if self.refreshing {
                    debug!("Refresh already in flight, skipping");
                    return Vec::new();
                }
                self.refreshing = true;
                let symbols = self.cards.iter().map(|card| card.symbol.clone()).collect();
                vec![FeedRequest::RefreshQuotes(symbols)]
            }
            Action::RefreshChart => match &self.screen {
                Screen::Detail(detail) => vec![detail.history_request()],
                Screen::Grid => Vec::new(),
            },
            Action::Feed(event) => {
                self.apply_feed(event);
                Vec::new()
            }
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
        }
    }

    fn open_detail(&mut self, symbol: Symbol) -> Vec<FeedRequest> {
        if let Some(index) = self.cards.iter().position(|card| card.symbol == symbol) {
            self.selected = index;
        }
        let detail = DetailView::new(symbol.clone(), self.settings.provider.history_window);
        let requests = vec![detail.history_request(), FeedRequest::LoadInfo(symbol)];
        self.screen = Screen::Detail(detail);
        requests
    }

    fn apply_feed(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Quote { symbol, result } => {
                match self.cards.iter_mut().find(|card| card.symbol == symbol) {
                    Some(card) => {
                        // a failed refresh replaces a stale price with the placeholder
                        card.quote = Slot::from_result(result);
                    }
                    None => debug!("Quote for {} has no card", symbol),
                }
            }
            FeedEvent::RefreshFinished => {
                self.refreshing = false;
                self.last_refresh = Some(Local::now());
            }
            FeedEvent::History {
                symbol,
                window,
                result,
            } => match &mut self.screen {
                Screen::Detail(detail) if detail.symbol == symbol && detail.window == window => {
                    detail.chart = Slot::from_result(result);
                }
                _ => debug!("Dropping stale {} history for {}", window, symbol),
            },
            FeedEvent::Info { symbol, result } => match &mut self.screen {
                Screen::Detail(detail) if detail.symbol == symbol => {
                    detail.info = Slot::from_result(result);
                }
                _ => debug!("Dropping stale info for {}", symbol),
            },
        }
    }

    fn columns(&self) -> usize {
        self.settings.display.grid_columns.max(1)
    }

    fn move_horizontal(&mut self, delta: isize) -> Vec<FeedRequest> {
        if matches!(self.screen, Screen::Grid) && !self.cards.is_empty() {
            let columns = self.columns();
            let row_start = self.selected - self.selected % columns;
            let row_len = columns.min(self.cards.len() - row_start);
            let column = (self.selected - row_start) as isize;
            let next = (column + delta).rem_euclid(row_len as isize) as usize;
            self.selected = row_start + next;
        }
        Vec::new()
    }

    fn move_vertical(&mut self, delta: isize) -> Vec<FeedRequest> {
        if matches!(self.screen, Screen::Grid) && !self.cards.is_empty() {
            let columns = self.columns();
            let rows = self.cards.len().div_ceil(columns);
            let column = self.selected % columns;
            let mut row = self.selected / columns;
            // skip rows too short to have this column
            for _ in 0..rows {
                row = (row as isize + delta).rem_euclid(rows as isize) as usize;
                if row * columns + column < self.cards.len() {
                    break;
                }
            }
            self.selected = (row * columns + column).min(self.cards.len() - 1);
        }
        Vec::new()
    }
}
