//! Background fetch worker and its request/event channels.
//!
//! `FeedWorker::start` moves a [`StockDataManager`] onto a dedicated thread and
//! returns a [`FeedHandle`]. The UI sends [`FeedRequest`]s and drains
//! [`FeedEvent`]s without ever blocking on the network.
//!
//! Event model:
//! - `FeedEvent::Quote` — one per symbol of a refresh, in request order.
//! - `FeedEvent::RefreshFinished` — the last symbol of a refresh was handled.
//! - `FeedEvent::History` / `FeedEvent::Info` — detail-view data.
//!
//! Design notes:
//! - Requests are served strictly one at a time in arrival order; a refresh of
//!   many cards is still a sequence of single-symbol round trips.
//! - There is no cancellation of a fetch in flight. While running, a queued
//!   request is always served and the UI decides whether the result is still
//!   relevant.
//! - `FeedHandle::shutdown` raises a stop flag: the fetch in flight finishes,
//!   then everything still queued (including the rest of a refresh) is dropped.
//! - The worker also stops on `FeedRequest::Shutdown`, when every request
//!   sender is dropped, or when the event receiver is gone.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryIter, unbounded};
use log::{debug, error, info};
use stock_common::model::{HistoricalSeries, HistoryWindow, Quote, StockInfo};
use stock_common::{DataUnavailable, Result, StockError, Symbol};

use crate::manager::StockDataManager;

/// Work for the feed thread.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRequest {
    /// Fetch a quote for each symbol, in order.
    RefreshQuotes(Vec<Symbol>),
    /// Fetch the series for a detail chart.
    LoadHistory {
        /// Ticker to chart.
        symbol: Symbol,
        /// Lookback window.
        window: HistoryWindow,
    },
    /// Fetch detail-panel facts.
    LoadInfo(Symbol),
    /// Stop the worker.
    Shutdown,
}

/// Result delivered back to the UI thread.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Outcome of one quote fetch.
    Quote {
        /// Ticker the fetch was for.
        symbol: Symbol,
        /// Quote or the reason it is unavailable.
        result: Result<Quote, DataUnavailable>,
    },
    /// Every symbol of a `RefreshQuotes` request has been handled.
    RefreshFinished,
    /// Outcome of a history fetch.
    History {
        /// Ticker the fetch was for.
        symbol: Symbol,
        /// Window the fetch was for.
        window: HistoryWindow,
        /// Series or the reason it is unavailable.
        result: Result<HistoricalSeries, DataUnavailable>,
    },
    /// Outcome of an info fetch.
    Info {
        /// Ticker the fetch was for.
        symbol: Symbol,
        /// Facts or the reason they are unavailable.
        result: Result<StockInfo, DataUnavailable>,
    },
}

/// UI-side ends of the worker channels.
pub struct FeedHandle {
    requests: Sender<FeedRequest>,
    events: Receiver<FeedEvent>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Queues a request.
    pub fn send(&self, request: FeedRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|e| StockError::ChannelSend(e.to_string()))
    }

    /// Queues several requests in order.
    pub fn send_all(&self, requests: impl IntoIterator<Item = FeedRequest>) -> Result<()> {
        requests.into_iter().try_for_each(|request| self.send(request))
    }

    /// Receiver for use in `select!` or blocking waits.
    pub fn events(&self) -> &Receiver<FeedEvent> {
        &self.events
    }

    /// Drains the events available right now.
    pub fn try_events(&self) -> TryIter<'_, FeedEvent> {
        self.events.try_iter()
    }

    /// Stops the worker and waits for the thread to exit.
    ///
    /// The fetch in flight finishes first; queued requests are dropped.
    /// Calling this twice is harmless.
    pub fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.stop.store(true, Ordering::Relaxed);
        // wakes a worker idle on an empty queue; it may already be gone
        let _ = self.requests.send(FeedRequest::Shutdown);
        if thread.join().is_err() {
            error!("Feed worker panicked");
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Background thread serving [`FeedRequest`]s.
pub struct FeedWorker;

impl FeedWorker {
    /// Starts the worker thread and returns the UI-side handle.
    pub fn start(manager: StockDataManager) -> FeedHandle {
        let (request_tx, request_rx) = unbounded::<FeedRequest>();
        let (event_tx, event_rx) = unbounded::<FeedEvent>();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = thread::spawn(move || {
            info!(
                "Feed worker started (Thread ID: {:?}, provider: {})",
                thread::current().id(),
                manager.provider_name()
            );
            for request in request_rx.iter() {
                if stop_flag.load(Ordering::Relaxed) {
                    debug!("Stop requested, dropping {} queued requests", request_rx.len() + 1);
                    break;
                }
                if Self::handle(&manager, request, &event_tx, &stop_flag).is_err() {
                    break;
                }
            }
            info!("Feed worker stopping...");
        });

        FeedHandle {
            requests: request_tx,
            events: event_rx,
            stop,
            thread: Some(thread),
        }
    }

    /// Serves one request. `Err` means the worker should stop.
    fn handle(
        manager: &StockDataManager,
        request: FeedRequest,
        events: &Sender<FeedEvent>,
        stop: &AtomicBool,
    ) -> std::result::Result<(), ()> {
        let emit = |event: FeedEvent| {
            events.send(event).map_err(|e| {
                debug!("Event receiver dropped: {}", e);
            })
        };

        match request {
            FeedRequest::RefreshQuotes(symbols) => {
                for symbol in symbols {
                    if stop.load(Ordering::Relaxed) {
                        return Err(());
                    }
                    let result = manager.get_quote(&symbol);
                    emit(FeedEvent::Quote { symbol, result })?;
                }
                emit(FeedEvent::RefreshFinished)
            }
            FeedRequest::LoadHistory { symbol, window } => {
                let result = manager.get_history(&symbol, window);
                emit(FeedEvent::History {
                    symbol,
                    window,
                    result,
                })
            }
            FeedRequest::LoadInfo(symbol) => {
                let result = manager.get_info(&symbol);
                emit(FeedEvent::Info { symbol, result })
            }
            FeedRequest::Shutdown => Err(()),
        }
    }
}
