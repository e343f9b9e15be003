//! Historical price series and the lookback windows they are fetched for.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::symbol::Symbol;

/// Lookback window paired with a fixed sampling interval.
///
/// The string form (`1d`, `5d`, `1mo`, `6mo`, `1y`) is used in settings files
/// and as the provider's range token.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum HistoryWindow {
    /// Today at one-minute resolution.
    #[default]
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,
    /// Five sessions at five-minute resolution.
    #[strum(serialize = "5d")]
    #[serde(rename = "5d")]
    FiveDays,
    /// One month at hourly resolution.
    #[strum(serialize = "1mo")]
    #[serde(rename = "1mo")]
    OneMonth,
    /// Six months of daily closes.
    #[strum(serialize = "6mo")]
    #[serde(rename = "6mo")]
    SixMonths,
    /// One year of daily closes.
    #[strum(serialize = "1y")]
    #[serde(rename = "1y")]
    OneYear,
}

impl HistoryWindow {
    /// Provider range token.
    pub fn range_token(self) -> &'static str {
        match self {
            HistoryWindow::OneDay => "1d",
            HistoryWindow::FiveDays => "5d",
            HistoryWindow::OneMonth => "1mo",
            HistoryWindow::SixMonths => "6mo",
            HistoryWindow::OneYear => "1y",
        }
    }

    /// Provider interval token.
    pub fn interval_token(self) -> &'static str {
        match self {
            HistoryWindow::OneDay => "1m",
            HistoryWindow::FiveDays => "5m",
            HistoryWindow::OneMonth => "1h",
            HistoryWindow::SixMonths | HistoryWindow::OneYear => "1d",
        }
    }

    /// Spacing between consecutive samples.
    pub fn sampling_interval(self) -> TimeDelta {
        match self {
            HistoryWindow::OneDay => TimeDelta::minutes(1),
            HistoryWindow::FiveDays => TimeDelta::minutes(5),
            HistoryWindow::OneMonth => TimeDelta::hours(1),
            HistoryWindow::SixMonths | HistoryWindow::OneYear => TimeDelta::days(1),
        }
    }

    /// Total span covered by the window.
    pub fn lookback(self) -> TimeDelta {
        match self {
            HistoryWindow::OneDay => TimeDelta::days(1),
            HistoryWindow::FiveDays => TimeDelta::days(5),
            HistoryWindow::OneMonth => TimeDelta::days(30),
            HistoryWindow::SixMonths => TimeDelta::days(182),
            HistoryWindow::OneYear => TimeDelta::days(365),
        }
    }

    /// True when samples are finer than a day.
    pub fn is_intraday(self) -> bool {
        self.sampling_interval() < TimeDelta::days(1)
    }

    /// Human label for headers.
    pub fn label(self) -> &'static str {
        match self {
            HistoryWindow::OneDay => "Intraday",
            HistoryWindow::FiveDays => "5 Days",
            HistoryWindow::OneMonth => "1 Month",
            HistoryWindow::SixMonths => "6 Months",
            HistoryWindow::OneYear => "1 Year",
        }
    }

    /// The next window in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            HistoryWindow::OneDay => HistoryWindow::FiveDays,
            HistoryWindow::FiveDays => HistoryWindow::OneMonth,
            HistoryWindow::OneMonth => HistoryWindow::SixMonths,
            HistoryWindow::SixMonths => HistoryWindow::OneYear,
            HistoryWindow::OneYear => HistoryWindow::OneDay,
        }
    }
}

/// One `(timestamp, price)` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// Closing price for the sample interval.
    pub price: f64,
}

impl PricePoint {
    /// Creates a sample.
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Time-ordered prices for a symbol over a window.
///
/// Points are sorted by timestamp on construction (stable, so equal timestamps
/// keep provider order). Duplicates are kept as delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    symbol: Symbol,
    window: HistoryWindow,
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    /// Builds a series, ordering the points ascending by time.
    pub fn new(symbol: Symbol, window: HistoryWindow, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.timestamp);
        Self {
            symbol,
            window,
            points,
        }
    }

    /// Ticker the series is for.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Window the series was fetched for.
    pub fn window(&self) -> HistoryWindow {
        self.window
    }

    /// Samples in ascending time order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the provider returned no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest sample.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// True when timestamps never decrease.
    pub fn is_ascending(&self) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// Largest spacing between consecutive samples.
    pub fn max_gap(&self) -> Option<TimeDelta> {
        self.points
            .windows(2)
            .map(|pair| pair[1].timestamp - pair[0].timestamp)
            .max()
    }

    /// Lowest and highest price, `None` for an empty series.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut prices = self.points.iter().map(|point| point.price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(low, high), price| {
            (low.min(price), high.max(price))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap() + TimeDelta::minutes(minute)
    }

    #[test]
    fn construction_sorts_points_ascending() {
        let points = vec![
            PricePoint::new(at(2), 101.0),
            PricePoint::new(at(0), 100.0),
            PricePoint::new(at(1), 100.5),
        ];
        let series = HistoricalSeries::new(Symbol::new("MSFT").unwrap(), HistoryWindow::OneDay, points);
        assert!(series.is_ascending());
        assert_eq!(series.first().unwrap().price, 100.0);
        assert_eq!(series.last().unwrap().price, 101.0);
    }

    #[test]
    fn duplicate_timestamps_are_kept() {
        let points = vec![PricePoint::new(at(0), 1.0), PricePoint::new(at(0), 2.0)];
        let series = HistoricalSeries::new(Symbol::new("MSFT").unwrap(), HistoryWindow::OneDay, points);
        assert_eq!(series.len(), 2);
        assert!(series.is_ascending());
        assert_eq!(series.max_gap(), Some(TimeDelta::zero()));
    }

    #[test]
    fn bounds_and_gaps() {
        let points = vec![
            PricePoint::new(at(0), 10.0),
            PricePoint::new(at(1), 12.0),
            PricePoint::new(at(4), 9.0),
        ];
        let series = HistoricalSeries::new(Symbol::new("IBM").unwrap(), HistoryWindow::OneDay, points);
        assert_eq!(series.price_bounds(), Some((9.0, 12.0)));
        assert_eq!(series.max_gap(), Some(TimeDelta::minutes(3)));
    }

    #[test]
    fn empty_series_has_no_bounds() {
        let series = HistoricalSeries::new(Symbol::new("IBM").unwrap(), HistoryWindow::OneYear, Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.price_bounds(), None);
        assert_eq!(series.max_gap(), None);
    }

    #[test]
    fn window_tokens_parse_and_cycle() {
        assert_eq!("1MO".parse::<HistoryWindow>().unwrap(), HistoryWindow::OneMonth);
        assert_eq!(HistoryWindow::OneMonth.to_string(), "1mo");
        assert_eq!(HistoryWindow::OneMonth.interval_token(), "1h");
        assert_eq!(HistoryWindow::OneYear.next(), HistoryWindow::OneDay);
        assert!(HistoryWindow::FiveDays.is_intraday());
        assert!(!HistoryWindow::SixMonths.is_intraday());
    }
}
