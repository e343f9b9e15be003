//! Yahoo Finance provider.
//!
//! Quotes and history come from the chart API
//! (`/v8/finance/chart/{symbol}?range=..&interval=..`). Detail facts come from
//! the quote API (`/v7/finance/quote?symbols=..`); when that endpoint refuses
//! the request the day and 52-week ranges from the chart metadata are used
//! instead.
//!
//! Response handling is split from the transport so the parsing rules can be
//! exercised without a network:
//! - HTTP 404, a `chart.error` object or an empty `result` is an unknown symbol.
//! - Any other non-success status, or a transport failure, is unreachable.
//! - A body that does not decode, or lacks required fields, is malformed.
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use stock_common::model::{HistoricalSeries, HistoryWindow, PricePoint, Quote, StockInfo};
use stock_common::{DataUnavailable, StockError, Symbol};

use super::MarketDataProvider;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Range/interval for requests that only read chart metadata (quotes, info).
/// A single daily bar keeps the payload small.
const META_RANGE: (&str, &str) = ("1d", "1d");

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<String>,
    description: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => "provider error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    regular_market_time: Option<i64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<IndicatorQuote>,
}

#[derive(Debug, Deserialize)]
struct IndicatorQuote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteEnvelope {
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    result: Option<Vec<QuoteResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    short_name: Option<String>,
    long_name: Option<String>,
    market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    trailing_annual_dividend_yield: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
}

/// Blocking Yahoo Finance client.
pub struct YahooProvider {
    base_url: String,
    client: Client,
}

impl YahooProvider {
    /// Builds a client for `base_url`. Without `timeout` the transport default
    /// applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, StockError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StockError::Transport(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Uses a preconfigured HTTP client.
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn get(
        &self,
        symbol: &Symbol,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<(u16, String), DataUnavailable> {
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| DataUnavailable::unreachable(symbol.as_str(), e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| DataUnavailable::unreachable(symbol.as_str(), e.to_string()))?;
        Ok((status, body))
    }

    fn fetch_chart(
        &self,
        symbol: &Symbol,
        (range, interval): (&str, &str),
    ) -> Result<ChartResult, DataUnavailable> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let (status, body) = self.get(symbol, &url, &[("range", range), ("interval", interval)])?;
        parse_chart(symbol, status, &body)
    }

    fn fetch_quote_info(&self, symbol: &Symbol) -> Result<StockInfo, DataUnavailable> {
        let url = format!("{}/v7/finance/quote", self.base_url);
        let (status, body) = self.get(symbol, &url, &[("symbols", symbol.as_str())])?;
        parse_quote_info(symbol, status, &body)
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn quote(&self, symbol: &Symbol) -> Result<Quote, DataUnavailable> {
        let chart = self.fetch_chart(symbol, META_RANGE)?;
        quote_from_chart(symbol, &chart)
    }

    fn history(&self, symbol: &Symbol, window: HistoryWindow) -> Result<HistoricalSeries, DataUnavailable> {
        let chart = self.fetch_chart(symbol, (window.range_token(), window.interval_token()))?;
        series_from_chart(symbol, window, &chart)
    }

    fn info(&self, symbol: &Symbol) -> Result<StockInfo, DataUnavailable> {
        let chart = self.fetch_chart(symbol, META_RANGE)?;
        let from_meta = info_from_meta(symbol, &chart.meta);
        match self.fetch_quote_info(symbol) {
            Ok(info) => Ok(info.merge_missing(from_meta)),
            Err(e) => {
                debug!("Quote API unavailable for {}, using chart metadata: {}", symbol, e);
                Ok(from_meta)
            }
        }
    }
}

fn classify_status(symbol: &Symbol, status: u16, body: &str) -> Result<(), DataUnavailable> {
    if status == 404 {
        let detail = serde_json::from_str::<ChartEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.chart.error)
            .map(|error| error.describe())
            .unwrap_or_else(|| "HTTP 404".to_string());
        return Err(DataUnavailable::unknown_symbol(symbol.as_str(), detail));
    }
    if !(200..300).contains(&status) {
        return Err(DataUnavailable::unreachable(symbol.as_str(), format!("HTTP {status}")));
    }
    Ok(())
}

fn parse_chart(symbol: &Symbol, status: u16, body: &str) -> Result<ChartResult, DataUnavailable> {
    classify_status(symbol, status, body)?;
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| DataUnavailable::malformed(symbol.as_str(), e.to_string()))?;
    if let Some(error) = envelope.chart.error {
        return Err(DataUnavailable::unknown_symbol(symbol.as_str(), error.describe()));
    }
    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataUnavailable::unknown_symbol(symbol.as_str(), "empty chart result"))
}

fn parse_quote_info(symbol: &Symbol, status: u16, body: &str) -> Result<StockInfo, DataUnavailable> {
    classify_status(symbol, status, body)?;
    let envelope: QuoteEnvelope = serde_json::from_str(body)
        .map_err(|e| DataUnavailable::malformed(symbol.as_str(), e.to_string()))?;
    if let Some(error) = envelope.quote_response.error {
        return Err(DataUnavailable::unknown_symbol(symbol.as_str(), error.describe()));
    }
    let result = envelope
        .quote_response
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataUnavailable::unknown_symbol(symbol.as_str(), "empty quote result"))?;

    Ok(StockInfo {
        symbol: Some(symbol.clone()),
        name: result.long_name.or(result.short_name),
        market_cap: result.market_cap,
        pe_ratio: result.trailing_pe,
        dividend_yield: result.trailing_annual_dividend_yield,
        week_52_high: result.fifty_two_week_high,
        week_52_low: result.fifty_two_week_low,
        day_high: result.regular_market_day_high,
        day_low: result.regular_market_day_low,
    })
}

fn quote_from_chart(symbol: &Symbol, chart: &ChartResult) -> Result<Quote, DataUnavailable> {
    let meta = &chart.meta;
    let price = meta
        .regular_market_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| DataUnavailable::malformed(symbol.as_str(), "missing regularMarketPrice"))?;
    let previous_close = meta
        .chart_previous_close
        .or(meta.previous_close)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| DataUnavailable::malformed(symbol.as_str(), "missing previous close"))?;

    let mut quote = Quote::new(symbol.clone(), price, previous_close);
    if let Some(currency) = &meta.currency {
        quote = quote.with_currency(currency.clone());
    }
    if let Some(market_time) = meta.regular_market_time.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)) {
        quote = quote.with_market_time(market_time);
    }
    Ok(quote)
}

fn series_from_chart(
    symbol: &Symbol,
    window: HistoryWindow,
    chart: &ChartResult,
) -> Result<HistoricalSeries, DataUnavailable> {
    let Some(timestamps) = chart.timestamp.as_ref().filter(|ts| !ts.is_empty()) else {
        return Err(DataUnavailable::unknown_symbol(symbol.as_str(), "no price history returned"));
    };
    let closes = chart
        .indicators
        .as_ref()
        .and_then(|indicators| indicators.quote.first())
        .and_then(|quote| quote.close.as_ref())
        .ok_or_else(|| DataUnavailable::malformed(symbol.as_str(), "missing close prices"))?;
    if closes.len() != timestamps.len() {
        return Err(DataUnavailable::malformed(
            symbol.as_str(),
            format!("{} timestamps but {} closes", timestamps.len(), closes.len()),
        ));
    }

    let mut points = Vec::with_capacity(timestamps.len());
    for (&ts, close) in timestamps.iter().zip(closes) {
        // null closes are provider-side gaps (halts, missing bars)
        let Some(price) = close.filter(|p| p.is_finite()) else {
            continue;
        };
        let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)
            .ok_or_else(|| DataUnavailable::malformed(symbol.as_str(), format!("bad timestamp {ts}")))?;
        points.push(PricePoint::new(timestamp, price));
    }
    if points.is_empty() {
        return Err(DataUnavailable::unknown_symbol(symbol.as_str(), "no price history returned"));
    }
    Ok(HistoricalSeries::new(symbol.clone(), window, points))
}

fn info_from_meta(symbol: &Symbol, meta: &ChartMeta) -> StockInfo {
    StockInfo {
        symbol: Some(symbol.clone()),
        name: meta.long_name.clone().or_else(|| meta.short_name.clone()),
        week_52_high: meta.fifty_two_week_high,
        week_52_low: meta.fifty_two_week_low,
        day_high: meta.regular_market_day_high,
        day_low: meta.regular_market_day_low,
        ..StockInfo::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_common::UnavailableCause;
    use stock_common::model::Direction;

    fn symbol(raw: &str) -> Symbol {
        Symbol::new(raw).unwrap()
    }

    fn chart_json(price: f64, previous_close: f64) -> String {
        format!(
            r#"{{"chart":{{"result":[{{"meta":{{"currency":"USD","symbol":"AAPL",
                "regularMarketPrice":{price},"chartPreviousClose":{previous_close},
                "regularMarketTime":1772465400,"regularMarketDayHigh":151.2,
                "regularMarketDayLow":147.5,"fiftyTwoWeekHigh":199.6,"fiftyTwoWeekLow":124.1,
                "longName":"Apple Inc."}},
                "timestamp":[1772461800,1772461860,1772461920],
                "indicators":{{"quote":[{{"close":[149.5,null,150.0]}}]}}}}],"error":null}}}}"#
        )
    }

    const NOT_FOUND: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    #[test]
    fn quote_up_when_price_above_previous_close() {
        let chart = parse_chart(&symbol("AAPL"), 200, &chart_json(150.0, 148.0)).unwrap();
        let quote = quote_from_chart(&symbol("AAPL"), &chart).unwrap();
        assert_eq!(quote.price(), 150.0);
        assert_eq!(quote.previous_close(), 148.0);
        assert_eq!(quote.direction(), Direction::Up);
        assert_eq!(quote.currency(), Some("USD"));
        assert!(quote.market_time().is_some());
    }

    #[test]
    fn quote_unchanged_when_prices_match() {
        let chart = parse_chart(&symbol("AAPL"), 200, &chart_json(148.0, 148.0)).unwrap();
        let quote = quote_from_chart(&symbol("AAPL"), &chart).unwrap();
        assert_eq!(quote.direction(), Direction::Unchanged);
    }

    #[test]
    fn previous_close_falls_back_to_meta_previous_close() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":10.0,"previousClose":11.0}}],"error":null}}"#;
        let chart = parse_chart(&symbol("IBM"), 200, body).unwrap();
        let quote = quote_from_chart(&symbol("IBM"), &chart).unwrap();
        assert_eq!(quote.direction(), Direction::Down);
    }

    #[test]
    fn missing_price_is_malformed() {
        let body = r#"{"chart":{"result":[{"meta":{"chartPreviousClose":11.0}}],"error":null}}"#;
        let chart = parse_chart(&symbol("IBM"), 200, body).unwrap();
        let err = quote_from_chart(&symbol("IBM"), &chart).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::Malformed);
    }

    #[test]
    fn not_found_payload_is_unknown_symbol() {
        let err = parse_chart(&symbol("ZZZZ"), 404, NOT_FOUND).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::UnknownSymbol);
        assert!(err.detail.contains("delisted"));

        let err = parse_chart(&symbol("ZZZZ"), 200, NOT_FOUND).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::UnknownSymbol);
    }

    #[test]
    fn empty_result_is_unknown_symbol() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let err = parse_chart(&symbol("ZZZZ"), 200, body).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::UnknownSymbol);
    }

    #[test]
    fn server_errors_are_unreachable() {
        let err = parse_chart(&symbol("AAPL"), 503, "<html>down</html>").unwrap_err();
        assert_eq!(err.cause, UnavailableCause::Unreachable);
        assert_eq!(err.detail, "HTTP 503");
    }

    #[test]
    fn garbage_body_is_malformed() {
        let err = parse_chart(&symbol("AAPL"), 200, "{not json").unwrap_err();
        assert_eq!(err.cause, UnavailableCause::Malformed);
    }

    #[test]
    fn history_skips_null_closes_and_stays_ascending() {
        let chart = parse_chart(&symbol("AAPL"), 200, &chart_json(150.0, 148.0)).unwrap();
        let series = series_from_chart(&symbol("AAPL"), HistoryWindow::OneDay, &chart).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.is_ascending());
        assert_eq!(series.last().unwrap().price, 150.0);
    }

    #[test]
    fn history_with_mismatched_arrays_is_malformed() {
        let body = r#"{"chart":{"result":[{"meta":{},"timestamp":[1,2,3],
            "indicators":{"quote":[{"close":[1.0,2.0]}]}}],"error":null}}"#;
        let chart = parse_chart(&symbol("MSFT"), 200, body).unwrap();
        let err = series_from_chart(&symbol("MSFT"), HistoryWindow::OneDay, &chart).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::Malformed);
    }

    #[test]
    fn history_without_timestamps_is_unavailable() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":1.0}}],"error":null}}"#;
        let chart = parse_chart(&symbol("MSFT"), 200, body).unwrap();
        let err = series_from_chart(&symbol("MSFT"), HistoryWindow::OneDay, &chart).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::UnknownSymbol);
    }

    #[test]
    fn quote_api_fields_map_to_info() {
        let body = r#"{"quoteResponse":{"result":[{"symbol":"AAPL","shortName":"Apple",
            "marketCap":2800000000000,"trailingPE":28.5,"trailingAnnualDividendYield":0.0042,
            "fiftyTwoWeekHigh":199.6}],"error":null}}"#;
        let info = parse_quote_info(&symbol("AAPL"), 200, body).unwrap();
        assert_eq!(info.name.as_deref(), Some("Apple"));
        assert_eq!(info.pe_ratio, Some(28.5));
        assert_eq!(info.day_low, None);
    }

    #[test]
    fn unauthorized_quote_api_is_unreachable() {
        let body = r#"{"finance":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#;
        let err = parse_quote_info(&symbol("AAPL"), 401, body).unwrap_err();
        assert_eq!(err.cause, UnavailableCause::Unreachable);
    }

    #[test]
    fn meta_supplies_ranges() {
        let chart = parse_chart(&symbol("AAPL"), 200, &chart_json(150.0, 148.0)).unwrap();
        let info = info_from_meta(&symbol("AAPL"), &chart.meta);
        assert_eq!(info.name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.day_high, Some(151.2));
        assert_eq!(info.week_52_low, Some(124.1));
        assert_eq!(info.market_cap, None);
    }
}
