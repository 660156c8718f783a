use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared::FieldError;
use tracing::debug;

use super::{http_client, send_json, trim_base_url, UpstreamError};
use crate::domain::period::{non_blank, parse_timestamp, Bound};

const SERVICE: &str = "Market data";

const INTERVALS: &[&str] = &[
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

/// A historical chart lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ChartQuery {
    pub symbol: String,
    pub period1: DateTime<Utc>,
    pub period2: DateTime<Utc>,
    pub interval: String,
}

impl ChartQuery {
    /// Build a chart query from raw query-string values. `period2` defaults to `now`
    /// and `interval` to `1d`.
    pub fn parse(
        symbol: Option<&str>,
        period1: Option<&str>,
        period2: Option<&str>,
        interval: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        let symbol = match non_blank(symbol) {
            Some(raw) if is_ticker(raw) => Some(raw.to_string()),
            Some(_) => {
                errors.push(FieldError::new("symbol", "Symbol contains unsupported characters"));
                None
            }
            None => {
                errors.push(FieldError::new("symbol", "Symbol is required"));
                None
            }
        };

        let period1 = match non_blank(period1) {
            Some(raw) => {
                let parsed = parse_timestamp(raw, Bound::Start);
                if parsed.is_none() {
                    errors.push(FieldError::new("period1", "Valid date is required"));
                }
                parsed
            }
            None => {
                errors.push(FieldError::new("period1", "period1 is required"));
                None
            }
        };

        let period2 = match non_blank(period2) {
            Some(raw) => {
                let parsed = parse_timestamp(raw, Bound::End);
                if parsed.is_none() {
                    errors.push(FieldError::new("period2", "Valid date is required"));
                }
                parsed
            }
            None => Some(now),
        };

        let interval = non_blank(interval).unwrap_or("1d").to_string();
        if !INTERVALS.contains(&interval.as_str()) {
            errors.push(FieldError::new(
                "interval",
                format!("Unsupported interval '{}'", interval),
            ));
        }

        if let (Some(p1), Some(p2)) = (period1, period2) {
            if p1 > p2 {
                errors.push(FieldError::new("period1", "period1 must not be after period2"));
            }
        }

        match (symbol, period1, period2) {
            (Some(symbol), Some(period1), Some(period2)) if errors.is_empty() => Ok(Self {
                symbol,
                period1,
                period2,
                interval,
            }),
            _ => Err(errors),
        }
    }
}

/// Ticker symbols are interpolated into the chart path: letters, digits and `.-^=` only
fn is_ticker(symbol: &str) -> bool {
    symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
}

/// Quote, chart and symbol search provider
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest quote for each symbol, keyed by symbol. Symbols the provider does not
    /// know map to `null`.
    async fn quotes(&self, symbols: &[String]) -> Result<Map<String, Value>, UpstreamError>;

    async fn chart(&self, query: &ChartQuery) -> Result<Value, UpstreamError>;

    /// Symbol search, including the provider's related news
    async fn search(&self, term: &str) -> Result<Value, UpstreamError>;
}

/// Key a `quoteResponse.result` array by the requested symbols
pub fn index_quotes(symbols: &[String], body: &Value) -> Result<Map<String, Value>, UpstreamError> {
    let results = body
        .pointer("/quoteResponse/result")
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamError::decode(SERVICE, "missing quoteResponse.result"))?;

    let mut indexed = Map::new();
    for symbol in symbols {
        let quote = results
            .iter()
            .find(|q| q.get("symbol").and_then(Value::as_str) == Some(symbol.as_str()))
            .cloned()
            .unwrap_or(Value::Null);
        indexed.insert(symbol.clone(), quote);
    }
    Ok(indexed)
}

/// Client for the Yahoo Finance query API
pub struct YahooFinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: http_client(SERVICE)?,
            base_url: trim_base_url(base_url),
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn quotes(&self, symbols: &[String]) -> Result<Map<String, Value>, UpstreamError> {
        debug!("Fetching quotes for {:?}", symbols);
        let request = self
            .http
            .get(format!("{}/v7/finance/quote", self.base_url))
            .query(&[("symbols", symbols.join(","))]);
        let body: Value = send_json(SERVICE, request).await?;
        index_quotes(symbols, &body)
    }

    async fn chart(&self, query: &ChartQuery) -> Result<Value, UpstreamError> {
        debug!("Fetching chart: {:?}", query);
        let request = self
            .http
            .get(format!("{}/v8/finance/chart/{}", self.base_url, query.symbol))
            .query(&[
                ("period1", query.period1.timestamp().to_string()),
                ("period2", query.period2.timestamp().to_string()),
                ("interval", query.interval.clone()),
            ]);
        send_json(SERVICE, request).await
    }

    async fn search(&self, term: &str) -> Result<Value, UpstreamError> {
        debug!("Searching symbols: {}", term);
        let request = self
            .http
            .get(format!("{}/v1/finance/search", self.base_url))
            .query(&[("q", term)]);
        send_json(SERVICE, request).await
    }
}
