//! Stub collaborators and request helpers for router tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::Config;
use crate::storage::DbConnection;
use crate::upstream::{
    ChartQuery, ChatCompletion, HeadlineFeed, MarketDataProvider, NewsProvider, UpstreamError,
};
use crate::{AppState, Providers};

pub struct StubMarket;

#[async_trait]
impl MarketDataProvider for StubMarket {
    async fn quotes(&self, symbols: &[String]) -> Result<Map<String, Value>, UpstreamError> {
        Ok(symbols
            .iter()
            .map(|s| (s.clone(), json!({"symbol": s, "regularMarketPrice": 100.0})))
            .collect())
    }

    async fn chart(&self, query: &ChartQuery) -> Result<Value, UpstreamError> {
        Ok(json!({
            "meta": {"symbol": query.symbol, "interval": query.interval},
            "quotes": [{"date": query.period1.to_rfc3339(), "close": 1.0}]
        }))
    }

    async fn search(&self, term: &str) -> Result<Value, UpstreamError> {
        Ok(json!({"news": [{"title": format!("{} beats estimates", term)}]}))
    }
}

pub struct StubNews;

#[async_trait]
impl NewsProvider for StubNews {
    async fn top_headlines(&self, feed: HeadlineFeed) -> Result<Vec<Value>, UpstreamError> {
        Ok(vec![json!({"title": format!("{:?} headline", feed)})])
    }
}

pub struct StubChat;

#[async_trait]
impl ChatCompletion for StubChat {
    async fn complete(&self, _system: &str, message: &str) -> Result<String, UpstreamError> {
        Ok(format!(
            "You asked: {}\n```json\n{{\"response\": [{{\"Category\": \"Food\", \"Recommendation\": \"Cook more\"}}]}}\n```",
            message
        ))
    }
}

/// Every collaborator fails as if its credentials were missing
pub struct Unavailable;

fn unavailable() -> UpstreamError {
    UpstreamError::MissingCredentials {
        service: "Test",
        setting: "TEST_API_KEY",
    }
}

#[async_trait]
impl MarketDataProvider for Unavailable {
    async fn quotes(&self, _symbols: &[String]) -> Result<Map<String, Value>, UpstreamError> {
        Err(unavailable())
    }

    async fn chart(&self, _query: &ChartQuery) -> Result<Value, UpstreamError> {
        Err(unavailable())
    }

    async fn search(&self, _term: &str) -> Result<Value, UpstreamError> {
        Err(unavailable())
    }
}

#[async_trait]
impl NewsProvider for Unavailable {
    async fn top_headlines(&self, _feed: HeadlineFeed) -> Result<Vec<Value>, UpstreamError> {
        Err(unavailable())
    }
}

#[async_trait]
impl ChatCompletion for Unavailable {
    async fn complete(&self, _system: &str, _message: &str) -> Result<String, UpstreamError> {
        Err(unavailable())
    }
}

pub fn stub_providers() -> Providers {
    Providers {
        market_data: Arc::new(StubMarket),
        news: Arc::new(StubNews),
        chat: Arc::new(StubChat),
    }
}

pub fn unavailable_providers() -> Providers {
    Providers {
        market_data: Arc::new(Unavailable),
        news: Arc::new(Unavailable),
        chat: Arc::new(Unavailable),
    }
}

pub async fn setup_test_app_state() -> AppState {
    let db = DbConnection::in_memory().await.expect("Failed to init test DB");
    AppState::new(db, stub_providers(), &Config::default())
}

/// Drive one request through the router and decode the JSON body (Null when empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
