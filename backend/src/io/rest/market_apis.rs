//! # REST API for Market Data
//!
//! Passthrough to the market data provider: live index quotes, historical charts and
//! symbol search with related news.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::domain::DomainError;
use crate::io::rest::error::ApiError;
use crate::upstream::ChartQuery;
use crate::AppState;

const DEFAULT_NEWS_SYMBOL: &str = "INFY";

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub symbol: Option<String>,
    pub period1: Option<String>,
    pub period2: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub symbol: Option<String>,
}

/// Create a router for market data APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/realtime", get(get_realtime_quotes))
        .route("/search", get(search_chart))
        .route("/news", get(search_news))
}

/// Quotes for the configured index symbols, keyed by symbol
pub async fn get_realtime_quotes(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /realtime - symbols: {:?}", state.market_symbols);

    match state.market_data.quotes(&state.market_symbols).await {
        Ok(quotes) => (StatusCode::OK, Json(quotes)).into_response(),
        Err(e) => ApiError::from(DomainError::from(e)).into_response(),
    }
}

/// Historical chart for one symbol
pub async fn search_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> impl IntoResponse {
    info!("GET /search - query: {:?}", params);

    let query = match ChartQuery::parse(
        params.symbol.as_deref(),
        params.period1.as_deref(),
        params.period2.as_deref(),
        params.interval.as_deref(),
        Utc::now(),
    ) {
        Ok(query) => query,
        Err(errors) => return ApiError::from(DomainError::Validation(errors)).into_response(),
    };

    match state.market_data.chart(&query).await {
        Ok(chart) => (StatusCode::OK, Json(chart)).into_response(),
        Err(e) => ApiError::from(DomainError::from(e)).into_response(),
    }
}

/// Symbol search and related news; defaults to INFY
pub async fn search_news(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> impl IntoResponse {
    let symbol = params
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_NEWS_SYMBOL);
    info!("GET /news - symbol: {}", symbol);

    match state.market_data.search(symbol).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => ApiError::from(DomainError::from(e)).into_response(),
    }
}
