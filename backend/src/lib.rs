//! # Expense Dashboard Backend
//!
//! HTTP service behind the personal finance dashboard: expense and category records,
//! spending statistics, an ROI calculator, and passthroughs to market data, news and chat
//! providers.
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (axum handlers, DTO mapping, error responses)
//!     ↓
//! Domain Layer (validation, period windows, statistics, services)
//!     ↓                         ↓
//! Storage Layer (SQLite)    Upstream clients (market data, news, chat)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;
pub mod upstream;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::{CategoryService, ChatService, ExpenseService, RoiService, StatsService};
use crate::io::rest::{category_apis, chat_apis, expense_apis, market_apis, news_apis, roi_apis};
use crate::storage::DbConnection;
use crate::upstream::{
    ChatCompletion, MarketDataProvider, NewsApiClient, NewsProvider, OpenAiChatClient, YahooFinanceClient,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub expense_service: ExpenseService<DbConnection>,
    pub category_service: CategoryService<DbConnection>,
    pub stats_service: StatsService<DbConnection>,
    pub roi_service: RoiService,
    pub chat_service: ChatService,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub market_symbols: Arc<Vec<String>>,
}

/// The third-party collaborators the state forwards to
pub struct Providers {
    pub market_data: Arc<dyn MarketDataProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub chat: Arc<dyn ChatCompletion>,
}

impl Providers {
    /// HTTP clients pointed at the configured endpoints
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            market_data: Arc::new(YahooFinanceClient::new(&config.market_data_base_url)?),
            news: Arc::new(NewsApiClient::new(
                &config.news_api_base_url,
                config.news_api_key.clone(),
            )?),
            chat: Arc::new(OpenAiChatClient::new(
                &config.chat_api_base_url,
                config.chat_api_key.clone(),
                &config.chat_model,
            )?),
        })
    }
}

impl AppState {
    pub fn new(db: DbConnection, providers: Providers, config: &Config) -> Self {
        let db = Arc::new(db);
        Self {
            expense_service: ExpenseService::new(db.clone()),
            category_service: CategoryService::new(db.clone()),
            stats_service: StatsService::new(db),
            roi_service: RoiService::new(),
            chat_service: ChatService::new(providers.chat, config.chat_system_prompt.clone()),
            market_data: providers.market_data,
            news: providers.news,
            market_symbols: Arc::new(config.market_symbols.clone()),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up upstream clients");
    if config.news_api_key.is_none() {
        tracing::warn!("NEWS_API_KEY is not set; headline endpoints will fail");
    }
    if config.chat_api_key.is_none() {
        tracing::warn!("CHAT_API_KEY is not set; /chat will fail");
    }
    let providers = Providers::from_config(config)?;

    info!("Setting up application state");
    Ok(AppState::new(db, providers, config))
}

async fn hello() -> &'static str {
    "Hello World"
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("CORS_ORIGIN '{}' is not a valid header value", cors_origin))?;

    // CORS setup to allow the dashboard to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/expenses", expense_apis::router())
        .nest("/categories", category_apis::router())
        .merge(roi_apis::router());

    Ok(Router::new()
        .route("/", get(hello))
        .nest("/api", api_routes)
        .merge(market_apis::router())
        .merge(news_apis::router())
        .merge(chat_apis::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{send, setup_test_app_state};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_router_mounts_every_surface() {
        let app = create_router(setup_test_app_state().await, "http://localhost:5173").unwrap();

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Hello World"));

        for uri in [
            "/api/expenses",
            "/api/expenses/stats",
            "/api/categories",
            "/api/categories/stats",
            "/realtime",
            "/news",
            "/news/stock-news",
            "/news/trending-news",
        ] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK, "GET {}", uri);
        }

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/calculate-roi",
            Some(json!({"principal": 1, "rate": 1, "years": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_is_an_error() {
        assert!(create_router(setup_test_app_state().await, "bad\norigin").is_err());
    }
}
