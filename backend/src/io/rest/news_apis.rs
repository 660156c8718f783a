//! # REST API for News Headlines

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::info;

use crate::domain::DomainError;
use crate::io::rest::error::ApiError;
use crate::upstream::HeadlineFeed;
use crate::AppState;

/// Create a router for headline APIs. Merged at the root next to `GET /news`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news/stock-news", get(get_stock_news))
        .route("/news/trending-news", get(get_trending_news))
}

pub async fn get_stock_news(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /news/stock-news");
    headlines(&state, HeadlineFeed::Stock).await
}

pub async fn get_trending_news(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /news/trending-news");
    headlines(&state, HeadlineFeed::Trending).await
}

async fn headlines(state: &AppState, feed: HeadlineFeed) -> axum::response::Response {
    match state.news.top_headlines(feed).await {
        Ok(articles) => (StatusCode::OK, Json(json!({ "articles": articles }))).into_response(),
        Err(e) => ApiError::from(DomainError::from(e)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{send, setup_test_app_state};
    use axum::http::Method;

    async fn app() -> Router {
        router().with_state(setup_test_app_state().await)
    }

    #[tokio::test]
    async fn test_stock_news() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/news/stock-news", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"][0]["title"], "Stock headline");
    }

    #[tokio::test]
    async fn test_trending_news() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/news/trending-news", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"][0]["title"], "Trending headline");
    }
}
