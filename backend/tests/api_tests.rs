//! End-to-end scenarios through the full router, against an in-memory database and
//! offline collaborators.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

use expense_dashboard::config::Config;
use expense_dashboard::storage::DbConnection;
use expense_dashboard::upstream::{
    ChartQuery, ChatCompletion, HeadlineFeed, MarketDataProvider, NewsProvider, UpstreamError,
};
use expense_dashboard::{create_router, AppState, Providers};

struct Offline;

fn offline() -> UpstreamError {
    UpstreamError::MissingCredentials {
        service: "Offline",
        setting: "NONE",
    }
}

#[async_trait]
impl MarketDataProvider for Offline {
    async fn quotes(&self, _symbols: &[String]) -> Result<Map<String, Value>, UpstreamError> {
        Err(offline())
    }

    async fn chart(&self, _query: &ChartQuery) -> Result<Value, UpstreamError> {
        Err(offline())
    }

    async fn search(&self, _term: &str) -> Result<Value, UpstreamError> {
        Err(offline())
    }
}

#[async_trait]
impl NewsProvider for Offline {
    async fn top_headlines(&self, _feed: HeadlineFeed) -> Result<Vec<Value>, UpstreamError> {
        Err(offline())
    }
}

#[async_trait]
impl ChatCompletion for Offline {
    async fn complete(&self, _system: &str, _message: &str) -> Result<String, UpstreamError> {
        Err(offline())
    }
}

async fn setup_app() -> Router {
    let db = DbConnection::in_memory().await.expect("Failed to init test DB");
    let providers = Providers {
        market_data: Arc::new(Offline),
        news: Arc::new(Offline),
        chat: Arc::new(Offline),
    };
    let state = AppState::new(db, providers, &Config::default());
    create_router(state, "http://localhost:5173").expect("Failed to build router")
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn add_expense(app: &Router, title: &str, amount: f64, category: &str, date: Option<String>) -> Value {
    let mut body = json!({"title": title, "amount": amount, "category": category});
    if let Some(date) = date {
        body["date"] = json!(date);
    }
    let (status, created) = call(app, Method::POST, "/api/expenses", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", created);
    created
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[tokio::test]
async fn created_expense_is_listed_exactly_once() {
    let app = setup_app().await;
    let created = add_expense(&app, "Coffee", 4.5, "food", Some("2025-01-10".to_string())).await;

    let (status, listed) = call(&app, Method::GET, "/api/expenses", None).await;
    assert_eq!(status, StatusCode::OK);

    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0]["title"], "Coffee");
    assert_eq!(listed[0]["amount"], 4.5);
    assert_eq!(listed[0]["category"], "food");
    assert!(listed[0]["date"].as_str().unwrap().starts_with("2025-01-10T00:00:00"));
}

#[tokio::test]
async fn single_coffee_month_stats() {
    let app = setup_app().await;
    add_expense(&app, "Coffee", 4.5, "food", Some(days_ago(3))).await;

    let (status, stats) = call(&app, Method::GET, "/api/expenses/stats?period=month", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 4.5);
    assert_eq!(stats["avgDaily"], 4.5);
    assert_eq!(stats["categoryTotals"], json!({"food": 4.5}));
}

#[tokio::test]
async fn three_expense_stats_and_totals_add_up() {
    let app = setup_app().await;
    add_expense(&app, "Lunch", 10.0, "food", None).await;
    add_expense(&app, "Dinner", 20.0, "food", None).await;
    add_expense(&app, "Bus", 5.0, "transport", None).await;

    let (_, stats) = call(&app, Method::GET, "/api/expenses/stats", None).await;
    assert_eq!(stats["total"], 35.0);
    assert_eq!(stats["categoryTotals"], json!({"food": 30.0, "transport": 5.0}));
    assert!((stats["avgDaily"].as_f64().unwrap() - 35.0 / 3.0).abs() < 1e-9);

    let sum: f64 = stats["categoryTotals"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_f64().unwrap())
        .sum();
    assert!((sum - stats["total"].as_f64().unwrap()).abs() < 1e-9);
}

#[tokio::test]
async fn period_and_category_filters_apply_to_list_and_stats() {
    let app = setup_app().await;
    add_expense(&app, "Recent lunch", 10.0, "food", Some(days_ago(2))).await;
    add_expense(&app, "Recent bus", 3.0, "transport", Some(days_ago(2))).await;
    add_expense(&app, "Old dinner", 40.0, "food", Some(days_ago(20))).await;
    add_expense(&app, "Ancient feast", 100.0, "food", Some(days_ago(400))).await;

    let (_, week) = call(&app, Method::GET, "/api/expenses?period=week", None).await;
    assert_eq!(week.as_array().unwrap().len(), 2);

    let (_, food_month) = call(&app, Method::GET, "/api/expenses?period=month&category=food", None).await;
    let titles: Vec<&str> = food_month
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Recent lunch", "Old dinner"]);

    let (_, year_stats) = call(&app, Method::GET, "/api/expenses/stats?period=year", None).await;
    assert_eq!(year_stats["total"], 53.0);
    assert_eq!(year_stats["count"], 3);

    let (_, all_stats) = call(&app, Method::GET, "/api/expenses/stats?period=all", None).await;
    assert_eq!(all_stats["total"], 153.0);
}

#[tokio::test]
async fn category_lifecycle_guards_references() {
    let app = setup_app().await;

    let (status, food) = call(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({"label": "Eating Out", "color": "#F97316", "budget": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(food["id"], "eating_out");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({"label": "eating   OUT", "color": "#F97316", "budget": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    add_expense(&app, "Pizza", 25.0, "eating_out", None).await;

    let (status, _) = call(&app, Method::DELETE, "/api/categories/eating_out", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, stats) = call(&app, Method::GET, "/api/categories/stats", None).await;
    assert_eq!(stats[0]["totalSpent"], 25.0);
    assert_eq!(stats[0]["budgetUtilization"], 25.0);
    assert_eq!(stats[0]["overBudget"], false);

    let (_, expenses) = call(&app, Method::GET, "/api/expenses", None).await;
    let id = expenses[0]["id"].as_str().unwrap().to_string();
    let (status, _) = call(&app, Method::DELETE, &format!("/api/expenses/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::DELETE, "/api/categories/eating_out", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, categories) = call(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(categories, json!([]));
}

#[tokio::test]
async fn bulk_upsert_writes_nothing_on_invalid_entry() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/categories",
        Some(json!([
            {"label": "Food", "color": "#10B981", "budget": 200},
            {"label": "Rent", "color": "#10B981", "budget": -1}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "categories[1].budget");
    assert_eq!(body["errors"][0]["message"], "Budget must be a positive number");

    let (_, categories) = call(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(categories, json!([]));
}

#[tokio::test]
async fn invalid_filters_are_bad_requests() {
    let app = setup_app().await;

    let (status, _) = call(&app, Method::GET, "/api/expenses/stats?period=decade", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/expenses?startDate=2025-02-01&endDate=2025-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "startDate");
}

#[tokio::test]
async fn offline_collaborators_surface_as_bad_gateway() {
    let app = setup_app().await;

    for (method, uri, body) in [
        (Method::GET, "/realtime", None),
        (Method::GET, "/news", None),
        (Method::GET, "/news/stock-news", None),
        (Method::POST, "/chat", Some(json!({"message": "hi"}))),
    ] {
        let (status, response) = call(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY, "{}", uri);
        assert_eq!(response["message"], "Upstream service error");
    }
}
