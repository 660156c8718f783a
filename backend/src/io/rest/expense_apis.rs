//! # REST API for Expenses
//!
//! CRUD endpoints for expense records plus the aggregate statistics the dashboard charts
//! are drawn from.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::ExpenseMapper;
use crate::AppState;
use shared::{CreateExpenseRequest, ExpenseListQuery, MessageResponse, StatsQuery, UpdateExpenseRequest};

/// Create a router for expense related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/stats", get(get_expense_stats))
        .route("/:id", get(get_expense).put(update_expense).delete(delete_expense))
}

/// List expenses, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenses - query: {:?}", query);

    match state.expense_service.list_expenses(&query).await {
        Ok(expenses) => (StatusCode::OK, Json(ExpenseMapper::to_dtos(expenses))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Record a new expense
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    match state.expense_service.create_expense(request).await {
        Ok(expense) => (StatusCode::CREATED, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_expense(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/expenses/{}", id);

    match state.expense_service.get_expense(&id).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Apply a partial update to an expense
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    info!("PUT /api/expenses/{} - request: {:?}", id, request);

    match state.expense_service.update_expense(&id, request).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_expense(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", id);

    match state.expense_service.delete_expense(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Expense deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Totals, per-record average and per-category sums over a period window
pub async fn get_expense_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenses/stats - query: {:?}", query);

    match state.stats_service.expense_stats(&query).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
