//! # REST API for Categories
//!
//! Endpoints for creating, editing, bulk replacing and removing spending categories,
//! and for per-category budget statistics.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::CategoryMapper;
use crate::AppState;
use shared::{CategoryUpsertRequest, CreateCategoryRequest, MessageResponse, StatsQuery, UpdateCategoryRequest};

/// Create a router for category related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category).put(bulk_upsert_categories))
        .route("/stats", get(get_category_stats))
        .route("/:id", get(get_category).put(update_category).delete(delete_category))
}

pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.category_service.list_categories().await {
        Ok(categories) => (StatusCode::OK, Json(CategoryMapper::to_dtos(categories))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Create a category; its id is derived from the label
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/categories - request: {:?}", request);

    match state.category_service.create_category(request).await {
        Ok(category) => (StatusCode::CREATED, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Insert or replace a whole batch of categories, all or nothing
pub async fn bulk_upsert_categories(
    State(state): State<AppState>,
    Json(request): Json<Vec<CategoryUpsertRequest>>,
) -> impl IntoResponse {
    info!("PUT /api/categories - {} entries", request.len());

    match state.category_service.bulk_upsert(request).await {
        Ok(categories) => (StatusCode::OK, Json(CategoryMapper::to_dtos(categories))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_category(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/categories/{}", id);

    match state.category_service.get_category(&id).await {
        Ok(category) => (StatusCode::OK, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/categories/{} - request: {:?}", id, request);

    match state.category_service.update_category(&id, request).await {
        Ok(category) => (StatusCode::OK, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Delete a category no expense references
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/categories/{}", id);

    match state.category_service.delete_category(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Category deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Spending against budget for every category
pub async fn get_category_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
    info!("GET /api/categories/stats - query: {:?}", query);

    match state.stats_service.category_stats(&query).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
