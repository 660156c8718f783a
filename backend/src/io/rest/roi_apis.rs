//! # REST API for the ROI Calculator

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::io::rest::error::ApiError;
use crate::AppState;
use shared::RoiRequest;

/// Create a router for the calculator, nested under `/api`
pub fn router() -> Router<AppState> {
    Router::new().route("/calculate-roi", post(calculate_roi))
}

/// Compound interest on a principal
pub async fn calculate_roi(
    State(state): State<AppState>,
    Json(request): Json<RoiRequest>,
) -> impl IntoResponse {
    info!("POST /api/calculate-roi - request: {:?}", request);

    match state.roi_service.calculate(&request) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
