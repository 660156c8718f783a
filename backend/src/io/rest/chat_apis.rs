//! # REST API for the Finance Chatbot

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
use shared::ChatRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// Forward a user question to the chat model
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> impl IntoResponse {
    info!("POST /chat");

    match state.chat_service.reply(&request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
