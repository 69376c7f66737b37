//! Route handlers

pub mod health;
pub mod task;

use axum::{http::StatusCode, Json, Router};

use crate::state::AppState;
use task::ErrorResponse;

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    task::error_response(StatusCode::NOT_FOUND, "resource not found")
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    task::error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

/// All API routes with JSON fallbacks for unknown paths and methods
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(task::router())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}
