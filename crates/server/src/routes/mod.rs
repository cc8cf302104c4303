//! API route handlers
//!
//! - `health`: liveness, readiness and metrics
//! - `recommendation`: LightGCN top-K restaurant recommendations

pub mod health;
pub mod recommendation;

use crate::error::ServerError;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service banner (GET /)
///
/// # Response
///
/// ```json
/// { "message": "Restaurant Recommender System" }
/// ```
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Restaurant Recommender System" }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
