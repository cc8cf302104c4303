use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use ranker::Recommendation;
use std::sync::Arc;
use store::UserId;

/// LightGCN recommendations for one user.
///
/// The route keeps its historical `{item_id}` parameter name, but the value is
/// the **user** id whose embedding is scored against every restaurant. The
/// result size is the server's configured `top_k` (20 by default).
///
/// # Response
///
/// ```json
/// { "data": [ { "rest_id": 31, "name": "..." }, ... ] }
/// ```
///
/// Unknown or ambiguous users yield 404; a ranked restaurant without metadata
/// yields 500.
///
/// Scoring is a full pass over the item matrix, so it runs on the blocking
/// pool rather than an async worker.
pub async fn lightgcn_recommendation(
    State(state): State<Arc<ServerState>>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> ServerResult<Json<Recommendation>> {
    let Path(user_id) = user_id.map_err(|rejection| {
        ServerError::BadRequest(format!("user id must be an integer: {}", rejection.body_text()))
    })?;

    let ranker = Arc::clone(&state.ranker);
    let top_k = state.top_k();
    let recommendation = tokio::task::spawn_blocking(move || ranker.recommend(user_id, top_k))
        .await
        .map_err(|err| ServerError::Internal(format!("recommendation task failed: {err}")))??;
    Ok(Json(recommendation))
}
