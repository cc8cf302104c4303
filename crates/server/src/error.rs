use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ranker::RankError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use store::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Request timeout")]
    Timeout,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Rank(#[from] RankError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Rank(RankError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Rank(_)
            | ServerError::Store(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Rank(RankError::NotFound { .. }) => "USER_NOT_FOUND",
            ServerError::Rank(RankError::DataIntegrity(_)) => "DATA_INTEGRITY",
            ServerError::Rank(RankError::InvalidConfig(_)) | ServerError::Config(_) => {
                "CONFIG_ERROR"
            }
            ServerError::Rank(RankError::Store(_)) | ServerError::Store(_) => "STORE_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code = error_code, error = %message, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::LookupMiss;

    #[test]
    fn missing_and_ambiguous_users_map_to_404() {
        for reason in [LookupMiss::Missing, LookupMiss::Ambiguous(2)] {
            let err = ServerError::from(RankError::NotFound {
                user_id: 7,
                reason,
            });
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
            assert_eq!(err.error_code(), "USER_NOT_FOUND");
        }
    }

    #[test]
    fn data_integrity_is_a_server_error() {
        let err = ServerError::from(RankError::DataIntegrity(12));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "DATA_INTEGRITY");
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn bad_request_and_route_not_found() {
        assert_eq!(
            ServerError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServerError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::NotFound.error_code(), "NOT_FOUND");
    }
}
