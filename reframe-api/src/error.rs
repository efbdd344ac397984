//! Error types for reframe-api
//!
//! Every error leaves the service as `{"success": false, "message": ...}`,
//! the envelope the web client reads.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected identity (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Storage or other internal failure (500)
    ///
    /// `message` is what the client sees; `source` is only logged.
    #[error("{message}: {source}")]
    Internal {
        message: String,
        #[source]
        source: reframe_common::Error,
    },
}

impl ApiError {
    /// Wrap a storage error with the client-facing message for the operation
    pub fn internal(message: &str) -> impl FnOnce(reframe_common::Error) -> ApiError + '_ {
        move |source| ApiError::Internal {
            message: message.to_string(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );

        let internal = ApiError::internal("Failed to fetch history")(
            reframe_common::Error::Internal("disk on fire".into()),
        );
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
