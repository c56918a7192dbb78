use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::auth::error::TokenError;
use crate::books::error::LookupError;

/// HTTP-facing error. Renders as `{"error": .., "code": ..}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            // a server that cannot check tokens is misconfigured, not the caller's fault
            TokenError::MissingConfig(_) | TokenError::InvalidConfig(_) | TokenError::Signing(_) => {
                ApiError::Internal(err.to_string())
            }
            TokenError::InvalidUser(_) | TokenError::Rejected(_) => {
                ApiError::Unauthorized("Invalid or expired token".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Lookup(LookupError::InvalidArgument(msg)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
