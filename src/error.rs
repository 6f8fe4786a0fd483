use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::ValidationError;
use crate::services::ProviderError;

/// Generic text returned for any 500; the real cause stays in the server logs.
pub const SERVER_ERROR_TEXT: &str = "a server error occurred, please try again later";
pub const ACCESS_DENIED_TEXT: &str = "access from this origin is not allowed";
pub const NOT_FOUND_TEXT: &str = "API endpoint not found";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] axum::extract::rejection::JsonRejection),

    #[error("origin denied: {0}")]
    OriginDenied(String),

    #[error("not found")]
    NotFound,

    #[error("notification delivery failed: {0}")]
    Notification(#[from] ProviderError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("configuration error: {0}")]
    Config(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

/// Error body shared by every failure response: `{"success": false, "error": "..."}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Validation reasons are client-caused and safe to echo verbatim.
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            // Keep the rejection's status (400 syntax, 413 oversize, 415
            // content-type) but answer in the shared error shape.
            AppError::MalformedBody(rejection) => (rejection.status(), rejection.body_text()),
            AppError::OriginDenied(origin) => {
                tracing::warn!(origin = %origin, "Request origin denied");
                (StatusCode::FORBIDDEN, ACCESS_DENIED_TEXT.to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_TEXT.to_string()),
            AppError::Notification(err) => {
                tracing::error!(error = %err, "Notification delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_TEXT.to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_TEXT.to_string(),
                )
            }
            AppError::Config(err) => {
                tracing::error!(error = %err, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_TEXT.to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(error_message))).into_response()
    }
}
