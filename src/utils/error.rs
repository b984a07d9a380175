//! Error handling module
//!
//! Defines error types and handling logic used in the project.
//!
//! Frame-local decode failures are not represented here: a malformed
//! event frame is skipped inside the relay engine and never becomes a
//! request-level error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// A required adapter credential is absent
    #[error("Provider configuration error: {0}")]
    Configuration(String),

    /// Non-success status from the upstream provider
    #[error("Provider request failed with status {status}: {message}")]
    Provider { status: u16, message: String },

    /// Transport failure talking to the upstream provider
    #[error("Provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Client-facing error response body
///
/// `error` carries a trimmed human-readable message only; full detail
/// goes to the logs.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider { .. } | AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "invalid_request_error",
            AppError::Configuration(_) => "configuration_error",
            AppError::Provider { .. } | AppError::Transport(_) => "provider_error",
            AppError::Serialization(_) | AppError::Internal(_) => "api_error",
        }
    }

    /// Build the client-facing response body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }
}

/// Allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_client_error() {
            tracing::warn!("Client error: {} - Status code: {}", self, status);
        } else {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
