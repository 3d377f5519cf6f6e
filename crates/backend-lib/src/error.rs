// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use loginsvc_common::ErrorResponse;
use thiserror::Error;

use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed email, weak password or missing field.
    #[error("{0}")]
    Validation(String),

    /// Unknown user or wrong password.
    #[error("{0}")]
    Authentication(String),

    /// Email already registered.
    #[error("{0}")]
    Conflict(String),

    /// Invalid, expired or revoked session token.
    #[error("{0}")]
    Session(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) | AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Io(_) | AppError::Json(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Authentication(_) => "AUTH_001",
            AppError::Session(_) => "AUTH_002",
            AppError::Conflict(_) => "CONFLICT_001",
            AppError::Store(_) => "STORE_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Conflict(msg)
            | AppError::Session(msg) => msg.clone(),
            AppError::Store(_) | AppError::Io(_) | AppError::Json(_) => {
                "Storage backend unavailable".to_string()
            },
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side details only leave the process in development builds
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            success: false,
            message,
            code: self.error_code().to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}
