//! Error types for web handlers.
//!
//! Bridges the domain's `AdmissionError` taxonomy into HTTP responses via
//! Axum's `IntoResponse` trait. Storage failures keep their detail in the
//! log and leave the response body generic.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_core::AdmissionError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps a status, a client-facing message, and a stable error code; an
/// optional source error is kept for logging only.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a 401 Unauthorized error (missing or malformed identity).
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), "UNAUTHENTICATED")
    }

    /// Create a 500 Internal Server Error carrying its source for the log.
    #[must_use]
    pub fn internal(source: anyhow::Error) -> Self {
        let mut err = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred".to_string(),
            "INTERNAL_SERVER_ERROR",
        );
        err.source = Some(source);
        err
    }

    /// The response status, exposed for tests.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        let message = err.to_string();
        match err {
            AdmissionError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
            }
            AdmissionError::DuplicateRegistration => {
                Self::new(StatusCode::CONFLICT, message, "DUPLICATE_REGISTRATION")
            }
            AdmissionError::CapacityExceeded => {
                Self::new(StatusCode::CONFLICT, message, "CAPACITY_EXCEEDED")
            }
            AdmissionError::InvalidStatus { .. } => {
                Self::new(StatusCode::BAD_REQUEST, message, "INVALID_STATUS")
            }
            AdmissionError::AlreadyProcessed => {
                Self::new(StatusCode::CONFLICT, message, "ALREADY_PROCESSED")
            }
            AdmissionError::Unauthorized => {
                Self::new(StatusCode::FORBIDDEN, message, "FORBIDDEN")
            }
            AdmissionError::TicketNotReady => {
                Self::new(StatusCode::BAD_REQUEST, message, "TICKET_NOT_READY")
            }
            AdmissionError::Validation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, message, "VALIDATION_ERROR")
            }
            AdmissionError::Storage(detail) => Self::internal(anyhow::anyhow!(detail)),
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}
