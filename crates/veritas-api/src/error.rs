//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps coordinator, ledger, and validation errors to HTTP status codes
//! and a JSON body with error code, message, and optional details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use veritas_ledger::LedgerError;

use crate::coordinator::CoordinatorError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "INVALID_INPUT", "NOT_CONNECTED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing request input (400).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Ledger read or verification attempted in mock mode (400).
    #[error("ledger not connected")]
    NotConnected,

    /// The ledger has no such record (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The generation collaborator failed (500).
    #[error("generation failed: {0}")]
    GenerationFailure(String),

    /// A ledger read failed (500).
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Anything else (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Self::NotConnected => (StatusCode::BAD_REQUEST, "NOT_CONNECTED"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::GenerationFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_FAILURE")
            }
            Self::Ledger(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<veritas_core::ValidationError> for AppError {
    fn from(err: veritas_core::ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotConnected => Self::NotConnected,
            LedgerError::NotFound { what } => Self::NotFound(what),
            other => Self::Ledger(other.to_string()),
        }
    }
}

impl From<CoordinatorError> for AppError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::InvalidInput(msg) => Self::InvalidInput(msg),
            CoordinatorError::GenerationFailure(e) => Self::GenerationFailure(e.to_string()),
            CoordinatorError::Unassigned(e) => Self::Internal(e.to_string()),
        }
    }
}
