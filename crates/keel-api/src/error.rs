//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every error response on the surface uses the same JSON envelope with a
//! machine-readable code, a human-readable message, and optional details.
//! Internal error messages are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "INVALID_VALUE", "NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A bound request value failed basic type/format validation (400).
    ///
    /// The message carries the offending property name and the submitted
    /// value so the caller can locate the mistake without consulting docs.
    #[error("{property}: value '{value}' is invalid.")]
    InvalidValue {
        property: String,
        value: String,
    },

    /// The requested API version is well-formed but not published (400).
    #[error("unsupported API version: {0}")]
    UnsupportedVersion(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request content violates a semantic rule (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication failure — missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — insufficient permissions (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Construct an invalid-value error for a bound request property.
    pub fn invalid_value(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue { property: property.into(), value: value.into() }
    }

    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidValue { .. } => (StatusCode::BAD_REQUEST, "INVALID_VALUE"),
            Self::UnsupportedVersion(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_API_VERSION"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Client-facing details payload, present only for binding failures.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InvalidValue { property, value } => Some(serde_json::json!({
                "property": property,
                "value": value,
            })),
            _ => None,
        }
    }
}

impl From<keel_core::VersionError> for AppError {
    fn from(err: keel_core::VersionError) -> Self {
        let keel_core::VersionError::Malformed(raw) = err;
        Self::invalid_value("api-version", raw)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}
