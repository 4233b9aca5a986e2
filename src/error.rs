// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Usage limit reached: {0}")]
    UsageLimitReached(String),

    #[error("Payment signature mismatch")]
    InvalidSignature,

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("{service} API error (status {status:?}): {body}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        body: String,
    },

    #[error("{0} API timed out")]
    UpstreamTimeout(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Map a reqwest transport error for `service`.
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::UpstreamTimeout(service)
        } else {
            AppError::Upstream {
                service,
                status: err.status().map(|s| s.as_u16()),
                body: err.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Names the failing fields only; rejected values are not echoed back.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err
            .field_errors()
            .into_keys()
            .map(|name| name.to_string())
            .collect();
        fields.sort();
        AppError::BadRequest(format!("Invalid fields: {}", fields.join(", ")))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::UsageLimitReached(msg) => (
                StatusCode::FORBIDDEN,
                "usage_limit_reached",
                Some(msg.clone()),
            ),
            AppError::InvalidSignature => {
                tracing::warn!("Payment signature verification failed");
                (StatusCode::BAD_REQUEST, "invalid_signature", None)
            }
            AppError::MissingCredential(name) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "missing_credential",
                Some(format!("{} is not configured", name)),
            ),
            AppError::Upstream { .. } => {
                tracing::warn!(error = %self, "Upstream API error");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    Some(self.to_string()),
                )
            }
            AppError::UpstreamTimeout(service) => {
                tracing::warn!(service = %service, "Upstream API timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "upstream_timeout",
                    Some(self.to_string()),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            success: false,
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
