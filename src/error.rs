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
    /// Strava rejected our credentials (bad client secret, revoked refresh token).
    #[error("Strava authentication failed: {0}")]
    Authentication(String),

    /// Transport failure or a transient upstream status; safe to retry later.
    #[error("Network error talking to Strava: {0}")]
    Network(String),

    #[error("Strava rate limit exceeded")]
    RateLimited,

    /// Strava answered, but not with something we can parse.
    #[error("Malformed Strava response: {0}")]
    MalformedResponse(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    /// Photo cache on disk could not be read back.
    #[error("Photo cache corrupt: {0}")]
    CacheCorrupt(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the same call could succeed if issued again later.
    ///
    /// Nothing retries automatically; this only informs logging and callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::RateLimited)
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Authentication(msg) => {
                tracing::error!(error = %msg, "Strava authentication failed");
                (StatusCode::BAD_GATEWAY, "strava_auth_error", None)
            }
            AppError::Network(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "network_error",
                Some(msg.clone()),
            ),
            AppError::RateLimited => (StatusCode::SERVICE_UNAVAILABLE, "rate_limited", None),
            AppError::MalformedResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                "malformed_response",
                Some(msg.clone()),
            ),
            AppError::StravaApi(msg) => {
                (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone()))
            }
            AppError::CacheCorrupt(msg) => {
                tracing::error!(error = %msg, "Photo cache corrupt");
                (StatusCode::INTERNAL_SERVER_ERROR, "cache_error", None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
