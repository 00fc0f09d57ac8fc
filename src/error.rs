// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every failure inside a webhook invocation propagates up to the handler
//! as an [`AppError`]. Its `IntoResponse` impl is the one place errors are
//! turned into HTTP: full detail goes to the logs, the caller only ever sees
//! a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Body returned for any failed webhook invocation.
pub const WEBHOOK_FAILED: &str = "Failed to process webhook event.";

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing {0}")]
    MissingCredential(&'static str),

    #[error("Response status: {status}")]
    Upstream { status: u16 },

    #[error("Failed to get Fitbit access token: {0}")]
    AuthorizationFailed(String),

    #[error("Failed to refresh Fitbit token: {0}")]
    RefreshFailed(String),

    #[error("Failed to create activity: {0}")]
    ActivityCreationFailed(String),

    #[error("Invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to process webhook event");
        (StatusCode::INTERNAL_SERVER_ERROR, WEBHOOK_FAILED).into_response()
    }
}
