// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook route for Hevy workout events.
//!
//! Any path is accepted. Errors are deliberately opaque to the caller: a bad
//! payload, a Hevy outage and a Fitbit auth failure all produce the same
//! 500, with the detail only in the server logs.

use crate::db::TokenStore;
use crate::error::AppError;
use crate::models::WebhookPayload;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;

/// Body returned after a workout was relayed.
pub const WEBHOOK_PROCESSED: &str = "Webhook event processed successfully.";
/// Body returned for anything but POST.
pub const INVALID_METHOD: &str = "Invalid request method.";

/// Webhook routes.
pub fn routes<S: TokenStore>() -> Router<Arc<AppState<S>>> {
    Router::new().fallback(handle_event::<S>)
}

/// Handle an incoming webhook delivery.
async fn handle_event<S: TokenStore>(
    State(state): State<Arc<AppState<S>>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        tracing::warn!(method = %method, "Rejected non-POST webhook request");
        return (StatusCode::METHOD_NOT_ALLOWED, INVALID_METHOD).into_response();
    }

    match relay_workout(&state, &body).await {
        Ok(()) => (StatusCode::OK, WEBHOOK_PROCESSED).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Fetch the announced workout from Hevy and log it on Fitbit.
async fn relay_workout<S: TokenStore>(state: &AppState<S>, body: &[u8]) -> Result<(), AppError> {
    tracing::info!(payload = %String::from_utf8_lossy(body), "Webhook event received (raw)");

    let event: WebhookPayload = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidPayload(format!("webhook body: {}", e)))?;
    let workout_id = event.payload.workout_id.as_str();

    let workout = state
        .hevy
        .get_workout(workout_id, &state.config.hevy_api_key)
        .await?;

    tracing::info!(
        workout_id,
        event_id = event.id.as_deref().unwrap_or_default(),
        title = workout.title().unwrap_or_default(),
        start_time = %workout.start_time,
        end_time = %workout.end_time,
        exercises = workout.exercises().len(),
        "Fetched Hevy workout"
    );

    state
        .fitbit
        .create_activity(&workout.start_time, &workout.end_time)
        .await
}
