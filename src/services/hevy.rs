// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hevy API client for fetching workouts.

use crate::error::AppError;
use crate::models::Workout;

/// Hevy API client.
#[derive(Clone)]
pub struct HevyClient {
    http: reqwest::Client,
    workouts_url: String,
}

impl HevyClient {
    pub fn new(http: reqwest::Client, workouts_url: String) -> Self {
        Self { http, workouts_url }
    }

    /// Get a workout by ID.
    ///
    /// An empty `api_key` fails before any request is made.
    pub async fn get_workout(&self, workout_id: &str, api_key: &str) -> Result<Workout, AppError> {
        let result = self.fetch_workout(workout_id, api_key).await;
        if let Err(ref e) = result {
            tracing::warn!(workout_id, error = %e, "Hevy workout error");
        }
        result
    }

    async fn fetch_workout(&self, workout_id: &str, api_key: &str) -> Result<Workout, AppError> {
        if api_key.is_empty() {
            return Err(AppError::MissingCredential("API key"));
        }

        let url = format!("{}/{}", self.workouts_url.trim_end_matches('/'), workout_id);

        let response = self
            .http
            .get(&url)
            .header("api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::InvalidPayload(format!("Hevy workout {}: {}", workout_id, e)))
    }
}
