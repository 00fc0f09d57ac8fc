//! Inbound Hevy webhook payload.

use serde::Deserialize;

/// Hevy "workout created" webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Delivery ID (absent in some test deliveries)
    #[serde(default)]
    pub id: Option<String>,
    pub payload: WorkoutRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutRef {
    #[serde(rename = "workoutId")]
    pub workout_id: String,
}
