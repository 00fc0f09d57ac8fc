//! Hevy workout model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Workout as returned by `GET /v1/workouts/{id}`.
///
/// Only the start and end times are read. Everything else (title, exercises,
/// sets) is kept as raw JSON for logging, so its shape is never validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// ISO 8601
    pub start_time: String,
    /// ISO 8601
    pub end_time: String,
    #[serde(flatten)]
    pub detail: Map<String, Value>,
}

impl Workout {
    pub fn title(&self) -> Option<&str> {
        self.detail.get("title").and_then(Value::as_str)
    }

    /// Raw exercise entries; empty if absent or not an array.
    pub fn exercises(&self) -> &[Value] {
        self.detail
            .get("exercises")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
