// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.
//!
//! Hevy reports absolute ISO-8601 instants; Fitbit wants a wall-clock
//! date and time in the user's zone plus a duration in milliseconds.

use crate::error::AppError;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

/// Start of an activity as Fitbit expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStart {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour clock
    pub time: String,
}

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(value).map_err(|e| AppError::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Express an absolute timestamp as a calendar date and clock time in `tz`.
pub fn local_date_and_time(timestamp: &str, tz: Tz) -> Result<LocalStart, AppError> {
    let local = parse_instant(timestamp)?.with_timezone(&tz);

    Ok(LocalStart {
        date: local.format("%Y-%m-%d").to_string(),
        time: local.format("%H:%M").to_string(),
    })
}

/// Milliseconds from `start` to `end`. Negative if the two are reversed.
pub fn duration_ms(start: &str, end: &str) -> Result<i64, AppError> {
    let start = parse_instant(start)?;
    let end = parse_instant(end)?;
    Ok(end.timestamp_millis() - start.timestamp_millis())
}
