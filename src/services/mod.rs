// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream API clients and token management.

pub mod fitbit;
pub mod hevy;

pub use fitbit::{FitbitClient, FitbitService};
pub use hevy::HevyClient;
