// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod token;
pub mod webhook;
pub mod workout;

pub use token::{TokenPair, TokenResponse};
pub use webhook::WebhookPayload;
pub use workout::Workout;
