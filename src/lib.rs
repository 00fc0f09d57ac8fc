// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Hevy-Fitbit relay: log Hevy workouts as Fitbit activities
//!
//! This crate receives Hevy workout webhooks, looks up the workout, and
//! records it as a weight-training entry in the Fitbit activity log,
//! keeping the Fitbit OAuth tokens alive in between.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::TokenStore;
use services::{FitbitClient, FitbitService, HevyClient};

/// Shared application state.
pub struct AppState<S> {
    pub config: Config,
    pub hevy: HevyClient,
    pub fitbit: FitbitService<S>,
}

impl<S: TokenStore> AppState<S> {
    /// Build the state with a default HTTP client.
    pub fn new(config: Config, store: S) -> Self {
        Self::with_http_client(config, store, reqwest::Client::new())
    }

    /// Build the state sharing the given HTTP client between both APIs.
    pub fn with_http_client(config: Config, store: S, http: reqwest::Client) -> Self {
        let hevy = HevyClient::new(http.clone(), config.hevy_workouts_url.clone());
        let fitbit = FitbitService::new(
            FitbitClient::new(http, &config),
            store,
            config.target_timezone,
        );

        Self {
            config,
            hevy,
            fitbit,
        }
    }
}
