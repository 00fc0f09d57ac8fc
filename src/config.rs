// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Read once at startup and passed by reference to every component.
//! There is no reload; restart the process to pick up new values.

use chrono_tz::Tz;
use std::env;

/// Which backend holds the Fitbit token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Firestore documents (survives restarts).
    Firestore,
    /// Process memory (local runs and tests).
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Fitbit OAuth credentials ---
    /// Fitbit OAuth client ID
    pub fitbit_client_id: String,
    /// Fitbit OAuth client secret
    pub fitbit_secret: String,
    /// Authorization code obtained once through the Fitbit consent flow
    pub fitbit_auth_code: String,
    /// PKCE verifier matching the challenge used for `fitbit_auth_code`
    pub fitbit_code_verifier: String,

    // --- Hevy ---
    /// Hevy API key. May be empty; fetching a workout then fails.
    pub hevy_api_key: String,

    // --- Endpoints ---
    pub hevy_workouts_url: String,
    pub fitbit_token_url: String,
    pub fitbit_activity_url: String,

    // --- Runtime ---
    /// Zone used to express the workout start as a Fitbit-local date/time
    pub target_timezone: Tz,
    pub token_store: StoreBackend,
    /// GCP project ID (Firestore backend)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            fitbit_client_id: "test-client-id".to_string(),
            fitbit_secret: "test-secret".to_string(),
            fitbit_auth_code: "test-auth-code".to_string(),
            fitbit_code_verifier: "test-code-verifier".to_string(),
            hevy_api_key: "test-api-key".to_string(),
            hevy_workouts_url: DEFAULT_HEVY_WORKOUTS_URL.to_string(),
            fitbit_token_url: DEFAULT_FITBIT_TOKEN_URL.to_string(),
            fitbit_activity_url: DEFAULT_FITBIT_ACTIVITY_URL.to_string(),
            target_timezone: chrono_tz::Europe::London,
            token_store: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            port: 8080,
        }
    }
}

const DEFAULT_HEVY_WORKOUTS_URL: &str = "https://api.hevyapp.com/v1/workouts";
const DEFAULT_FITBIT_TOKEN_URL: &str = "https://api.fitbit.com/oauth2/token";
const DEFAULT_FITBIT_ACTIVITY_URL: &str = "https://api.fitbit.com/1/user/-/activities.json";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let timezone_name = or_default("TARGET_TIMEZONE", "Europe/London");
        let target_timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid("TARGET_TIMEZONE", timezone_name.clone()))?;

        let token_store = match or_default("TOKEN_STORE", "firestore").as_str() {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::Invalid("TOKEN_STORE", other.to_string())),
        };

        Ok(Self {
            fitbit_client_id: required("FITBIT_CLIENT_ID")?,
            fitbit_secret: required("FITBIT_SECRET")?,
            fitbit_auth_code: required("FITBIT_AUTH_CODE")?,
            fitbit_code_verifier: required("FITBIT_CODE_VERIFIER")?,
            hevy_api_key: lookup("HEVY_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            hevy_workouts_url: or_default("HEVY_WORKOUTS_URL", DEFAULT_HEVY_WORKOUTS_URL),
            fitbit_token_url: or_default("FITBIT_TOKEN_URL", DEFAULT_FITBIT_TOKEN_URL),
            fitbit_activity_url: or_default("FITBIT_ACTIVITY_URL", DEFAULT_FITBIT_ACTIVITY_URL),
            target_timezone,
            token_store,
            gcp_project_id: or_default("GCP_PROJECT_ID", "local-dev"),
            port: or_default("PORT", "8080").parse().unwrap_or(8080),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
