// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbit API client and token management.
//!
//! Handles:
//! - Exchanging the static authorization code (PKCE) for a token pair
//! - Token refresh after the access token is rejected
//! - Logging a weight-training activity

use crate::config::Config;
use crate::db::{keys, TokenStore};
use crate::error::AppError;
use crate::models::{TokenPair, TokenResponse};
use crate::time_utils::{duration_ms, local_date_and_time};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono_tz::Tz;
use reqwest::{header, StatusCode};

/// Fitbit activity type for weight training.
pub const WEIGHT_TRAINING_ACTIVITY_ID: &str = "2050";

/// Fitbit API client.
#[derive(Clone)]
pub struct FitbitClient {
    http: reqwest::Client,
    token_url: String,
    activity_url: String,
    client_id: String,
    client_secret: String,
    auth_code: String,
    code_verifier: String,
}

impl FitbitClient {
    /// Create a new Fitbit client with OAuth credentials.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            token_url: config.fitbit_token_url.clone(),
            activity_url: config.fitbit_activity_url.clone(),
            client_id: config.fitbit_client_id.clone(),
            client_secret: config.fitbit_secret.clone(),
            auth_code: config.fitbit_auth_code.clone(),
            code_verifier: config.fitbit_code_verifier.clone(),
        }
    }

    /// `Authorization` header value for the token endpoint.
    fn basic_credentials(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", BASE64.encode(raw))
    }

    /// Exchange the configured authorization code for tokens.
    pub async fn exchange_code(&self) -> Result<TokenResponse, AppError> {
        let response = self
            .post_token(&[
                ("client_id", self.client_id.as_str()),
                ("code", self.auth_code.as_str()),
                ("code_verifier", self.code_verifier.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!(status = %status, body = %body, "Fitbit token exchange failed");
            return Err(AppError::AuthorizationFailed(body));
        }

        Ok(response.json().await?)
    }

    /// Refresh an access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .post_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!(status = %status, body = %body, "Fitbit token refresh failed");
            return Err(AppError::RefreshFailed(body));
        }

        Ok(response.json().await?)
    }

    async fn post_token(&self, form: &[(&str, &str)]) -> Result<reqwest::Response, AppError> {
        Ok(self
            .http
            .post(&self.token_url)
            .header(header::AUTHORIZATION, self.basic_credentials())
            .form(form)
            .send()
            .await?)
    }

    /// Send one activity-log request. The response is returned unchecked.
    pub async fn post_activity(
        &self,
        access_token: &str,
        activity: &ActivityLog,
    ) -> Result<reqwest::Response, AppError> {
        Ok(self
            .http
            .post(&self.activity_url)
            .bearer_auth(access_token)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .query(&activity.query())
            .send()
            .await?)
    }
}

/// One entry in the Fitbit activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLog {
    /// `YYYY-MM-DD` in the target zone
    pub date: String,
    /// `HH:MM` in the target zone
    pub start_time: String,
    pub duration_millis: i64,
}

impl ActivityLog {
    /// Query parameters for the create-activity call.
    pub fn query(&self) -> [(&'static str, String); 4] {
        [
            ("activityId", WEIGHT_TRAINING_ACTIVITY_ID.to_string()),
            ("durationMillis", self.duration_millis.to_string()),
            ("startTime", self.start_time.clone()),
            ("date", self.date.clone()),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FitbitService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

/// Fitbit service that manages the token lifecycle around activity creation.
///
/// Token state lives only in the store:
/// - nothing stored: not yet authorized, the auth code is exchanged
/// - access token rejected (401): refreshed once, request retried once
/// - refresh rejected: the refresh token is deleted, the access token is left
#[derive(Clone)]
pub struct FitbitService<S> {
    client: FitbitClient,
    store: S,
    timezone: Tz,
}

impl<S: TokenStore> FitbitService<S> {
    pub fn new(client: FitbitClient, store: S, timezone: Tz) -> Self {
        Self {
            client,
            store,
            timezone,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exchange the authorization code and store the resulting tokens.
    ///
    /// Nothing is written if Fitbit rejects the exchange.
    pub async fn authorize(&self) -> Result<TokenPair, AppError> {
        let tokens = self.client.exchange_code().await?.token_pair();
        self.store.put_tokens(&tokens).await?;

        tracing::info!("Fitbit authorization complete, tokens stored");
        Ok(tokens)
    }

    /// Refresh the token pair and store it.
    ///
    /// If Fitbit rejects the refresh token it is deleted from the store so the
    /// next invocation does not retry it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let tokens = match self.client.refresh_token(refresh_token).await {
            Ok(response) => response.token_pair(),
            Err(e @ AppError::RefreshFailed(_)) => {
                if let Err(db_err) = self.store.delete(keys::REFRESH_TOKEN).await {
                    tracing::warn!(error = %db_err, "Failed to delete rejected refresh token");
                }
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        self.store.put_tokens(&tokens).await?;

        tracing::info!("Fitbit token refreshed and stored");
        Ok(tokens)
    }

    /// Log a weight-training activity spanning `start_time`..`end_time`.
    ///
    /// The bearer token is whatever was in the store when the call started.
    /// It is not re-read after an initial authorization, and the 401 retry
    /// resends the identical request rather than picking up the refreshed
    /// token.
    pub async fn create_activity(&self, start_time: &str, end_time: &str) -> Result<(), AppError> {
        // An empty stored value counts as absent.
        let refresh_token = self
            .store
            .get(keys::REFRESH_TOKEN)
            .await?
            .filter(|t| !t.is_empty());
        let access_token = self
            .store
            .get(keys::ACCESS_TOKEN)
            .await?
            .filter(|t| !t.is_empty());

        tracing::debug!(
            has_access_token = access_token.is_some(),
            has_refresh_token = refresh_token.is_some(),
            "Loaded Fitbit tokens"
        );

        if access_token.is_none() && refresh_token.is_none() {
            tracing::info!("No Fitbit tokens stored, authorizing");
            self.authorize().await?;
        }

        let start = local_date_and_time(start_time, self.timezone)?;
        let activity = ActivityLog {
            date: start.date,
            start_time: start.time,
            duration_millis: duration_ms(start_time, end_time)?,
        };
        let access_token = access_token.unwrap_or_default();

        let mut response = self.client.post_activity(&access_token, &activity).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(refresh_token) = refresh_token.as_deref() {
                tracing::info!("Fitbit rejected access token, refreshing and retrying once");
                self.refresh(refresh_token).await?;
                response = self.client.post_activity(&access_token, &activity).await?;
            }
        }

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Fitbit activity creation failed");
            return Err(AppError::ActivityCreationFailed(body));
        }

        tracing::info!(
            date = %activity.date,
            start_time = %activity.start_time,
            duration_millis = activity.duration_millis,
            response = %body,
            "Fitbit activity created"
        );
        Ok(())
    }
}
