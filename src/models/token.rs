//! Fitbit OAuth token models.

use serde::{Deserialize, Serialize};

/// Token pair persisted between webhook invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token endpoint response, for both the `authorization_code` and
/// `refresh_token` grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Fitbit user ID the tokens belong to
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TokenResponse {
    /// The part of the response worth keeping.
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}
