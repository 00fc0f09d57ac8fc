// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed token store.
//!
//! Each key is one document in [`TOKENS_COLLECTION`] whose ID is the key
//! name and whose only field is `value`.

use super::{keys, TokenStore};
use crate::error::AppError;
use crate::models::TokenPair;
use serde::{Deserialize, Serialize};

/// Collection holding the token documents.
pub const TOKENS_COLLECTION: &str = "fitbit_tokens";

/// Document shape for a single stored secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSecret {
    value: String,
}

/// Firestore token store.
#[derive(Clone)]
pub struct FirestoreTokenStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreTokenStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore Emulator");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Offline store for tests. Every operation returns an error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

impl TokenStore for FirestoreTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let secret: Option<StoredSecret> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(TOKENS_COLLECTION)
            .obj()
            .one(key)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(secret.map(|s| s.value))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(TOKENS_COLLECTION)
            .document_id(key)
            .object(&StoredSecret {
                value: value.to_string(),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(TOKENS_COLLECTION)
            .document_id(key)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Both documents are written in one transaction.
    async fn put_tokens(&self, tokens: &TokenPair) -> Result<(), AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for (key, value) in [
            (keys::ACCESS_TOKEN, &tokens.access_token),
            (keys::REFRESH_TOKEN, &tokens.refresh_token),
        ] {
            client
                .fluent()
                .update()
                .in_col(TOKENS_COLLECTION)
                .document_id(key)
                .object(&StoredSecret {
                    value: value.clone(),
                })
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add {} to transaction: {}", key, e))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }
}
