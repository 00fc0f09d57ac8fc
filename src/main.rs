// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hevy-Fitbit relay server
//!
//! Receives Hevy workout webhooks and logs each workout as a Fitbit
//! activity.

use anyhow::Context;
use hevy_fitbit_relay::{
    config::{Config, StoreBackend},
    db::{FirestoreTokenStore, MemoryTokenStore, TokenStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        timezone = config.target_timezone.name(),
        store = ?config.token_store,
        "Starting Hevy-Fitbit relay"
    );

    match config.token_store {
        StoreBackend::Firestore => {
            let store = FirestoreTokenStore::new(&config.gcp_project_id)
                .await
                .context("Failed to connect to Firestore")?;
            serve(config, store).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory token store, tokens will not survive a restart");
            serve(config, MemoryTokenStore::new()).await
        }
    }
}

async fn serve<S: TokenStore>(config: Config, store: S) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config, store));
    let app = hevy_fitbit_relay::routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("hevy_fitbit_relay=debug,info")
            }),
        )
        .with(format)
        .init();
}
