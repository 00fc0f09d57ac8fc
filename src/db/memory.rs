// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process token store.
//!
//! Tokens are lost on restart, which means the static authorization code
//! gets exchanged again. Fitbit only accepts a code once, so this backend is
//! for local runs and tests.

use super::TokenStore;
use crate::error::AppError;
use dashmap::DashMap;
use std::sync::Arc;

/// `DashMap`-backed store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}
