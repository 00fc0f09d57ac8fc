// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token storage.
//!
//! The relay keeps exactly two string values between invocations: the
//! Fitbit access token and refresh token. [`TokenStore`] is the seam the
//! token manager talks through; the backend is picked at startup.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::AppError;
use crate::models::TokenPair;
use std::future::Future;

/// Key names as constants.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Persistent key-value store holding the Fitbit token pair.
///
/// No locking is provided across keys. Two webhook invocations racing on a
/// refresh can overwrite each other's tokens.
pub trait TokenStore: Clone + Send + Sync + 'static {
    /// Read a value, `None` if the key has never been written or was deleted.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    /// Write (or overwrite) a value.
    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Remove a value. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Store a complete token pair.
    ///
    /// The default performs two independent writes, access token first. A
    /// failure between them leaves a new access token next to the old
    /// refresh token. Backends with a transaction primitive override this.
    fn put_tokens(&self, tokens: &TokenPair) -> impl Future<Output = Result<(), AppError>> + Send {
        async move {
            self.put(keys::ACCESS_TOKEN, &tokens.access_token).await?;
            self.put(keys::REFRESH_TOKEN, &tokens.refresh_token).await
        }
    }
}
