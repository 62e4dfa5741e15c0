//! Durable key-value storage capability.
//!
//! Claim state survives page reloads and process restarts through this
//! trait. The core never assumes a storage medium: a browser host wraps its
//! local storage, a desktop host a file, tests use [`MemoryStore`].
//! Persisted values are plain decimal strings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::constants::CLAIM_COOLDOWN_KEY_PREFIX;
use crate::constants::CLAIM_COUNT_KEY_PREFIX;
use crate::error::StoreError;

/// Durable string key-value storage.
#[async_trait]
pub trait DurableKeyValueStore: Send + Sync {
    /// Read a value; `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, overwriting any existing one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DurableKeyValueStore + ?Sized> DurableKeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}

/// Storage key for an address's claim count.
///
/// Keys are namespaced per address so windows cannot collide.
pub fn claim_count_key(address: &str) -> String {
    format!("{}{}", CLAIM_COUNT_KEY_PREFIX, address)
}

/// Storage key for an address's cooldown deadline.
pub fn claim_cooldown_key(address: &str) -> String {
    format!("{}{}", CLAIM_COOLDOWN_KEY_PREFIX, address)
}

/// In-memory, non-persistent store for tests and ephemeral sessions.
///
/// Never fails; real persistent backends surface their own [`StoreError`]s.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[async_trait]
impl DurableKeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().await.remove(key);
        Ok(())
    }
}
