//! Key-value storage and the session credential kept in it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// String key-value storage with manual lifecycle (browser `localStorage` in production).
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
    async fn remove(&self, key: &str);
}

/// In-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_owned(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

/// Bearer token held under one well-known key.
///
/// Presence means logged in. Callers read it at request time and never keep a
/// copy across an await, since a logout may clear it in between.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CredentialStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// Current token; blank values count as absent.
    pub async fn token(&self) -> Option<String> {
        self.store.get(&self.key).await.filter(|t| !t.trim().is_empty())
    }

    pub async fn is_present(&self) -> bool {
        self.token().await.is_some()
    }

    pub async fn set(&self, token: String) {
        self.store.set(&self.key, token).await;
    }

    pub async fn clear(&self) {
        self.store.remove(&self.key).await;
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").field("key", &self.key).finish()
    }
}
