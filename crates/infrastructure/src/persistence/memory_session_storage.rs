//! In-memory session storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tenant_auth_application::{SessionResult, SessionStorage};
use tokio::sync::RwLock;

/// Thread-safe in-memory session storage.
///
/// Nothing survives the process; suited to tests and to hosts that keep a
/// session only for their own lifetime.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySessionStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get_item(&self, key: &str) -> SessionResult<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> SessionResult<()> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }

    async fn set_items(&self, entries: &[(&str, &str)]) -> SessionResult<()> {
        let mut items = self.items.write().await;
        for (key, value) in entries {
            items.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn remove_items(&self, keys: &[&str]) -> SessionResult<()> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}
