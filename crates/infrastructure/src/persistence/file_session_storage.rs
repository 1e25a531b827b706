//! File-based session storage.
//!
//! The whole session is one JSON object of string values:
//! ```json
//! {
//!   "authToken": "eyJhbGciOi...",
//!   "refreshToken": "5Jd8..."
//! }
//! ```
//! The file holds live credentials and should only be readable by its owner.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tenant_auth_application::{SessionError, SessionResult, SessionStorage};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

/// File-based session storage.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStorage {
    /// Creates a storage backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Reads the stored items.
    ///
    /// An unparseable file reads as empty; the flag is true in that case so
    /// writers know to replace it.
    async fn read_all(&self) -> SessionResult<(BTreeMap<String, String>, bool)> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((BTreeMap::new(), false)),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok((BTreeMap::new(), false));
        }
        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok((items, false)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session file is unreadable; treating it as empty"
                );
                Ok((BTreeMap::new(), true))
            }
        }
    }

    async fn write_all(&self, items: &BTreeMap<String, String>) -> SessionResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut content = serde_json::to_vec_pretty(items)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;
        content.push(b'\n');

        // Write then rename so a crash never leaves a half-written session.
        let temp = self.temp_path();
        fs::write(&temp, content).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get_item(&self, key: &str) -> SessionResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let (mut items, _) = self.read_all().await?;
        Ok(items.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> SessionResult<()> {
        self.set_items(&[(key, value)]).await
    }

    async fn remove_item(&self, key: &str) -> SessionResult<()> {
        self.remove_items(&[key]).await
    }

    async fn set_items(&self, entries: &[(&str, &str)]) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        let (mut items, _) = self.read_all().await?;
        for (key, value) in entries {
            items.insert((*key).to_string(), (*value).to_string());
        }
        self.write_all(&items).await
    }

    async fn remove_items(&self, keys: &[&str]) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        let (mut items, unreadable) = self.read_all().await?;
        let mut changed = unreadable;
        for key in keys {
            changed |= items.remove(*key).is_some();
        }
        if changed {
            self.write_all(&items).await?;
        }
        Ok(())
    }
}
