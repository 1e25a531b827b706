//! Session storage port
//!
//! A string key/value store scoped to one client session, the equivalent of
//! a browser's local storage.

use async_trait::async_trait;

/// Errors that can occur while reading or writing session state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for session storage operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Key/value storage backing the authentication state holder.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Reads a value. Returns `None` if the key is not set.
    async fn get_item(&self, key: &str) -> SessionResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn set_item(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> SessionResult<()>;

    /// Writes several values as one change: either all of them are stored
    /// or, on error, none of the previous values are replaced.
    async fn set_items(&self, items: &[(&str, &str)]) -> SessionResult<()>;

    /// Removes several values as one change.
    async fn remove_items(&self, keys: &[&str]) -> SessionResult<()>;
}
