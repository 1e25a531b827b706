//! JWT-backed authentication state holder.
//!
//! Stores the token pair in a [`SessionStorage`] and derives the
//! authentication state from the access token's claims.

use std::sync::Arc;

use async_trait::async_trait;
use tenant_auth_application::{AuthStateProvider, SessionResult, SessionStorage};
use tenant_auth_domain::{AuthenticationState, TokenPair};
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use super::decode_claims;

/// Storage key of the access token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Authentication state holder over a session storage.
///
/// The pair is written and cleared through a single storage batch, and
/// writers are serialized, so readers never observe one token of an old
/// pair next to one of a new pair.
pub struct JwtAuthStateProvider<S: ?Sized> {
    storage: Arc<S>,
    pair_lock: RwLock<()>,
    changes: watch::Sender<AuthenticationState>,
}

impl<S: SessionStorage + ?Sized> JwtAuthStateProvider<S> {
    /// Creates a provider over empty storage, starting anonymous.
    #[must_use]
    pub fn new(storage: Arc<S>) -> Self {
        let (changes, _) = watch::channel(AuthenticationState::Anonymous);
        Self {
            storage,
            pair_lock: RwLock::new(()),
            changes,
        }
    }

    /// Creates a provider over storage that may already hold a session.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn restore(storage: Arc<S>) -> SessionResult<Self> {
        let provider = Self::new(storage);
        let state = provider.current_state().await?;
        provider.changes.send_replace(state);
        Ok(provider)
    }

    /// Subscribes to login/logout announcements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthenticationState> {
        self.changes.subscribe()
    }

    /// The stored access token, if any.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn access_token(&self) -> SessionResult<Option<String>> {
        let _guard = self.pair_lock.read().await;
        self.storage.get_item(AUTH_TOKEN_KEY).await
    }

    /// The stored refresh token, if any.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn refresh_token(&self) -> SessionResult<Option<String>> {
        let _guard = self.pair_lock.read().await;
        self.storage.get_item(REFRESH_TOKEN_KEY).await
    }

    /// The stored pair, if both tokens are present.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn token_pair(&self) -> SessionResult<Option<TokenPair>> {
        let _guard = self.pair_lock.read().await;
        let token = self.storage.get_item(AUTH_TOKEN_KEY).await?;
        let refresh_token = self.storage.get_item(REFRESH_TOKEN_KEY).await?;
        Ok(token.zip(refresh_token).map(|(t, r)| TokenPair::new(t, r)))
    }

    fn state_from_token(token: Option<&str>) -> AuthenticationState {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return AuthenticationState::Anonymous;
        };
        match decode_claims(token) {
            Ok(claims) => AuthenticationState::Authenticated(claims),
            Err(e) => {
                debug!(error = %e, "stored access token is unreadable; treating as anonymous");
                AuthenticationState::Anonymous
            }
        }
    }

    async fn write_pair(&self, token: &str, refresh_token: &str) -> SessionResult<()> {
        let _guard = self.pair_lock.write().await;
        self.storage
            .set_items(&[(AUTH_TOKEN_KEY, token), (REFRESH_TOKEN_KEY, refresh_token)])
            .await
    }
}

#[async_trait]
impl<S: SessionStorage + ?Sized> AuthStateProvider for JwtAuthStateProvider<S> {
    async fn mark_logged_in(&self, token: &str, refresh_token: &str) -> SessionResult<()> {
        self.write_pair(token, refresh_token).await?;
        let state = Self::state_from_token(Some(token));
        info!(
            tenant = state.tenant().unwrap_or("-"),
            "session stored for logged-in user"
        );
        self.changes.send_replace(state);
        Ok(())
    }

    async fn mark_logged_out(&self) -> SessionResult<()> {
        {
            let _guard = self.pair_lock.write().await;
            self.storage
                .remove_items(&[AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY])
                .await?;
        }
        info!("session cleared");
        self.changes.send_replace(AuthenticationState::Anonymous);
        Ok(())
    }

    async fn current_state(&self) -> SessionResult<AuthenticationState> {
        let token = self.access_token().await?;
        Ok(Self::state_from_token(token.as_deref()))
    }

    async fn save_tokens(&self, token: &str, refresh_token: &str) -> SessionResult<()> {
        debug!("replacing stored token pair");
        self.write_pair(token, refresh_token).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::jwt::unsigned_token;
    use crate::persistence::MemorySessionStorage;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tenant_auth_application::SessionError;

    /// Storage that refuses every write touching the refresh token while
    /// `full` is set, as a disk that runs out of space mid-pair would.
    #[derive(Default)]
    struct FullDiskStorage {
        inner: MemorySessionStorage,
        full: AtomicBool,
    }

    impl FullDiskStorage {
        fn check(&self, key: &str) -> SessionResult<()> {
            if self.full.load(Ordering::SeqCst) && key == REFRESH_TOKEN_KEY {
                return Err(SessionError::Serialization("disk full".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SessionStorage for FullDiskStorage {
        async fn get_item(&self, key: &str) -> SessionResult<Option<String>> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> SessionResult<()> {
            self.check(key)?;
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> SessionResult<()> {
            self.check(key)?;
            self.inner.remove_item(key).await
        }

        async fn set_items(&self, items: &[(&str, &str)]) -> SessionResult<()> {
            for (key, _) in items {
                self.check(key)?;
            }
            self.inner.set_items(items).await
        }

        async fn remove_items(&self, keys: &[&str]) -> SessionResult<()> {
            for key in keys {
                self.check(key)?;
            }
            self.inner.remove_items(keys).await
        }
    }

    fn provider() -> (Arc<MemorySessionStorage>, JwtAuthStateProvider<MemorySessionStorage>) {
        let storage = Arc::new(MemorySessionStorage::new());
        (storage.clone(), JwtAuthStateProvider::new(storage))
    }

    #[tokio::test]
    async fn test_starts_anonymous() {
        let (_, provider) = provider();
        let state = provider.current_state().await.unwrap();
        assert_eq!(state, AuthenticationState::Anonymous);
        assert!(provider.token_pair().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_logged_in_stores_pair_and_exposes_claims() {
        let (storage, provider) = provider();
        let token = unsigned_token(&json!({"tenant": "root", "email": "admin@root.com"}));

        provider.mark_logged_in(&token, "refresh-1").await.unwrap();

        assert_eq!(
            storage.get_item(AUTH_TOKEN_KEY).await.unwrap().as_deref(),
            Some(token.as_str())
        );
        assert_eq!(
            storage.get_item(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
            Some("refresh-1")
        );

        let state = provider.current_state().await.unwrap();
        assert_eq!(state.tenant(), Some("root"));
        assert_eq!(
            state.claims().and_then(|c| c.email()),
            Some("admin@root.com")
        );
    }

    #[tokio::test]
    async fn test_login_and_logout_are_announced() {
        let (_, provider) = provider();
        let mut changes = provider.subscribe();
        let token = unsigned_token(&json!({"tenant": "root"}));

        provider.mark_logged_in(&token, "r").await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert!(changes.borrow_and_update().is_authenticated());

        provider.mark_logged_out().await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert!(!changes.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn test_mark_logged_out_clears_both_tokens() {
        let (storage, provider) = provider();
        provider
            .mark_logged_in(&unsigned_token(&json!({"tenant": "root"})), "r")
            .await
            .unwrap();

        provider.mark_logged_out().await.unwrap();

        assert!(storage.get_item(AUTH_TOKEN_KEY).await.unwrap().is_none());
        assert!(storage.get_item(REFRESH_TOKEN_KEY).await.unwrap().is_none());
        assert_eq!(
            provider.current_state().await.unwrap(),
            AuthenticationState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_save_tokens_replaces_pair_without_announcing() {
        let (_, provider) = provider();
        provider
            .mark_logged_in(&unsigned_token(&json!({"tenant": "root"})), "r1")
            .await
            .unwrap();
        let changes = provider.subscribe();

        let refreshed = unsigned_token(&json!({"tenant": "root", "exp": 2_000_000_000}));
        provider.save_tokens(&refreshed, "r2").await.unwrap();

        assert!(!changes.has_changed().unwrap());
        assert_eq!(
            provider.token_pair().await.unwrap(),
            Some(TokenPair::new(refreshed, "r2"))
        );
    }

    #[tokio::test]
    async fn test_unreadable_token_is_anonymous() {
        let (storage, provider) = provider();
        storage.set_item(AUTH_TOKEN_KEY, "garbage").await.unwrap();

        assert_eq!(
            provider.current_state().await.unwrap(),
            AuthenticationState::Anonymous
        );
        assert_eq!(
            provider.access_token().await.unwrap().as_deref(),
            Some("garbage")
        );
    }

    #[tokio::test]
    async fn test_restore_picks_up_existing_session() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage
            .set_item(AUTH_TOKEN_KEY, &unsigned_token(&json!({"tenant": "beta"})))
            .await
            .unwrap();
        storage.set_item(REFRESH_TOKEN_KEY, "r").await.unwrap();

        let provider = JwtAuthStateProvider::restore(storage).await.unwrap();

        assert_eq!(provider.subscribe().borrow().tenant(), Some("beta"));
        assert_eq!(provider.refresh_token().await.unwrap().as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_pair() {
        let storage = Arc::new(FullDiskStorage::default());
        let provider = JwtAuthStateProvider::new(storage.clone());
        provider.save_tokens("old-access", "old-refresh").await.unwrap();

        storage.full.store(true, Ordering::SeqCst);
        let result = provider.save_tokens("new-access", "new-refresh").await;

        assert!(matches!(result, Err(SessionError::Serialization(_))));
        assert_eq!(
            provider.token_pair().await.unwrap(),
            Some(TokenPair::new("old-access", "old-refresh"))
        );
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_pair_together() {
        let storage = Arc::new(FullDiskStorage::default());
        let provider = JwtAuthStateProvider::new(storage.clone());
        let token = unsigned_token(&json!({"tenant": "root"}));
        provider.mark_logged_in(&token, "r").await.unwrap();

        storage.full.store(true, Ordering::SeqCst);
        assert!(provider.mark_logged_out().await.is_err());

        assert_eq!(
            provider.token_pair().await.unwrap(),
            Some(TokenPair::new(token, "r"))
        );
    }
}
