//! Authentication state holder port

use async_trait::async_trait;
use tenant_auth_domain::AuthenticationState;

use super::SessionResult;

/// Port for the component that owns the current session's token pair.
///
/// The holder is the sole owner and serializer of session mutations. It
/// derives the identity claims from the stored access token; callers never
/// parse tokens themselves.
#[async_trait]
pub trait AuthStateProvider: Send + Sync {
    /// Stores a freshly issued pair and announces the logged-in user.
    async fn mark_logged_in(&self, token: &str, refresh_token: &str) -> SessionResult<()>;

    /// Clears the stored pair and announces the anonymous state.
    async fn mark_logged_out(&self) -> SessionResult<()>;

    /// Returns the state derived from the currently stored pair.
    async fn current_state(&self) -> SessionResult<AuthenticationState>;

    /// Replaces the stored pair after a refresh.
    async fn save_tokens(&self, token: &str, refresh_token: &str) -> SessionResult<()>;
}
