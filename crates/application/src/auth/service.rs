//! Authentication service trait.

use async_trait::async_trait;
use tenant_auth_domain::{
    ApiResult, AuthProviderKind, RefreshTokenRequest, TenantKey, TokenRequest, TokenResponse,
};

use crate::AuthResult;

/// Login, logout and token refresh as seen by the rest of the application.
///
/// The outer `AuthResult` carries failures of the session layer itself
/// (invalid call sequence, state holder errors). The inner `ApiResult`
/// carries the token API's answer, which callers inspect to decide what to
/// show or whether to force a logout.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Which mechanism this service implements.
    fn provider_type(&self) -> AuthProviderKind;

    /// Logs in within `tenant` and stores the issued pair on success.
    ///
    /// # Errors
    /// Returns an error if the state holder fails to store the pair.
    async fn login(
        &self,
        tenant: &TenantKey,
        request: &TokenRequest,
    ) -> AuthResult<ApiResult<TokenResponse>>;

    /// Clears the session and redirects to the login route.
    ///
    /// # Errors
    /// Returns an error if the state holder fails to clear the session.
    async fn logout(&self) -> AuthResult<()>;

    /// Exchanges the current pair for a new one within the session's tenant.
    ///
    /// # Errors
    /// Returns [`crate::AuthError::NotLoggedIn`] if the current state has no
    /// tenant, or an error if the state holder fails.
    async fn refresh_token(
        &self,
        request: &RefreshTokenRequest,
    ) -> AuthResult<ApiResult<TokenResponse>>;
}
