//! Token API port

use async_trait::async_trait;
use tenant_auth_domain::{ApiResult, RefreshTokenRequest, TenantKey, TokenRequest, TokenResponse};

/// Port for the remote token-issuing API.
///
/// Implementations never fail out-of-band: transport and decoding problems
/// are reported as a failed [`ApiResult`] whose messages describe them.
#[async_trait]
pub trait TokensClient: Send + Sync {
    /// Exchanges credentials for a token pair within `tenant`.
    async fn get_token(
        &self,
        tenant: &TenantKey,
        request: &TokenRequest,
    ) -> ApiResult<TokenResponse>;

    /// Exchanges the current pair for a new one within `tenant`.
    async fn refresh(
        &self,
        tenant: &TenantKey,
        request: &RefreshTokenRequest,
    ) -> ApiResult<TokenResponse>;
}
