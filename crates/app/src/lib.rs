//! Tenant Auth - host wiring
//!
//! Connects the authentication service to the reqwest token client, a
//! file-backed session and a recording navigator, so a terminal can drive
//! login, refresh and logout.

use std::sync::Arc;

use anyhow::{Context, Result};
use tenant_auth_application::{
    AuthStateProvider, AuthenticationService, JwtAuthenticationService,
};
use tenant_auth_domain::{
    ApiResult, AuthenticationState, RefreshTokenRequest, TenantKey, TokenRequest, TokenResponse,
};
use tenant_auth_infrastructure::{
    AuthClientConfig, FileSessionStorage, JwtAuthStateProvider, RecordingNavigator,
    ReqwestTokensClient,
};
use tracing::debug;

type SessionState = JwtAuthStateProvider<FileSessionStorage>;
type Service = JwtAuthenticationService<ReqwestTokensClient, SessionState, RecordingNavigator>;

/// The assembled session client.
pub struct Host {
    default_tenant: TenantKey,
    state: Arc<SessionState>,
    navigator: Arc<RecordingNavigator>,
    service: Service,
}

impl Host {
    /// Builds the host from configuration, restoring any stored session.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the session
    /// file cannot be read.
    pub async fn from_config(config: &AuthClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = ReqwestTokensClient::with_timeout(base_url.as_str(), config.timeout())
            .context("failed to create token client")?;

        let storage = Arc::new(FileSessionStorage::new(&config.session_file));
        debug!(path = %storage.path().display(), "using session file");
        let state = Arc::new(
            JwtAuthStateProvider::restore(storage)
                .await
                .context("failed to read stored session")?,
        );
        let navigator = Arc::new(RecordingNavigator::new());
        let service = JwtAuthenticationService::new(
            Arc::new(client),
            Arc::clone(&state),
            Arc::clone(&navigator),
        );

        Ok(Self {
            default_tenant: config.tenant_key(),
            state,
            navigator,
            service,
        })
    }

    /// Logs in against `tenant`, or the configured tenant when `None` or
    /// blank.
    ///
    /// # Errors
    /// Returns an error if the session cannot be stored.
    pub async fn login(
        &self,
        tenant: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<ApiResult<TokenResponse>> {
        let tenant = tenant
            .map(TenantKey::from)
            .filter(|tenant| !tenant.is_blank())
            .unwrap_or_else(|| self.default_tenant.clone());
        let request = TokenRequest::new(email, password);
        Ok(self.service.login(&tenant, &request).await?)
    }

    /// Exchanges the stored pair for a new one.
    ///
    /// # Errors
    /// Returns an error if no session is stored or the session cannot be
    /// read or written.
    pub async fn refresh(&self) -> Result<ApiResult<TokenResponse>> {
        let pair = self
            .state
            .token_pair()
            .await?
            .context("no stored session; log in first")?;
        let request = RefreshTokenRequest::from(pair);
        Ok(self.service.refresh_token(&request).await?)
    }

    /// Clears the session and navigates to the login route.
    ///
    /// # Errors
    /// Returns an error if the session cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        Ok(self.service.logout().await?)
    }

    /// The state derived from the stored access token.
    ///
    /// # Errors
    /// Returns an error if the session cannot be read.
    pub async fn whoami(&self) -> Result<AuthenticationState> {
        Ok(self.state.current_state().await?)
    }

    /// The last route the service navigated to.
    #[must_use]
    pub fn last_route(&self) -> Option<String> {
        self.navigator.current_route()
    }
}
