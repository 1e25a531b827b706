//! JWT authentication service.
//!
//! Delegates to the token API and mirrors the issued pair into the
//! authentication state holder.

use std::sync::Arc;

use async_trait::async_trait;
use tenant_auth_domain::{
    ApiResult, AuthProviderKind, RefreshTokenRequest, TenantKey, TokenRequest, TokenResponse,
    token_preview,
};
use tracing::{debug, info, warn};

use super::AuthenticationService;
use crate::ports::{AuthStateProvider, LOGIN_ROUTE, Navigator, TokensClient};
use crate::{AuthError, AuthResult};

/// Message returned when the token API reports success without a usable pair.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token received.";

/// Authentication service backed by the tenant token API.
pub struct JwtAuthenticationService<C: ?Sized, S: ?Sized, N: ?Sized> {
    tokens_client: Arc<C>,
    auth_state: Arc<S>,
    navigator: Arc<N>,
}

impl<C, S, N> JwtAuthenticationService<C, S, N>
where
    C: TokensClient + ?Sized,
    S: AuthStateProvider + ?Sized,
    N: Navigator + ?Sized,
{
    /// Creates a new `JwtAuthenticationService`.
    pub const fn new(tokens_client: Arc<C>, auth_state: Arc<S>, navigator: Arc<N>) -> Self {
        Self {
            tokens_client,
            auth_state,
            navigator,
        }
    }

    /// The state holder this service writes to.
    #[must_use]
    pub const fn auth_state(&self) -> &Arc<S> {
        &self.auth_state
    }
}

#[async_trait]
impl<C, S, N> AuthenticationService for JwtAuthenticationService<C, S, N>
where
    C: TokensClient + ?Sized,
    S: AuthStateProvider + ?Sized,
    N: Navigator + ?Sized,
{
    fn provider_type(&self) -> AuthProviderKind {
        AuthProviderKind::Jwt
    }

    async fn login(
        &self,
        tenant: &TenantKey,
        request: &TokenRequest,
    ) -> AuthResult<ApiResult<TokenResponse>> {
        debug!(%tenant, email = %request.email, "requesting token");
        let result = self.tokens_client.get_token(tenant, request).await;

        if !result.succeeded {
            debug!(%tenant, messages = ?result.messages, "token request failed");
            return Ok(result);
        }

        let Some(pair) = result.data.as_ref().and_then(TokenResponse::token_pair) else {
            warn!(%tenant, "token API reported success without a token pair");
            return Ok(ApiResult::fail(INVALID_TOKEN_MESSAGE));
        };

        self.auth_state
            .mark_logged_in(&pair.token, &pair.refresh_token)
            .await?;
        info!(%tenant, token = %token_preview(&pair.token), "logged in");

        Ok(result)
    }

    async fn logout(&self) -> AuthResult<()> {
        self.auth_state.mark_logged_out().await?;
        self.navigator.navigate_to(LOGIN_ROUTE);
        info!("logged out");
        Ok(())
    }

    async fn refresh_token(
        &self,
        request: &RefreshTokenRequest,
    ) -> AuthResult<ApiResult<TokenResponse>> {
        // Read the tenant at call time; a login may have replaced the session
        // since the caller last looked at it.
        let state = self.auth_state.current_state().await?;
        let tenant = state
            .tenant()
            .map(TenantKey::from)
            .ok_or(AuthError::NotLoggedIn)?;

        debug!(%tenant, "refreshing token");
        let result = self.tokens_client.refresh(&tenant, request).await;

        match result.success_data() {
            Some(response) => {
                self.auth_state
                    .save_tokens(&response.token, &response.refresh_token)
                    .await?;
                info!(%tenant, token = %token_preview(&response.token), "token refreshed");
            }
            None if result.succeeded => {
                warn!(%tenant, "refresh reported success without a payload; stored tokens kept");
            }
            None => {
                warn!(%tenant, messages = ?result.messages, "token refresh failed");
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use crate::ports::{SessionError, SessionResult};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tenant_auth_domain::{AuthenticationState, Claims};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ClientCall {
        GetToken(String, TokenRequest),
        Refresh(String, RefreshTokenRequest),
    }

    struct MockTokensClient {
        token_result: ApiResult<TokenResponse>,
        refresh_result: ApiResult<TokenResponse>,
        calls: Mutex<Vec<ClientCall>>,
    }

    impl MockTokensClient {
        fn returning(result: ApiResult<TokenResponse>) -> Self {
            Self {
                token_result: result.clone(),
                refresh_result: result,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<ClientCall> {
            self.calls.lock().expect("Lock poisoned").clone()
        }
    }

    #[async_trait]
    impl TokensClient for MockTokensClient {
        async fn get_token(
            &self,
            tenant: &TenantKey,
            request: &TokenRequest,
        ) -> ApiResult<TokenResponse> {
            self.calls
                .lock()
                .expect("Lock poisoned")
                .push(ClientCall::GetToken(tenant.to_string(), request.clone()));
            self.token_result.clone()
        }

        async fn refresh(
            &self,
            tenant: &TenantKey,
            request: &RefreshTokenRequest,
        ) -> ApiResult<TokenResponse> {
            self.calls
                .lock()
                .expect("Lock poisoned")
                .push(ClientCall::Refresh(tenant.to_string(), request.clone()));
            self.refresh_result.clone()
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum StateCall {
        LoggedIn(String, String),
        LoggedOut,
        Saved(String, String),
    }

    struct MockAuthState {
        state: AuthenticationState,
        fail_writes: bool,
        calls: Mutex<Vec<StateCall>>,
    }

    impl MockAuthState {
        fn anonymous() -> Self {
            Self::with_state(AuthenticationState::Anonymous)
        }

        fn for_tenant(tenant: &str) -> Self {
            let mut map = serde_json::Map::new();
            map.insert("tenant".to_string(), tenant.into());
            Self::with_state(AuthenticationState::Authenticated(Claims::from_map(map)))
        }

        fn with_state(state: AuthenticationState) -> Self {
            Self {
                state,
                fail_writes: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::anonymous()
            }
        }

        fn record(&self, call: StateCall) -> SessionResult<()> {
            if self.fail_writes {
                return Err(SessionError::Serialization("disk full".to_string()));
            }
            self.calls.lock().expect("Lock poisoned").push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<StateCall> {
            self.calls.lock().expect("Lock poisoned").clone()
        }
    }

    #[async_trait]
    impl AuthStateProvider for MockAuthState {
        async fn mark_logged_in(&self, token: &str, refresh_token: &str) -> SessionResult<()> {
            self.record(StateCall::LoggedIn(token.to_string(), refresh_token.to_string()))
        }

        async fn mark_logged_out(&self) -> SessionResult<()> {
            self.record(StateCall::LoggedOut)
        }

        async fn current_state(&self) -> SessionResult<AuthenticationState> {
            Ok(self.state.clone())
        }

        async fn save_tokens(&self, token: &str, refresh_token: &str) -> SessionResult<()> {
            self.record(StateCall::Saved(token.to_string(), refresh_token.to_string()))
        }
    }

    #[derive(Default)]
    struct MockNavigator {
        routes: Mutex<Vec<String>>,
    }

    impl Navigator for MockNavigator {
        fn navigate_to(&self, route: &str) {
            self.routes
                .lock()
                .expect("Lock poisoned")
                .push(route.to_string());
        }
    }

    struct Fixture {
        client: Arc<MockTokensClient>,
        state: Arc<MockAuthState>,
        navigator: Arc<MockNavigator>,
        service: JwtAuthenticationService<MockTokensClient, MockAuthState, MockNavigator>,
    }

    fn fixture(client: MockTokensClient, state: MockAuthState) -> Fixture {
        let client = Arc::new(client);
        let state = Arc::new(state);
        let navigator = Arc::new(MockNavigator::default());
        let service =
            JwtAuthenticationService::new(client.clone(), state.clone(), navigator.clone());
        Fixture {
            client,
            state,
            navigator,
            service,
        }
    }

    fn credentials() -> TokenRequest {
        TokenRequest::new("admin@root.com", "123Pa$$word!")
    }

    #[test]
    fn test_provider_type_is_jwt() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::fail("unused")),
            MockAuthState::anonymous(),
        );
        assert_eq!(f.service.provider_type(), AuthProviderKind::Jwt);
    }

    #[tokio::test]
    async fn test_login_success_commits_pair() {
        let issued = ApiResult::success(TokenResponse::new("access-1", "refresh-1"));
        let f = fixture(
            MockTokensClient::returning(issued.clone()),
            MockAuthState::anonymous(),
        );

        let result = f
            .service
            .login(&TenantKey::new("root"), &credentials())
            .await
            .expect("login should not error");

        assert_eq!(result, issued);
        assert_eq!(
            f.state.calls(),
            vec![StateCall::LoggedIn(
                "access-1".to_string(),
                "refresh-1".to_string()
            )]
        );
        assert_eq!(
            f.client.calls(),
            vec![ClientCall::GetToken("root".to_string(), credentials())]
        );
    }

    #[tokio::test]
    async fn test_login_success_with_blank_token_is_rejected() {
        for response in [
            TokenResponse::new("", "refresh"),
            TokenResponse::new("access", "   "),
            TokenResponse::new("", ""),
        ] {
            let f = fixture(
                MockTokensClient::returning(ApiResult::success(response)),
                MockAuthState::anonymous(),
            );

            let result = f
                .service
                .login(&TenantKey::new("root"), &credentials())
                .await
                .expect("login should not error");

            assert!(!result.succeeded);
            assert_eq!(result.messages, vec![INVALID_TOKEN_MESSAGE.to_string()]);
            assert!(result.data.is_none());
            assert!(f.state.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_login_success_without_payload_is_rejected() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::empty_success()),
            MockAuthState::anonymous(),
        );

        let result = f
            .service
            .login(&TenantKey::new("root"), &credentials())
            .await
            .expect("login should not error");

        assert_eq!(result, ApiResult::fail("Invalid token received."));
        assert!(f.state.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_failure_is_passed_through() {
        let failure = ApiResult::failure(["Authentication Failed.", "Check your password."]);
        let f = fixture(
            MockTokensClient::returning(failure.clone()),
            MockAuthState::anonymous(),
        );

        let result = f
            .service
            .login(&TenantKey::new("root"), &credentials())
            .await
            .expect("login should not error");

        assert_eq!(result, failure);
        assert!(f.state.calls().is_empty());
        assert!(f.navigator.routes.lock().expect("Lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn test_login_propagates_state_holder_failure() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::success(TokenResponse::new("a", "r"))),
            MockAuthState::failing(),
        );

        let result = f
            .service
            .login(&TenantKey::new("root"), &credentials())
            .await;

        assert!(matches!(result, Err(AuthError::Session(_))));
    }

    #[tokio::test]
    async fn test_logout_clears_and_navigates() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::fail("unused")),
            MockAuthState::for_tenant("root"),
        );

        f.service.logout().await.expect("logout should not error");

        assert_eq!(f.state.calls(), vec![StateCall::LoggedOut]);
        assert_eq!(
            *f.navigator.routes.lock().expect("Lock poisoned"),
            vec!["/login".to_string()]
        );
        assert!(f.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_logout_when_anonymous_still_navigates() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::fail("unused")),
            MockAuthState::anonymous(),
        );

        f.service.logout().await.expect("logout should not error");

        assert_eq!(f.state.calls(), vec![StateCall::LoggedOut]);
        assert_eq!(f.navigator.routes.lock().expect("Lock poisoned").len(), 1);
    }

    #[tokio::test]
    async fn test_logout_failure_skips_navigation() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::fail("unused")),
            MockAuthState::failing(),
        );

        let result = f.service.logout().await;

        assert!(matches!(result, Err(AuthError::Session(_))));
        assert!(f.navigator.routes.lock().expect("Lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn test_refresh_without_tenant_fails_before_calling_api() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::success(TokenResponse::new("a", "r"))),
            MockAuthState::anonymous(),
        );

        let result = f
            .service
            .refresh_token(&RefreshTokenRequest::new("old", "old-refresh"))
            .await;

        assert!(matches!(result, Err(AuthError::NotLoggedIn)));
        assert!(f.client.calls().is_empty());
        assert!(f.state.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_with_blank_tenant_claim_fails() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::success(TokenResponse::new("a", "r"))),
            MockAuthState::for_tenant("  "),
        );

        let result = f
            .service
            .refresh_token(&RefreshTokenRequest::new("old", "old-refresh"))
            .await;

        assert!(matches!(result, Err(AuthError::NotLoggedIn)));
        assert!(f.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_success_saves_payload() {
        let refreshed = ApiResult::success(TokenResponse::new("access-2", "refresh-2"));
        let f = fixture(
            MockTokensClient::returning(refreshed.clone()),
            MockAuthState::for_tenant("beta"),
        );
        let request = RefreshTokenRequest::new("access-1", "refresh-1");

        let result = f
            .service
            .refresh_token(&request)
            .await
            .expect("refresh should not error");

        assert_eq!(result, refreshed);
        assert_eq!(
            f.client.calls(),
            vec![ClientCall::Refresh("beta".to_string(), request)]
        );
        assert_eq!(
            f.state.calls(),
            vec![StateCall::Saved(
                "access-2".to_string(),
                "refresh-2".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_raw_result() {
        let failure = ApiResult::fail("Invalid Refresh Token.");
        let f = fixture(
            MockTokensClient::returning(failure.clone()),
            MockAuthState::for_tenant("root"),
        );

        let result = f
            .service
            .refresh_token(&RefreshTokenRequest::new("a", "r"))
            .await
            .expect("refresh should not error");

        assert_eq!(result, failure);
        assert!(f.state.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_success_without_payload_saves_nothing() {
        let f = fixture(
            MockTokensClient::returning(ApiResult::empty_success()),
            MockAuthState::for_tenant("root"),
        );

        let result = f
            .service
            .refresh_token(&RefreshTokenRequest::new("a", "r"))
            .await
            .expect("refresh should not error");

        assert!(result.succeeded);
        assert!(result.data.is_none());
        assert!(f.state.calls().is_empty());
    }

    #[tokio::test]
    async fn test_service_behind_trait_object() {
        let client = Arc::new(MockTokensClient::returning(ApiResult::success(
            TokenResponse::new("a", "r"),
        )));
        let state: Arc<dyn AuthStateProvider> = Arc::new(MockAuthState::anonymous());
        let navigator: Arc<dyn Navigator> = Arc::new(MockNavigator::default());
        let service: Box<dyn AuthenticationService> =
            Box::new(JwtAuthenticationService::new(client, state, navigator));

        let result = service
            .login(&TenantKey::new("root"), &credentials())
            .await
            .expect("login should not error");

        assert!(result.succeeded);
    }
}
