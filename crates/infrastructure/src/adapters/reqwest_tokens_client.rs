//! Token API client implementation using reqwest.
//!
//! This adapter implements the `TokensClient` port against the tenant token
//! API. Every outcome, including transport failures, is folded into the
//! `ApiResult` envelope.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tenant_auth_application::TokensClient;
use tenant_auth_domain::{ApiResult, RefreshTokenRequest, TenantKey, TokenRequest, TokenResponse};
use tracing::{debug, warn};

/// Header carrying the tenant key on every token call.
pub const TENANT_HEADER: &str = "tenant";

const TOKENS_PATH: &str = "api/tokens";
const REFRESH_PATH: &str = "api/tokens/refresh";

/// Errors that can occur while constructing the client.
#[derive(Debug, thiserror::Error)]
pub enum TokensClientError {
    /// The base URL could not be parsed or cannot carry paths.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Token API client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTokensClient {
    client: Client,
    base_url: Url,
}

impl ReqwestTokensClient {
    /// Creates a client for the API at `base_url`.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - User-Agent: "tenant-auth/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be created.
    pub fn new(base_url: &str) -> Result<Self, TokensClientError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be created.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TokensClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TokensClientError::InvalidBaseUrl(format!("{e}: {base_url}")))?;
        let client = Client::builder()
            .user_agent(concat!("tenant-auth/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TokensClientError::Build(e.to_string()))?;

        Self::with_client(client, base_url)
    }

    /// Creates a client around a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot be a base (e.g. `mailto:`).
    pub fn with_client(client: Client, mut base_url: Url) -> Result<Self, TokensClientError> {
        if base_url.cannot_be_a_base() {
            return Err(TokensClientError::InvalidBaseUrl(base_url.to_string()));
        }
        // Url::join drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.base_url
            .join(path)
            .map_err(|e| format!("Invalid endpoint {path}: {e}"))
    }

    /// Describes a reqwest error for the user.
    fn describe_error(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            return "The token request timed out.".to_string();
        }
        if error.is_connect() {
            return format!("Could not connect to the token API: {error}");
        }
        format!("Token request failed: {error}")
    }

    /// Reads an envelope out of a response body.
    ///
    /// Non-2xx responses always yield a failure, keeping the server's messages
    /// when the body is an envelope.
    fn read_envelope(status: StatusCode, body: &[u8]) -> ApiResult<TokenResponse> {
        match serde_json::from_slice::<ApiResult<TokenResponse>>(body) {
            Ok(result) if status.is_success() => result,
            Ok(mut result) => {
                result.succeeded = false;
                result.data = None;
                if result.messages.is_empty() {
                    result
                        .messages
                        .push(format!("Token request failed with status {status}"));
                }
                result
            }
            Err(e) if status.is_success() => {
                ApiResult::fail(format!("Failed to parse token response: {e}"))
            }
            Err(_) => ApiResult::fail(format!("Token request failed with status {status}")),
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        tenant: &TenantKey,
        body: &B,
    ) -> ApiResult<TokenResponse> {
        let url = match self.endpoint(path) {
            Ok(url) => url,
            Err(message) => return ApiResult::fail(message),
        };
        debug!(%url, %tenant, "posting token request");

        let response = match self
            .client
            .post(url)
            .header(TENANT_HEADER, tenant.as_str())
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(%tenant, error = %e, "token request did not complete");
                return ApiResult::fail(Self::describe_error(&e));
            }
        };

        let status = response.status();
        match response.bytes().await {
            Ok(bytes) => Self::read_envelope(status, &bytes),
            Err(e) => ApiResult::fail(format!("Failed to read token response: {e}")),
        }
    }
}

#[async_trait::async_trait]
impl TokensClient for ReqwestTokensClient {
    async fn get_token(
        &self,
        tenant: &TenantKey,
        request: &TokenRequest,
    ) -> ApiResult<TokenResponse> {
        self.post(TOKENS_PATH, tenant, request).await
    }

    async fn refresh(
        &self,
        tenant: &TenantKey,
        request: &RefreshTokenRequest,
    ) -> ApiResult<TokenResponse> {
        self.post(REFRESH_PATH, tenant, request).await
    }
}
