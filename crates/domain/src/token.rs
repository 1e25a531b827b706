//! Token exchange payloads
//!
//! Wire shapes of the token API. Field names are camelCase on the wire.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Credentials exchanged for a token pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Login name of the user.
    pub email: String,
    /// Plain-text password, sent over TLS only.
    pub password: String,
}

impl TokenRequest {
    /// Creates a credential request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Request for a new token pair given the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// The (possibly expired) access token.
    pub token: String,
    /// The refresh token issued with it.
    pub refresh_token: String,
}

impl RefreshTokenRequest {
    /// Creates a refresh request.
    #[must_use]
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl From<TokenPair> for RefreshTokenRequest {
    fn from(pair: TokenPair) -> Self {
        Self {
            token: pair.token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Token pair issued by the token API.
///
/// Missing and `null` token fields deserialize as empty strings so that
/// callers can treat "absent", "null" and "blank" the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Access token (JWT).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub token: String,
    /// Refresh token.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub refresh_token: String,
    /// When the refresh token stops being accepted.
    #[serde(default)]
    pub refresh_token_expiry_time: Option<DateTime<Utc>>,
}

impl TokenResponse {
    /// Creates a response without an expiry time.
    #[must_use]
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
            refresh_token_expiry_time: None,
        }
    }

    /// Returns the pair if both tokens are non-blank.
    #[must_use]
    pub fn token_pair(&self) -> Option<TokenPair> {
        if self.token.trim().is_empty() || self.refresh_token.trim().is_empty() {
            return None;
        }
        Some(TokenPair::new(&self.token, &self.refresh_token))
    }
}

/// Access token plus refresh token, always stored and cleared together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token.
    pub token: String,
    /// Refresh token.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a token pair.
    #[must_use]
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &token_preview(&self.token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .finish()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Get a preview of a token (first 8 chars + ...), safe for logs.
#[must_use]
pub fn token_preview(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((idx, _)) if token.chars().count() > 12 => format!("{}...", &token[..idx]),
        _ => token.to_string(),
    }
}
