//! Current authentication state of a session

use serde::{Deserialize, Serialize};

use super::Claims;

/// Which authentication mechanism a service implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProviderKind {
    /// Bearer JWT issued by the tenant token API.
    Jwt,
}

/// Authentication state derived from the stored token pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthenticationState {
    /// No usable access token is stored.
    #[default]
    Anonymous,
    /// A token is stored and its claims were decoded.
    Authenticated(Claims),
}

impl AuthenticationState {
    /// Returns true if a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Claims of the logged-in user.
    #[must_use]
    pub const fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(claims) => Some(claims),
        }
    }

    /// Tenant of the logged-in user, if known and non-blank.
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.claims().and_then(Claims::tenant)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_tenant() {
        let state = AuthenticationState::Anonymous;
        assert!(!state.is_authenticated());
        assert!(state.tenant().is_none());
    }

    #[test]
    fn test_authenticated_tenant() {
        let claims: Claims = serde_json::from_str(r#"{"tenant": "root"}"#).unwrap();
        let state = AuthenticationState::Authenticated(claims);
        assert!(state.is_authenticated());
        assert_eq!(state.tenant(), Some("root"));
    }

    #[test]
    fn test_authenticated_without_tenant_claim() {
        let state = AuthenticationState::Authenticated(Claims::default());
        assert!(state.is_authenticated());
        assert!(state.tenant().is_none());
    }
}
