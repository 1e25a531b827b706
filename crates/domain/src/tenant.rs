//! Tenant identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the organization a login or refresh applies to.
///
/// The key is passed through to the token API as-is; no local validation
/// is performed beyond what the API itself enforces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantKey(String);

impl TenantKey {
    /// Creates a tenant key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TenantKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for TenantKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_tenant() {
        assert!(TenantKey::new("").is_blank());
        assert!(TenantKey::new("  \t").is_blank());
        assert!(!TenantKey::new("root").is_blank());
    }

    #[test]
    fn test_tenant_serializes_as_plain_string() {
        let json = serde_json::to_string(&TenantKey::new("beta")).unwrap_or_default();
        assert_eq!(json, "\"beta\"");
    }
}
