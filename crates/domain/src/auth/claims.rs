//! Identity claims carried by an access token

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names understood by [`Claims`].
///
/// Each accessor checks the short JWT name first, then the long
/// XML-schema URI some issuers emit.
pub mod claim_types {
    /// Tenant the user belongs to.
    pub const TENANT: &str = "tenant";
    /// Display name.
    pub const FULL_NAME: &str = "fullName";
    /// Granted permission (string or array of strings).
    pub const PERMISSION: &str = "permission";
    /// Expiry, seconds since the Unix epoch.
    pub const EXPIRES: &str = "exp";
    /// Email address.
    pub const EMAIL: [&str; 2] = [
        "email",
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
    ];
    /// User identifier.
    pub const USER_ID: [&str; 2] = [
        "sub",
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
    ];
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    values: Map<String, Value>,
}

impl Claims {
    /// Creates claims from a decoded JSON object.
    #[must_use]
    pub const fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Returns the raw claim value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns a non-blank string claim.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    fn first_str(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get_str(name))
    }

    /// Tenant the token was issued for.
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.get_str(claim_types::TENANT)
    }

    /// Email address of the user.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.first_str(&claim_types::EMAIL)
    }

    /// Display name of the user.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.get_str(claim_types::FULL_NAME)
    }

    /// Identifier of the user.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.first_str(&claim_types::USER_ID)
    }

    /// Permissions granted to the user.
    #[must_use]
    pub fn permissions(&self) -> Vec<&str> {
        match self.get(claim_types::PERMISSION) {
            Some(Value::String(permission)) => vec![permission.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns true if the named permission was granted.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    /// Expiry of the access token.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.get(claim_types::EXPIRES)?;
        let secs = exp
            .as_i64()
            .or_else(|| exp.as_str().and_then(|s| s.parse().ok()))?;
        Utc.timestamp_opt(secs, 0).single()
    }

    /// Returns true if the token has an expiry at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}
