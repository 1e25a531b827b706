//! JWT payload decoding.
//!
//! Tokens are read, never verified: the API that issued them is the only
//! party that checks signatures.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};
use tenant_auth_domain::{Claims, DomainError, DomainResult};

/// Decodes the claims carried in the payload segment of a JWT.
///
/// # Errors
///
/// Returns [`DomainError::MalformedToken`] if the token is not three
/// dot-separated segments or the payload is not base64url, and
/// [`DomainError::InvalidClaims`] if the payload is not a JSON object.
pub fn decode_claims(token: &str) -> DomainResult<Claims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DomainError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| DomainError::MalformedToken(format!("payload is not base64url: {e}")))?;

    let values: Map<String, Value> =
        serde_json::from_slice(&bytes).map_err(|e| DomainError::InvalidClaims(e.to_string()))?;

    Ok(Claims::from_map(values))
}

/// Builds an unsigned token around `claims`. Test helper for this crate.
#[cfg(test)]
pub(crate) fn unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
