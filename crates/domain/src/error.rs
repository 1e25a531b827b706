//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while interpreting tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The token is not a three-segment JWT.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The token payload could not be decoded into a claims object.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
