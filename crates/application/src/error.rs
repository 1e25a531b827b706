//! Application error types

use thiserror::Error;

use crate::ports::SessionError;

/// Errors raised by the authentication service itself.
///
/// Remote failures are not errors at this level: they travel inside the
/// returned `ApiResult`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A refresh was requested while no tenant is known for the session.
    #[error("can't refresh token when user is not logged in")]
    NotLoggedIn,

    /// The authentication state holder failed to read or persist the session.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Result type alias for authentication service operations.
pub type AuthResult<T> = Result<T, AuthError>;
