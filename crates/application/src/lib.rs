//! Tenant Auth Application - Authentication service and ports
//!
//! This crate defines the application layer with:
//! - Port traits (token API, authentication state holder, session storage,
//!   navigation)
//! - The authentication service orchestrating login, logout and refresh
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

pub use auth::{AuthenticationService, INVALID_TOKEN_MESSAGE, JwtAuthenticationService};
pub use error::{AuthError, AuthResult};
pub use ports::{
    AuthStateProvider, LOGIN_ROUTE, Navigator, SessionError, SessionResult, SessionStorage,
    TokensClient,
};
