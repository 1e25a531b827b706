//! Authentication module for the session layer.
//!
//! This module provides:
//! - The `AuthenticationService` trait used by the rest of the application
//! - `JwtAuthenticationService`, which delegates to the token API and
//!   mirrors the issued tokens into the authentication state holder

mod jwt_service;
mod service;

pub use jwt_service::{INVALID_TOKEN_MESSAGE, JwtAuthenticationService};
pub use service::AuthenticationService;
