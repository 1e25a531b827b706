//! Authentication infrastructure adapters.
//!
//! This module provides:
//! - JWT payload decoding into claims
//! - The session-storage-backed authentication state holder

mod jwt;
mod state_provider;

pub use jwt::decode_claims;
pub use state_provider::{AUTH_TOKEN_KEY, JwtAuthStateProvider, REFRESH_TOKEN_KEY};
