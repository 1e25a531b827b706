//! Tenant Auth Domain - Core session types
//!
//! This crate defines the data model shared by the session layer:
//! token API payloads, the result envelope, tenant keys and the claims
//! derived from an access token. All types here are pure Rust with no I/O
//! dependencies.

pub mod auth;
pub mod error;
pub mod result;
pub mod tenant;
pub mod token;

pub use auth::{AuthProviderKind, AuthenticationState, Claims, claim_types};
pub use error::{DomainError, DomainResult};
pub use result::ApiResult;
pub use tenant::TenantKey;
pub use token::{RefreshTokenRequest, TokenPair, TokenRequest, TokenResponse, token_preview};
