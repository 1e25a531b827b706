//! Tenant Auth Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod persistence;

pub use adapters::{RecordingNavigator, ReqwestTokensClient, TENANT_HEADER, TokensClientError};
pub use auth::{AUTH_TOKEN_KEY, JwtAuthStateProvider, REFRESH_TOKEN_KEY, decode_claims};
pub use config::{AuthClientConfig, ConfigError};
pub use persistence::{FileSessionStorage, MemorySessionStorage};
