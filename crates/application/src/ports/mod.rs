//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session layer and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod auth_state;
mod navigator;
mod session_storage;
mod tokens_client;

pub use auth_state::AuthStateProvider;
pub use navigator::{LOGIN_ROUTE, Navigator};
pub use session_storage::{SessionError, SessionResult, SessionStorage};
pub use tokens_client::TokensClient;
