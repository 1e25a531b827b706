//! Infrastructure adapters

mod recording_navigator;
mod reqwest_tokens_client;

pub use recording_navigator::RecordingNavigator;
pub use reqwest_tokens_client::{ReqwestTokensClient, TENANT_HEADER, TokensClientError};
