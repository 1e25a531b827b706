//! Client configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `TENANT_AUTH_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tenant_auth_domain::TenantKey;
use url::Url;

/// Prefix of the environment variables read by [`AuthClientConfig::load`].
pub const ENV_PREFIX: &str = "TENANT_AUTH";

const DEFAULT_API_BASE_URL: &str = "https://localhost:5001";
const DEFAULT_TENANT: &str = "root";
const DEFAULT_TIMEOUT_SECS: i64 = 30;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The API base URL is not an absolute URL.
    #[error("invalid api_base_url {url:?}: {message}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Parser error.
        message: String,
    },

    /// The request timeout is zero.
    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,

    /// The default tenant is empty.
    #[error("tenant must not be blank")]
    BlankTenant,
}

/// Settings for talking to the token API and keeping the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthClientConfig {
    /// Base URL of the token API, e.g. `https://api.example.com`.
    pub api_base_url: String,
    /// Tenant used when a login does not name one.
    pub tenant: String,
    /// File holding the stored token pair.
    pub session_file: PathBuf,
    /// Per-request timeout of the HTTP client.
    pub timeout_secs: u64,
}

impl AuthClientConfig {
    /// Loads configuration from defaults, `file` (if given and present) and
    /// the process environment.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or validation fails.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(file, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from defaults, `file` and an explicit environment
    /// source.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or validation fails.
    pub fn from_sources(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("tenant", DEFAULT_TENANT)?
            .set_default(
                "session_file",
                Self::default_session_file().to_string_lossy().into_owned(),
            )?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: Self = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Default location of the session file.
    #[must_use]
    pub fn default_session_file() -> PathBuf {
        dirs::data_local_dir().map_or_else(
            || PathBuf::from(".tenant-auth-session.json"),
            |dir| dir.join("tenant-auth").join("session.json"),
        )
    }

    /// Checks the values that cannot be checked by deserialization alone.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse, the timeout is zero
    /// or the tenant is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.tenant_key().is_blank() {
            return Err(ConfigError::BlankTenant);
        }
        Ok(())
    }

    /// The parsed API base URL.
    ///
    /// # Errors
    /// Returns an error if the configured value is not an absolute URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            message: e.to_string(),
        })
    }

    /// The request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The default tenant.
    #[must_use]
    pub fn tenant_key(&self) -> TenantKey {
        TenantKey::new(&self.tenant)
    }
}
