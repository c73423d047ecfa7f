//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HOPEFLOW_API_URL` - Base URL of the HopeFlow API (e.g., `https://api.hopeflow.org`)
//!
//! ## Optional
//! - `HOPEFLOW_TOKEN_FILE` - Where the bearer token is persisted between runs
//!   (default: `$HOME/.hopeflow/token`)
//! - `HOPEFLOW_TIMEOUT_SECS` - Per-request timeout in seconds (default: none)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// HopeFlow client configuration.
#[derive(Debug, Clone)]
pub struct HopeFlowConfig {
    /// Base URL of the API, without a trailing slash.
    pub api_url: String,
    /// Path the bearer token is persisted to.
    pub token_file: PathBuf,
    /// Per-request timeout. `None` reproduces the original client, which
    /// never timed out a request.
    pub timeout: Option<Duration>,
}

impl HopeFlowConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `HOPEFLOW_API_URL` is missing or not a valid
    /// URL, or if `HOPEFLOW_TIMEOUT_SECS` is set but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("HOPEFLOW_API_URL")?;
        let token_file = std::env::var("HOPEFLOW_TOKEN_FILE")
            .map_or_else(|_| default_token_file(), PathBuf::from);
        let timeout = match std::env::var("HOPEFLOW_TIMEOUT_SECS") {
            Ok(value) => Some(Duration::from_secs(value.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("HOPEFLOW_TIMEOUT_SECS".to_string(), e.to_string())
            })?)),
            Err(_) => None,
        };

        Self::new(api_url, token_file, timeout)
    }

    /// Create a configuration programmatically (used by tests and the mock
    /// harness).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not a valid absolute URL.
    pub fn new(
        api_url: impl Into<String>,
        token_file: PathBuf,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url.into();
        Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("HOPEFLOW_API_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token_file,
            timeout,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Default token location under the user's home directory.
fn default_token_file() -> PathBuf {
    std::env::var("HOME").map_or_else(
        |_| PathBuf::from(".hopeflow/token"),
        |home| PathBuf::from(home).join(".hopeflow").join("token"),
    )
}
