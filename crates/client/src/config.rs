//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `OPSDESK_API_URL` - Base URL of the backend API (http or https)
//!
//! ## Optional
//! - `OPSDESK_API_TOKEN` - Bearer token sent with every request
//! - `OPSDESK_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `OPSDESK_NUMERIC_POLICY` - `zero` or `strict` (default: zero)

use std::time::Duration;

use opsdesk_core::NumericPolicy;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backend client configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub api_url: Url,
    /// Bearer token (optional)
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How invalid numbers in forms are treated
    pub numeric_policy: NumericPolicy,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("numeric_policy", &self.numeric_policy)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for `api_url` with every optional setting at its default.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            api_token: None,
            timeout: Duration::from_secs(30),
            numeric_policy: NumericPolicy::ZeroOnInvalid,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let api_url = parse_api_url(&env.required("OPSDESK_API_URL")?)?;
        let api_token = env
            .optional("OPSDESK_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);
        let timeout_secs = env
            .or_default("OPSDESK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("OPSDESK_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "OPSDESK_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let numeric_policy = env
            .or_default("OPSDESK_NUMERIC_POLICY", "zero")
            .parse::<NumericPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("OPSDESK_NUMERIC_POLICY".to_string(), e))?;

        Ok(Self {
            api_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            numeric_policy,
        })
    }
}

fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("OPSDESK_API_URL".to_string(), msg);
    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme: {other}"))),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required environment variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional environment variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get an environment variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }
}
