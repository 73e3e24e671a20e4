//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_DATABASE_URL` - `PostgreSQL` connection string
//! - `API_BASE_URL` - Public URL the service is reachable at (used for share links)
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 3000)
//! - `API_CORS_ORIGIN` - Browser origin allowed to call the API (CORS disabled when unset)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to build shared shopping-list links
    pub base_url: Url,
    /// Browser origin allowed by CORS (CORS layer disabled when `None`)
    pub cors_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl ApiConfig {
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

        let database_url = get_database_url("API_DATABASE_URL")?;
        let host = get_env_or_default("API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("API_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }
        let cors_origin = get_optional_env("API_CORS_ORIGIN");
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            cors_origin,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Builds the public URL for a shared shopping list.
    #[must_use]
    pub fn shared_list_url(&self, token: Uuid) -> String {
        let mut url = self.base_url.clone();
        let token = token.to_string();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["shopping-lists", "shared", token.as_str()]);
        }
        url.to_string()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., API_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by Fly.io postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
