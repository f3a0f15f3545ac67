//! Web application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `FYAY_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   then to `sqlite://fyay.db?mode=rwc`)
//! - `FYAY_HOST` - Bind address (default: 127.0.0.1)
//! - `FYAY_PORT` - Listen port (default: 5000)
//! - `FYAY_BASE_URL` - Public URL (default: `http://127.0.0.1:5000`); an
//!   `https://` URL turns on secure session cookies
//! - `FYAY_DB_TIMEOUT_SECS` - Pool acquire and `SQLite` busy timeout (default: 10)
//! - `FYAY_SESSION_EXPIRY_DAYS` - Session inactivity expiry (default: 7)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://fyay.db?mode=rwc";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_DB_TIMEOUT_SECS: &str = "10";
const DEFAULT_SESSION_EXPIRY_DAYS: &str = "7";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// How long to wait for a pooled connection or a locked database
    pub db_timeout: Duration,
    /// Session inactivity expiry in days
    pub session_expiry_days: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unset variables fall back to their defaults, exactly as in [`Self::from_env`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let database_url = lookup("FYAY_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let host: IpAddr = parse_var("FYAY_HOST", &get_or("FYAY_HOST", DEFAULT_HOST))?;
        let port: u16 = parse_var("FYAY_PORT", &get_or("FYAY_PORT", DEFAULT_PORT))?;
        let base_url = lookup("FYAY_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let timeout_secs: u64 = parse_var(
            "FYAY_DB_TIMEOUT_SECS",
            &get_or("FYAY_DB_TIMEOUT_SECS", DEFAULT_DB_TIMEOUT_SECS),
        )?;
        let session_expiry_days: i64 = parse_var(
            "FYAY_SESSION_EXPIRY_DAYS",
            &get_or("FYAY_SESSION_EXPIRY_DAYS", DEFAULT_SESSION_EXPIRY_DAYS),
        )?;
        if session_expiry_days <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FYAY_SESSION_EXPIRY_DAYS".to_string(),
                "must be a positive number of days".to_string(),
            ));
        }

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            db_timeout: Duration::from_secs(timeout_secs),
            session_expiry_days,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable value, naming the variable in the error.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
