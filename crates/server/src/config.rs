//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CMS_HOST` - Bind address (default: 127.0.0.1)
//! - `CMS_PORT` - Listen port (default: 4567)
//! - `CMS_BASE_URL` - Public URL; `https://` turns on secure cookies
//!   (default: `http://localhost:4567`)
//! - `CMS_DATA_DIR` - Store directory holding the documents (default: `data`)
//! - `CMS_USERS_FILE` - YAML mapping of username to password (default: `users.yml`)
//! - `CMS_ADMINS_FILE` - YAML list of admin usernames (default: `admins.yml`)
//! - `CMS_STATIC_DIR` - Stylesheets and other assets (default: this crate's `static/`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Asset directory shipped with the crate.
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service
    pub base_url: String,
    /// Flat directory holding all documents
    pub data_dir: PathBuf,
    /// Backing file for the username/password mapping
    pub users_file: PathBuf,
    /// Backing file for the admin username list
    pub admins_file: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl CmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("CMS_HOST", "127.0.0.1")?;
        let port = parse_env("CMS_PORT", "4567")?;
        let base_url = get_env_or_default("CMS_BASE_URL", &format!("http://localhost:{port}"));

        Ok(Self {
            host,
            port,
            base_url,
            data_dir: PathBuf::from(get_env_or_default("CMS_DATA_DIR", "data")),
            users_file: PathBuf::from(get_env_or_default("CMS_USERS_FILE", "users.yml")),
            admins_file: PathBuf::from(get_env_or_default("CMS_ADMINS_FILE", "admins.yml")),
            static_dir: PathBuf::from(get_env_or_default("CMS_STATIC_DIR", DEFAULT_STATIC_DIR)),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Configuration rooted in a single directory, used by tests and tooling.
    ///
    /// Documents live in `<root>/data`, credentials in `<root>/users.yml` and
    /// `<root>/admins.yml`. Binds to an ephemeral port on loopback.
    #[must_use]
    pub fn rooted_at(root: &std::path::Path) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost".to_owned(),
            data_dir: root.join("data"),
            users_file: root.join("users.yml"),
            admins_file: root.join("admins.yml"),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default string.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies in `0.0..=1.0`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    validate_rate(key, &raw)
}

fn validate_rate(key: &str, raw: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_validate_rate_in_range() {
        assert!((validate_rate("X", "0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(validate_rate("X", "0").is_ok());
        assert!(validate_rate("X", "1.0").is_ok());
    }

    #[test]
    fn test_validate_rate_out_of_range() {
        let err = validate_rate("SENTRY_SAMPLE_RATE", "1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SENTRY_SAMPLE_RATE"));
    }

    #[test]
    fn test_validate_rate_not_a_number() {
        assert!(validate_rate("X", "lots").is_err());
    }

    #[test]
    fn test_rooted_at_layout() {
        let config = CmsConfig::rooted_at(Path::new("/srv/cms"));
        assert_eq!(config.data_dir, Path::new("/srv/cms/data"));
        assert_eq!(config.users_file, Path::new("/srv/cms/users.yml"));
        assert_eq!(config.admins_file, Path::new("/srv/cms/admins.yml"));
        assert_eq!(config.port, 0);
    }

    #[test]
    fn test_socket_addr() {
        let mut config = CmsConfig::rooted_at(Path::new("/tmp"));
        config.port = 4567;

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4567);
    }

    #[test]
    fn test_is_secure() {
        let mut config = CmsConfig::rooted_at(Path::new("/tmp"));
        assert!(!config.is_secure());
        config.base_url = "https://cms.example.com".to_owned();
        assert!(config.is_secure());
    }
}
