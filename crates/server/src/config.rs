//! Environment-based server configuration.
//!
//! Everything the server needs arrives through environment variables
//! (a `.env` file is honored in development via dotenvy):
//!
//! - `JABUTICABA_DATABASE_URL` (required; falls back to `DATABASE_URL`)
//! - `JABUTICABA_ADMIN_TOKEN` (required; min 32 chars, placeholder values
//!   rejected at startup)
//! - `JABUTICABA_HOST` / `JABUTICABA_PORT` (default 127.0.0.1:3000)
//! - `CEP_DIRECTORY_URL` (default `https://viacep.com.br/ws`)
//! - `CEP_TIMEOUT_SECS` (default 5)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` (optional)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;

/// Substrings that mark a secret as a placeholder someone forgot to
/// replace (checked case-insensitively).
const PLACEHOLDER_MARKERS: &[&str] = &[
    "your-",
    "changeme",
    "change-me",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "dummy",
    "insert",
];

/// What went wrong while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Parsed server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Connection string, kept secret because it carries the password.
    pub database_url: SecretString,
    /// Bind address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Bearer token the admin API requires.
    pub admin_token: SecretString,
    /// CEP address directory settings.
    pub cep_directory: CepDirectoryConfig,
    /// Sentry DSN, when error tracking is enabled.
    pub sentry_dsn: Option<String>,
    /// Sentry environment label.
    pub sentry_environment: Option<String>,
}

/// Settings for the ViaCEP-compatible address directory.
#[derive(Debug, Clone)]
pub struct CepDirectoryConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout; a directory outage must not hang checkout.
    pub timeout: Duration,
}

impl ServerConfig {
    /// Load and validate the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent, a value
    /// does not parse, or the admin token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = database_url_from_env()?;

        let host = env_or("JABUTICABA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("JABUTICABA_HOST", &e))?;
        let port = env_or("JABUTICABA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid("JABUTICABA_PORT", &e))?;

        let admin_token = SecretString::from(require_env("JABUTICABA_ADMIN_TOKEN")?);
        ensure_token_strength(&admin_token, "JABUTICABA_ADMIN_TOKEN")?;

        Ok(Self {
            database_url,
            host,
            port,
            admin_token,
            cep_directory: CepDirectoryConfig::from_env()?,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// The address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CepDirectoryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_or("CEP_DIRECTORY_URL", "https://viacep.com.br/ws");
        // A bad URL should fail here, not on the first checkout
        Url::parse(&base_url).map_err(|e| invalid("CEP_DIRECTORY_URL", &e))?;

        let timeout_secs = env_or("CEP_TIMEOUT_SECS", "5")
            .parse::<u64>()
            .map_err(|e| invalid("CEP_TIMEOUT_SECS", &e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn invalid(key: &str, err: &dyn std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_owned(), err.to_string())
}

/// The project-specific variable wins; the conventional `DATABASE_URL`
/// (set by most hosting platforms) is the fallback.
fn database_url_from_env() -> Result<SecretString, ConfigError> {
    std::env::var("JABUTICABA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar("JABUTICABA_DATABASE_URL".to_owned()))
}

/// Reject admin tokens that are too short or look like template text.
fn ensure_token_strength(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = token.expose_secret();

    if value.len() < MIN_ADMIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {MIN_ADMIN_TOKEN_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().find(|m| lower.contains(*m)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!("appears to be a placeholder (contains '{marker}')"),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn test_short_token_rejected() {
        assert!(matches!(
            ensure_token_strength(&secret("short"), "TEST_TOKEN"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        for bad in [
            "your-admin-token-goes-right-here-ok",
            &"changeme123".repeat(4),
            "a-perfectly-long-example-token-value",
        ] {
            assert!(
                ensure_token_strength(&secret(bad), "TEST_TOKEN").is_err(),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_strong_token_accepted() {
        let token = secret("aB3vKx9QmTz2nLw5pRq7uWj4zCy6eHg0");
        assert!(ensure_token_strength(&token, "TEST_TOKEN").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: secret("postgres://localhost/jabuticaba"),
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            admin_token: secret("aB3vKx9QmTz2nLw5pRq7uWj4zCy6eHg0"),
            cep_directory: CepDirectoryConfig {
                base_url: "https://viacep.com.br/ws".to_owned(),
                timeout: Duration::from_secs(5),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}
