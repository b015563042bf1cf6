//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPLARK_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   generic `DATABASE_URL`)
//! - `SHOPLARK_BASE_DOMAIN` - Apex domain storefronts publish under
//!   (e.g., `shoplark.store`; subdomain `acme` resolves `acme.shoplark.store`)
//! - `SHOPLARK_BACKEND_URL` - Base URL of the managed backend (auth + storage)
//! - `SHOPLARK_SERVICE_KEY` - Service-role key for the managed backend
//!   (server-side only; bypasses row-level policies)
//!
//! ## Optional
//! - `SHOPLARK_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPLARK_PORT` - Listen port (default: 4000)
//! - `SHOPLARK_STORAGE_BUCKET` - Image bucket name (default: product-images)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SERVICE_KEY_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shoplark server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Apex domain public storefronts are served under
    pub base_domain: String,
    /// Managed backend configuration (external auth + file storage)
    pub backend: BackendConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Managed backend (auth + storage) configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the managed backend
    pub url: String,
    /// Service-role key (bypasses row-level policies; never expose to clients)
    pub service_key: SecretString,
    /// Storage bucket uploaded images land in
    pub storage_bucket: String,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("service_key", &"[REDACTED]")
            .field("storage_bucket", &self.storage_bucket)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the service key fails placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOPLARK_DATABASE_URL")?;
        let host = get_env_or_default("SHOPLARK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPLARK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHOPLARK_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPLARK_PORT".to_string(), e.to_string()))?;

        let base_domain = get_required_env("SHOPLARK_BASE_DOMAIN")?
            .trim()
            .trim_start_matches('.')
            .to_lowercase();
        if base_domain.is_empty() || !base_domain.contains('.') {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPLARK_BASE_DOMAIN".to_string(),
                "must be a registrable domain like shoplark.store".to_string(),
            ));
        }

        let backend = BackendConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_domain,
            backend,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("SHOPLARK_BACKEND_URL")?
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPLARK_BACKEND_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            url,
            service_key: get_validated_secret("SHOPLARK_SERVICE_KEY")?,
            storage_bucket: get_env_or_default("SHOPLARK_STORAGE_BUCKET", "product-images"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
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

/// Validate that a secret is not an obvious placeholder and is long enough
/// to be a real service key.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    if secret.len() < MIN_SERVICE_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SERVICE_KEY_LENGTH,
                secret.len()
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-service-key-goes-here-okay?", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_too_short() {
        let result = validate_secret_strength("shortkey", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("eyJhbGciOiJIUzI1NiJ9.c2VydmljZS1yb2xl.sig", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/shoplark"),
            host: "0.0.0.0".parse().unwrap(),
            port: 4000,
            base_domain: "shoplark.store".to_string(),
            backend: BackendConfig {
                url: "https://backend.internal".to_string(),
                service_key: SecretString::from("k".repeat(40)),
                storage_bucket: "product-images".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_backend_config_debug_redacts_service_key() {
        let config = BackendConfig {
            url: "https://backend.internal".to_string(),
            service_key: SecretString::from("super-secret-service-role-key-value"),
            storage_bucket: "product-images".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://backend.internal"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-service-role-key-value"));
    }
}
