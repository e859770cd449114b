//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CTP_PROJECT_KEY` - commercetools project key
//! - `CTP_CLIENT_ID` - API client ID
//! - `CTP_CLIENT_SECRET` - API client secret (high entropy, not a placeholder)
//!
//! ## Optional
//! - `CTP_API_URL` - Platform API URL (default: `https://api.europe-west1.gcp.commercetools.com`)
//! - `CTP_AUTH_URL` - Auth URL (default: `https://auth.europe-west1.gcp.commercetools.com`)
//! - `CTP_SCOPES` - Space separated OAuth scopes (default: `view_orders:<project> manage_orders:<project>`)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_LOCALE` - Locale for money formatting and product names (default: en)
//! - `ADMIN_MESSAGES_PATH` - JSON message catalog overriding the built-in text
//! - `CARTS_PAGE_SIZE` - Carts fetched per customer, 1 to 500 (default: 20)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";
const DEFAULT_AUTH_URL: &str = "https://auth.europe-west1.gcp.commercetools.com";
const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 500;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Locale for money formatting and localized product names
    pub locale: String,
    /// Maximum number of carts fetched per customer
    pub page_size: u32,
    /// Optional JSON message catalog
    pub messages_path: Option<PathBuf>,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// commercetools platform configuration
    pub commercetools: CommercetoolsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// commercetools API client configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct CommercetoolsConfig {
    /// Platform API base URL
    pub api_url: String,
    /// OAuth server base URL
    pub auth_url: String,
    /// Project key, the first path segment of every API call
    pub project_key: String,
    /// API client ID
    pub client_id: String,
    /// API client secret
    pub client_secret: SecretString,
    /// Space separated OAuth scopes
    pub scopes: String,
}

impl std::fmt::Debug for CommercetoolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommercetoolsConfig")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Source of configuration values, keyed by variable name.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(env, "ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(env, "ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let locale = get_env_or_default(env, "ADMIN_LOCALE", "en");
        let page_size = get_page_size(env)?;
        let messages_path = get_optional_env(env, "ADMIN_MESSAGES_PATH").map(PathBuf::from);
        let log_json = get_optional_env(env, "LOG_FORMAT")
            .is_some_and(|format| format.eq_ignore_ascii_case("json"));

        let commercetools = CommercetoolsConfig::from_lookup(env)?;
        let sentry_dsn = get_optional_env(env, "SENTRY_DSN");
        let sentry_environment = get_optional_env(env, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(env, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(env, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            locale,
            page_size,
            messages_path,
            log_json,
            commercetools,
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
}

impl CommercetoolsConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let project_key = get_required_env(env, "CTP_PROJECT_KEY")?;
        let scopes = get_optional_env(env, "CTP_SCOPES")
            .unwrap_or_else(|| format!("view_orders:{project_key} manage_orders:{project_key}"));

        Ok(Self {
            api_url: get_url(env, "CTP_API_URL", DEFAULT_API_URL)?,
            auth_url: get_url(env, "CTP_AUTH_URL", DEFAULT_AUTH_URL)?,
            client_id: get_required_env(env, "CTP_CLIENT_ID")?,
            client_secret: get_validated_secret(env, "CTP_CLIENT_SECRET")?,
            project_key,
            scopes,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(env: Lookup<'_>, key: &str) -> Result<String, ConfigError> {
    env(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(env: Lookup<'_>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: Lookup<'_>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Get an absolute http(s) URL, without a trailing slash.
fn get_url(env: Lookup<'_>, key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(env, key, default);
    let url = Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn get_page_size(env: Lookup<'_>) -> Result<u32, ConfigError> {
    let Some(value) = get_optional_env(env, "CARTS_PAGE_SIZE") else {
        return Ok(DEFAULT_PAGE_SIZE);
    };
    let size = value
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar("CARTS_PAGE_SIZE".to_string(), e.to_string()))?;
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(ConfigError::InvalidEnvVar(
            "CARTS_PAGE_SIZE".to_string(),
            format!("must be between 1 and {MAX_PAGE_SIZE} (got {size})"),
        ));
    }
    Ok(size)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the generated API client secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret.
fn get_validated_secret(env: Lookup<'_>, key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(env, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
