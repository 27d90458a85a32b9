//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PICKUP_HOST` - Bind address (default: 127.0.0.1)
//! - `PICKUP_PORT` - Listen port (default: 3000)
//! - `AVATAR_LIBRAVATAR_URL` - First avatar provider (default: <https://seccdn.libravatar.org>)
//! - `AVATAR_GRAVATAR_URL` - Second avatar provider (default: <https://www.gravatar.com>)
//! - `AVATAR_INITIALS_URL` - Initials image generator (default: <https://ui-avatars.com>)
//! - `AVATAR_DEFAULT_PATH` - Bundled default image (default: /static/images/default-avatar.svg)
//! - `AVATAR_PROBE_TIMEOUT_MS` - Per-probe timeout (default: 3000)
//! - `AVATAR_CACHE_TTL_SECS` - How long resolved avatars are memoised (default: 600)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_LIBRAVATAR_URL: &str = "https://seccdn.libravatar.org";
const DEFAULT_GRAVATAR_URL: &str = "https://www.gravatar.com";
const DEFAULT_INITIALS_URL: &str = "https://ui-avatars.com";
const DEFAULT_AVATAR_PATH: &str = "/static/images/default-avatar.svg";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Avatar provider configuration
    pub avatar: AvatarConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Avatar provider endpoints and probe limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarConfig {
    /// Probed first, Libravatar-compatible.
    pub libravatar_url: Url,
    /// Probed second, Gravatar-compatible.
    pub gravatar_url: Url,
    /// Initials generator, never probed.
    pub initials_url: Url,
    /// Path of the bundled default image.
    pub default_path: String,
    /// Timeout for each existence probe.
    pub probe_timeout: Duration,
    /// How long resolved URLs stay memoised.
    pub cache_ttl: Duration,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            libravatar_url: Url::parse(DEFAULT_LIBRAVATAR_URL).expect("valid default URL"),
            gravatar_url: Url::parse(DEFAULT_GRAVATAR_URL).expect("valid default URL"),
            initials_url: Url::parse(DEFAULT_INITIALS_URL).expect("valid default URL"),
            default_path: DEFAULT_AVATAR_PATH.to_string(),
            probe_timeout: Duration::from_millis(3000),
            cache_ttl: Duration::from_secs(600),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("PICKUP_HOST", "127.0.0.1")?,
            port: parse_env_or_default("PICKUP_PORT", "3000")?,
            avatar: AvatarConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AvatarConfig {
    /// Load avatar settings, falling back to the public providers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL or duration is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let probe_timeout = parse_probe_timeout(
            "AVATAR_PROBE_TIMEOUT_MS",
            &get_env_or_default("AVATAR_PROBE_TIMEOUT_MS", "3000"),
        )?;
        let ttl_secs: u64 = parse_env_or_default("AVATAR_CACHE_TTL_SECS", "600")?;

        Ok(Self {
            libravatar_url: parse_url_env("AVATAR_LIBRAVATAR_URL", DEFAULT_LIBRAVATAR_URL)?,
            gravatar_url: parse_url_env("AVATAR_GRAVATAR_URL", DEFAULT_GRAVATAR_URL)?,
            initials_url: parse_url_env("AVATAR_INITIALS_URL", DEFAULT_INITIALS_URL)?,
            default_path: get_env_or_default("AVATAR_DEFAULT_PATH", DEFAULT_AVATAR_PATH),
            probe_timeout,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a probe timeout in milliseconds. Zero would fail every probe.
fn parse_probe_timeout(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    match parse_value::<u64>(key, raw)? {
        0 => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        ms => Ok(Duration::from_millis(ms)),
    }
}

/// Parse a provider base URL; only http and https are accepted.
fn parse_url_env(key: &str, default: &str) -> Result<Url, ConfigError> {
    validate_provider_url(key, &get_env_or_default(key, default))
}

fn validate_provider_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = parse_value(key, raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}
