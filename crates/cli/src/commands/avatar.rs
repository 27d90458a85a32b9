//! Avatar command.
//!
//! # Usage
//!
//! ```bash
//! pickup avatar --email skater@example.com --name "Sam Skater" --size 64
//! pickup avatar --name "Sam Skater" --fallback default_image
//! ```
//!
//! # Environment Variables
//!
//! Provider overrides are read the same way as the web server
//! (`AVATAR_LIBRAVATAR_URL`, `AVATAR_GRAVATAR_URL`, `AVATAR_INITIALS_URL`,
//! `AVATAR_DEFAULT_PATH`, `AVATAR_PROBE_TIMEOUT_MS`).

use thiserror::Error;

use pickup_core::{AvatarRequest, FallbackKind, FallbackParseError};
use pickup_web::config::{AvatarConfig, ConfigError};
use pickup_web::services::{AvatarError, AvatarResolver};

/// Errors from the avatar command.
#[derive(Debug, Error)]
pub enum AvatarCommandError {
    #[error(transparent)]
    InvalidFallback(#[from] FallbackParseError),

    #[error("Invalid size: must be positive")]
    InvalidSize,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolver(#[from] AvatarError),
}

/// Resolve an avatar against the live providers and log the URL.
///
/// # Errors
///
/// Returns an error for invalid arguments or provider configuration.
pub async fn resolve(
    email: Option<String>,
    name: Option<String>,
    size: u32,
    fallback: &str,
) -> Result<String, AvatarCommandError> {
    dotenvy::dotenv().ok();

    if size == 0 {
        return Err(AvatarCommandError::InvalidSize);
    }
    let fallback_kind: FallbackKind = fallback.parse()?;

    let resolver = AvatarResolver::new(AvatarConfig::from_env()?)?;
    let request = AvatarRequest {
        email: email.unwrap_or_default(),
        display_name: name.unwrap_or_default(),
        size_px: size,
        fallback_kind,
    };

    let url = resolver.resolve(&request).await;
    tracing::info!("Avatar: {}", url);
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_unknown_fallback() {
        let err = resolve(None, Some("Sam".to_string()), 40, "robohash")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AvatarCommandError::InvalidFallback(FallbackParseError(ref s)) if s == "robohash"
        ));
    }

    #[tokio::test]
    async fn test_rejects_zero_size() {
        let err = resolve(None, None, 0, "initials").await.unwrap_err();
        assert!(matches!(err, AvatarCommandError::InvalidSize));
    }
}
