//! Avatar resolution.
//!
//! Tries hosted avatar providers in order and falls back to a generated
//! initials image or the bundled default:
//!
//! 1. Libravatar-compatible provider, probed with `HEAD`
//! 2. Gravatar-compatible provider, probed with `HEAD`
//! 3. Initials generator (only with a display name and `FallbackKind::Initials`), not probed
//! 4. Bundled default image
//!
//! Probes run one after another and stop at the first hit. A failed request,
//! timeout, or non-success status counts as "no avatar here". Resolution
//! itself never fails.

use std::sync::Arc;

use moka::future::Cache;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use pickup_core::{AvatarRequest, FallbackKind};

use crate::config::AvatarConfig;

/// Maximum number of memoised resolutions.
const CACHE_CAPACITY: u64 = 10_000;

/// Errors building an [`AvatarResolver`].
#[derive(Debug, Error)]
pub enum AvatarError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Hex SHA-256 of the trimmed, lower-cased email.
///
/// Both Libravatar and Gravatar accept SHA-256 hashes.
#[must_use]
pub fn email_hash(email: &str) -> String {
    hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()))
}

fn base(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}

/// Candidate URL on the Libravatar-compatible provider.
#[must_use]
pub fn libravatar_url(provider: &Url, hash: &str, size_px: u32) -> String {
    format!("{}/avatar/{hash}?s={size_px}&d=404", base(provider))
}

/// Candidate URL on the Gravatar-compatible provider.
#[must_use]
pub fn gravatar_url(provider: &Url, hash: &str, size_px: u32) -> String {
    format!("{}/avatar/{hash}?s={size_px}&d=404&r=g", base(provider))
}

/// Generated initials avatar with a random background, bold text, as SVG.
#[must_use]
pub fn initials_url(provider: &Url, display_name: &str, size_px: u32) -> String {
    format!(
        "{}/api/?name={}&size={size_px}&background=random&bold=true&format=svg",
        base(provider),
        urlencoding::encode(display_name.trim())
    )
}

/// Resolves avatar URLs for members.
///
/// Cheap to clone; clones share the HTTP client and the memo cache.
#[derive(Clone)]
pub struct AvatarResolver {
    inner: Arc<AvatarResolverInner>,
}

struct AvatarResolverInner {
    client: reqwest::Client,
    config: AvatarConfig,
    cache: Cache<AvatarRequest, String>,
}

impl std::fmt::Debug for AvatarResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarResolver")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AvatarResolver {
    /// Create a resolver for the configured providers.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: AvatarConfig) -> Result<Self, AvatarError> {
        let client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(AvatarResolverInner {
                client,
                config,
                cache,
            }),
        })
    }

    /// The provider configuration in use.
    #[must_use]
    pub fn config(&self) -> &AvatarConfig {
        &self.inner.config
    }

    /// Hosted candidates to probe, in priority order.
    ///
    /// Empty when the request has no email.
    #[must_use]
    pub fn probe_candidates(&self, request: &AvatarRequest) -> Vec<String> {
        let email = request.normalized_email();
        if email.is_empty() {
            return Vec::new();
        }

        let hash = email_hash(&email);
        let config = &self.inner.config;
        vec![
            libravatar_url(&config.libravatar_url, &hash, request.size_px),
            gravatar_url(&config.gravatar_url, &hash, request.size_px),
        ]
    }

    /// The URL used when no hosted avatar exists. Never probed.
    #[must_use]
    pub fn fallback(&self, request: &AvatarRequest) -> String {
        let config = &self.inner.config;
        if request.fallback_kind == FallbackKind::Initials && !request.display_name.trim().is_empty()
        {
            initials_url(&config.initials_url, &request.display_name, request.size_px)
        } else {
            config.default_path.clone()
        }
    }

    /// Resolve the first available avatar URL.
    #[instrument(skip(self, request), fields(size = request.size_px))]
    pub async fn resolve(&self, request: &AvatarRequest) -> String {
        for candidate in self.probe_candidates(request) {
            if self.exists(&candidate).await {
                debug!(url = %candidate, "avatar found");
                return candidate;
            }
        }

        let fallback = self.fallback(request);
        debug!(url = %fallback, "no hosted avatar, using fallback");
        fallback
    }

    /// Like [`resolve`](Self::resolve), memoising the result per request.
    ///
    /// Requests differing only in email case or surrounding whitespace share
    /// an entry.
    pub async fn resolve_cached(&self, request: &AvatarRequest) -> String {
        let key = AvatarRequest {
            email: request.normalized_email(),
            ..request.clone()
        };
        self.inner.cache.get_with(key, self.resolve(request)).await
    }

    /// Check whether a candidate URL serves an image.
    async fn exists(&self, url: &str) -> bool {
        match self.inner.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(url, status = status.as_u16(), "avatar probe");
                status.is_success()
            }
            Err(e) => {
                debug!(url, error = %e, timeout = e.is_timeout(), "avatar probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolver() -> AvatarResolver {
        AvatarResolver::new(AvatarConfig::default()).unwrap()
    }

    fn request(email: &str, name: &str, fallback_kind: FallbackKind) -> AvatarRequest {
        AvatarRequest {
            email: email.to_string(),
            display_name: name.to_string(),
            size_px: 40,
            fallback_kind,
        }
    }

    #[test]
    fn test_email_hash_normalizes() {
        assert_eq!(email_hash("  Goalie@Example.com "), email_hash("goalie@example.com"));
        assert_eq!(email_hash("goalie@example.com").len(), 64);
    }

    #[test]
    fn test_email_hash_known_value() {
        // sha256("")
        assert_eq!(
            email_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_candidate_urls() {
        let provider = Url::parse("https://seccdn.libravatar.org").unwrap();
        assert_eq!(
            libravatar_url(&provider, "abc", 40),
            "https://seccdn.libravatar.org/avatar/abc?s=40&d=404"
        );

        let provider = Url::parse("https://www.gravatar.com/").unwrap();
        assert_eq!(
            gravatar_url(&provider, "abc", 80),
            "https://www.gravatar.com/avatar/abc?s=80&d=404&r=g"
        );
    }

    #[test]
    fn test_initials_url_encodes_name() {
        let provider = Url::parse("https://ui-avatars.com").unwrap();
        assert_eq!(
            initials_url(&provider, " Hayley Wickenheiser ", 64),
            "https://ui-avatars.com/api/?name=Hayley%20Wickenheiser&size=64&background=random&bold=true&format=svg"
        );
    }

    #[test]
    fn test_probe_candidates_order() {
        let candidates =
            resolver().probe_candidates(&request("a@b.c", "", FallbackKind::Initials));
        assert_eq!(candidates.len(), 2);
        assert!(candidates.first().unwrap().starts_with("https://seccdn.libravatar.org/avatar/"));
        assert!(candidates.last().unwrap().starts_with("https://www.gravatar.com/avatar/"));
    }

    #[test]
    fn test_no_candidates_without_email() {
        let r = resolver();
        assert!(r.probe_candidates(&request("", "Name", FallbackKind::Initials)).is_empty());
        assert!(r.probe_candidates(&request("   ", "Name", FallbackKind::Initials)).is_empty());
    }

    #[test]
    fn test_fallback_selection() {
        let r = resolver();
        assert!(
            r.fallback(&request("", "Sam", FallbackKind::Initials))
                .starts_with("https://ui-avatars.com/api/?name=Sam")
        );
        assert_eq!(
            r.fallback(&request("", "Sam", FallbackKind::DefaultImage)),
            "/static/images/default-avatar.svg"
        );
        assert_eq!(
            r.fallback(&request("", "", FallbackKind::Initials)),
            "/static/images/default-avatar.svg"
        );
    }

    #[tokio::test]
    async fn test_resolve_without_email_skips_network() {
        // Providers point at an unroutable address; resolution must not touch them.
        let config = AvatarConfig {
            libravatar_url: Url::parse("http://192.0.2.1").unwrap(),
            gravatar_url: Url::parse("http://192.0.2.1").unwrap(),
            ..AvatarConfig::default()
        };
        let r = AvatarResolver::new(config).unwrap();
        let url = r
            .resolve(&request("", "Cammi Granato", FallbackKind::Initials))
            .await;
        assert!(url.contains("name=Cammi%20Granato"));
        assert!(url.contains("size=40"));
    }
}
