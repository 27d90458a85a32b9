//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::services::{AvatarError, AvatarResolver, VisibilityStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the avatar resolver and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    avatars: AvatarResolver,
    visibility: VisibilityStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the avatar HTTP client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, AvatarError> {
        let avatars = AvatarResolver::new(config.avatar.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                avatars,
                visibility: VisibilityStore::default(),
            }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the avatar resolver.
    #[must_use]
    pub fn avatars(&self) -> &AvatarResolver {
        &self.inner.avatars
    }

    /// Get a reference to the shared visibility toggle.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityStore {
        &self.inner.visibility
    }
}
