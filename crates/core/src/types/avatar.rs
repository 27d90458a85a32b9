//! Avatar lookup inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a fallback kind cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid fallback kind: {0}")]
pub struct FallbackParseError(pub String);

/// What to show when neither hosted avatar provider has an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// A generated image of the display name's initials.
    #[default]
    Initials,
    /// The bundled default image.
    DefaultImage,
}

impl std::str::FromStr for FallbackKind {
    type Err = FallbackParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initials" => Ok(Self::Initials),
            "default_image" | "default-image" => Ok(Self::DefaultImage),
            _ => Err(FallbackParseError(s.to_string())),
        }
    }
}

/// Inputs for resolving a member's avatar URL.
///
/// Both `email` and `display_name` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvatarRequest {
    pub email: String,
    pub display_name: String,
    pub size_px: u32,
    pub fallback_kind: FallbackKind,
}

impl AvatarRequest {
    /// Default rendered size in pixels.
    pub const DEFAULT_SIZE_PX: u32 = 40;

    /// Email as used for provider lookups: trimmed and lower-cased.
    #[must_use]
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

impl Default for AvatarRequest {
    fn default() -> Self {
        Self {
            email: String::new(),
            display_name: String::new(),
            size_px: Self::DEFAULT_SIZE_PX,
            fallback_kind: FallbackKind::default(),
        }
    }
}
