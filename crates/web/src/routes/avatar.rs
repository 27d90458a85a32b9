//! Avatar lookup handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use pickup_core::{AvatarRequest, FallbackKind};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the avatar endpoint. All optional.
#[derive(Debug, Deserialize)]
pub struct AvatarQuery {
    pub email: Option<String>,
    pub name: Option<String>,
    pub size: Option<u32>,
    /// `initials` (default) or `default_image`.
    pub fallback: Option<String>,
}

/// Avatar response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub url: String,
}

impl AvatarQuery {
    fn into_request(self) -> Result<AvatarRequest> {
        let size_px = self.size.unwrap_or(AvatarRequest::DEFAULT_SIZE_PX);
        if size_px == 0 {
            return Err(AppError::BadRequest("size must be positive".to_string()));
        }

        let fallback_kind = match self.fallback.as_deref() {
            Some(raw) => raw.parse::<FallbackKind>()?,
            None => FallbackKind::default(),
        };

        Ok(AvatarRequest {
            email: self.email.unwrap_or_default(),
            display_name: self.name.unwrap_or_default(),
            size_px,
            fallback_kind,
        })
    }
}

/// Resolve a member's avatar URL.
///
/// Results are memoised per request by the shared resolver.
///
/// # Errors
///
/// Returns `400 Bad Request` for a zero size or unknown fallback kind.
pub async fn avatar(
    State(state): State<AppState>,
    Query(query): Query<AvatarQuery>,
) -> Result<Json<AvatarResponse>> {
    let request = query.into_request()?;
    let url = state.avatars().resolve_cached(&request).await;
    Ok(Json(AvatarResponse { url }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(size: Option<u32>, fallback: Option<&str>) -> AvatarQuery {
        AvatarQuery {
            email: None,
            name: Some("Sidney".to_string()),
            size,
            fallback: fallback.map(String::from),
        }
    }

    #[test]
    fn test_defaults() {
        let request = query(None, None).into_request().unwrap();
        assert_eq!(request.size_px, 40);
        assert_eq!(request.fallback_kind, FallbackKind::Initials);
        assert_eq!(request.email, "");
        assert_eq!(request.display_name, "Sidney");
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            query(Some(0), None).into_request(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_unknown_fallback_rejected() {
        assert!(matches!(
            query(None, Some("robohash")).into_request(),
            Err(AppError::InvalidFallback(_))
        ));
        let request = query(Some(96), Some("default_image")).into_request().unwrap();
        assert_eq!(request.fallback_kind, FallbackKind::DefaultImage);
        assert_eq!(request.size_px, 96);
    }
}
