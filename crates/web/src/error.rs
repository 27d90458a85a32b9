//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use pickup_core::{FallbackParseError, TierParseError};
use pickup_core::buy_window::TimestampError;

/// Application-level error type for the web API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A timestamp parameter was not RFC 3339.
    #[error("Bad request: {0}")]
    InvalidTimestamp(#[from] TimestampError),

    /// A tier parameter named no known tier.
    #[error("Bad request: {0}")]
    InvalidTier(#[from] TierParseError),

    /// A fallback parameter named no known fallback kind.
    #[error("Bad request: {0}")]
    InvalidFallback(#[from] FallbackParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTimestamp(_)
            | Self::InvalidTier(_)
            | Self::InvalidFallback(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("preferences", "Toggled details", Some(&[("show_details", "true")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("session-123".to_string());
        assert_eq!(err.to_string(), "Not found: session-123");

        let err = AppError::BadRequest("size must be positive".to_string());
        assert_eq!(err.to_string(), "Bad request: size must be positive");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_failures_are_bad_requests() {
        let tier_err = "gold".parse::<pickup_core::MembershipTier>().unwrap_err();
        assert_eq!(get_status(tier_err.into()), StatusCode::BAD_REQUEST);

        let ts_err = pickup_core::buy_window::parse_instant("tomorrow").unwrap_err();
        assert_eq!(get_status(ts_err.into()), StatusCode::BAD_REQUEST);

        let fallback_err = "robohash".parse::<pickup_core::FallbackKind>().unwrap_err();
        let err = AppError::from(fallback_err);
        assert_eq!(err.to_string(), "Bad request: invalid fallback kind: robohash");
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }
}
