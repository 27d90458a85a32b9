//! View preference handlers.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::visibility::{from_cookie_header, visibility_cookie};
use crate::state::AppState;

/// The "show details" preference, in both directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisibilityPrefs {
    pub show_details: bool,
}

/// Read the current preference.
///
/// A browser that already stored its own choice in the cookie gets that back;
/// otherwise the shared value applies.
pub async fn get_visibility(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<VisibilityPrefs> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(from_cookie_header);

    Json(VisibilityPrefs {
        show_details: from_cookie.unwrap_or_else(|| state.visibility().get()),
    })
}

/// Update the preference, notify subscribers, and mirror it to the cookie.
///
/// # Errors
///
/// Returns an internal error if the cookie header cannot be built.
pub async fn set_visibility(
    State(state): State<AppState>,
    Json(body): Json<VisibilityPrefs>,
) -> Result<impl IntoResponse> {
    let changed = state.visibility().set(body.show_details);
    let show = body.show_details.to_string();
    add_breadcrumb(
        "preferences",
        "Set details visibility",
        Some(&[("show_details", show.as_str())]),
    );
    tracing::debug!(show_details = body.show_details, changed, "visibility updated");

    let cookie = HeaderValue::from_str(&visibility_cookie(body.show_details).to_string())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}
