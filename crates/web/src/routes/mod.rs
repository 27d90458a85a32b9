//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /static/*                        - Bundled assets (default avatar)
//!
//! # Sessions
//! GET  /api/buy-window                  - When a tier may buy/sell a spot
//!
//! # Members
//! GET  /api/avatar                      - Resolve an avatar URL
//!
//! # Preferences
//! GET  /api/preferences/visibility      - Read the "show details" toggle
//! PUT  /api/preferences/visibility      - Update it (sets cookie)
//! ```

pub mod avatar;
pub mod preferences;
pub mod sessions;

use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::Uri,
    middleware,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/buy-window", get(sessions::buy_window))
        .route("/avatar", get(avatar::avatar))
        .route(
            "/preferences/visibility",
            get(preferences::get_visibility).put(preferences::set_visibility),
        )
}

/// Build the full application with middleware, serving assets from `static_dir`.
pub fn app(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check providers.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
