//! Integration test helpers for the pickup client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pickup-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `buy_window` - Buy-window rules driven from API-shaped records
//! - `avatar_chain` - Avatar resolution against mock image providers
//! - `http_api` - The web API served on a real socket
//!
//! Mock providers are small axum servers on `127.0.0.1:0`; nothing leaves
//! the machine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    http::{Method, StatusCode},
    routing::get,
};
use tokio::net::TcpListener;
use url::Url;

use pickup_web::config::{AvatarConfig, WebConfig};
use pickup_web::routes;
use pickup_web::state::AppState;

/// Probe timeout used by test resolvers.
pub const TEST_PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// A fake avatar provider answering every `/avatar/{hash}` with one status.
///
/// The route is registered with `get`, which axum also uses for `HEAD`, so
/// the recorded methods show which one the resolver sent.
pub struct MockProvider {
    pub url: Url,
    hits: Arc<AtomicUsize>,
    methods: Arc<Mutex<Vec<Method>>>,
}

impl MockProvider {
    /// Start a provider that answers immediately.
    pub async fn spawn(status: StatusCode) -> Self {
        Self::spawn_with_delay(status, Duration::ZERO).await
    }

    /// Start a provider that waits `delay` before answering.
    pub async fn spawn_with_delay(status: StatusCode, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let methods = Arc::new(Mutex::new(Vec::new()));
        let counter = Arc::clone(&hits);
        let seen = Arc::clone(&methods);

        let app = Router::new().route(
            "/avatar/{hash}",
            get(move |method: Method| {
                let counter = Arc::clone(&counter);
                let seen = Arc::clone(&seen);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    seen.lock().expect("methods lock").push(method);
                    tokio::time::sleep(delay).await;
                    status
                }
            }),
        );

        let url = serve(app).await;
        Self { url, hits, methods }
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Methods of the requests received so far, in order.
    #[must_use]
    pub fn methods(&self) -> Vec<Method> {
        self.methods.lock().expect("methods lock").clone()
    }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Url::parse(&format!("http://{addr}")).expect("valid local URL")
}

/// A local URL with nothing listening behind it.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("valid local URL")
}

/// Avatar config pointing both hosted providers at the given URLs.
#[must_use]
pub fn avatar_config(libravatar: &Url, gravatar: &Url) -> AvatarConfig {
    AvatarConfig {
        libravatar_url: libravatar.clone(),
        gravatar_url: gravatar.clone(),
        probe_timeout: TEST_PROBE_TIMEOUT,
        ..AvatarConfig::default()
    }
}

/// Start the full web app with the given avatar config; returns its base URL.
pub async fn spawn_app(avatar: AvatarConfig) -> Url {
    let config = WebConfig {
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        avatar,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = AppState::new(config).expect("app state");
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static");
    serve(routes::app(state, static_dir)).await
}
