//! Process-wide "show details" toggle with publish/subscribe.
//!
//! Views subscribe when they mount and drop their receiver when they unmount.
//! The browser keeps a cookie copy so the choice survives reloads.

use std::sync::Arc;

use cookie::{Cookie, SameSite, time::Duration};
use tokio::sync::watch;

/// Cookie mirroring the toggle in the browser.
pub const VISIBILITY_COOKIE: &str = "pickup_show_details";

/// One year.
const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Shared boolean state with change notification.
#[derive(Clone)]
pub struct VisibilityStore {
    tx: Arc<watch::Sender<bool>>,
}

impl VisibilityStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Set the value, notifying subscribers only when it changes.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, show: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == show {
                false
            } else {
                *current = show;
                true
            }
        })
    }

    /// Flip the value and return the new one.
    pub fn toggle(&self) -> bool {
        let mut next = false;
        self.tx.send_modify(|current| {
            *current = !*current;
            next = *current;
        });
        next
    }

    /// Subscribe to changes. Drop the receiver to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for VisibilityStore {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Cookie storing `show`, for a `Set-Cookie` header.
#[must_use]
pub fn visibility_cookie(show: bool) -> Cookie<'static> {
    Cookie::build((VISIBILITY_COOKIE, show.to_string()))
        .path("/")
        .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
        .same_site(SameSite::Lax)
        .build()
}

/// Read the toggle from a `Cookie` request header, if present and valid.
///
/// Malformed pairs elsewhere in the header are skipped.
#[must_use]
pub fn from_cookie_header(header: &str) -> Option<bool> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == VISIBILITY_COOKIE)
        .and_then(|cookie| from_cookie_value(cookie.value_trimmed()))
}

/// Parse a stored cookie value.
#[must_use]
pub fn from_cookie_value(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let store = VisibilityStore::new(true);
        assert!(!store.set(true));
        assert!(store.set(false));
        assert!(!store.get());
    }

    #[test]
    fn test_toggle() {
        let store = VisibilityStore::new(false);
        assert!(store.toggle());
        assert!(!store.toggle());
        assert!(!store.get());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = VisibilityStore::new(true);
        let mut first = store.subscribe();
        let mut second = store.subscribe();

        store.set(false);

        first.changed().await.unwrap();
        second.changed().await.unwrap();
        assert!(!*first.borrow_and_update());
        assert!(!*second.borrow_and_update());
    }

    #[tokio::test]
    async fn test_unchanged_set_does_not_notify() {
        let store = VisibilityStore::new(true);
        let rx = store.subscribe();
        store.set(true);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = VisibilityStore::default();
        let rx = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(rx);
        assert_eq!(store.subscriber_count(), 0);
        // Still writable with nobody listening
        assert!(store.set(false));
    }

    #[test]
    fn test_visibility_cookie_attributes() {
        let cookie = visibility_cookie(false);
        assert_eq!(cookie.name(), "pickup_show_details");
        assert_eq!(cookie.value(), "false");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(365)));

        let header = cookie.to_string();
        assert!(header.starts_with("pickup_show_details=false;"));
        assert!(header.contains("Max-Age=31536000"));
    }

    #[test]
    fn test_quoted_cookie_value() {
        assert_eq!(from_cookie_header("pickup_show_details=\"false\""), Some(false));
        assert_eq!(
            from_cookie_header("theme=dark; pickup_show_details=\"true\""),
            Some(true)
        );
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        assert_eq!(
            from_cookie_header("garbage; =nameless; pickup_show_details=false"),
            Some(false)
        );
    }

    #[test]
    fn test_cookie_header_parsing() {

        assert_eq!(
            from_cookie_header("theme=dark; pickup_show_details=false"),
            Some(false)
        );
        assert_eq!(from_cookie_header("pickup_show_details=true"), Some(true));
        assert_eq!(from_cookie_header("pickup_show_details=maybe"), None);
        assert_eq!(from_cookie_header("theme=dark"), None);
    }
}
