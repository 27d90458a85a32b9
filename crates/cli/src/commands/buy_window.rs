//! Buy-window command.
//!
//! # Usage
//!
//! ```bash
//! # When may a preferred member buy into Wednesday's skate?
//! pickup buy-window --session-date 2025-01-15T07:30:00Z --tier preferred
//!
//! # Evaluate against a fixed time instead of the system clock
//! pickup buy-window --session-date 2025-01-15T07:30:00Z --now 2025-01-09T09:30:00Z
//! ```

use chrono::{Local, TimeDelta, Utc};
use thiserror::Error;

use pickup_core::buy_window::{self, BuyWindowResult, TimestampError, parse_instant};
use pickup_core::{MembershipTier, TierParseError};

/// Errors from the buy-window command.
#[derive(Debug, Error)]
pub enum BuyWindowError {
    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error(transparent)]
    Tier(#[from] TierParseError),
}

/// Compute and log the buy window for a session.
///
/// # Errors
///
/// Returns an error if a timestamp or the tier cannot be parsed.
pub fn show(
    session_date: &str,
    buy_day_minimum: Option<u32>,
    tier: &str,
    now: Option<&str>,
) -> Result<BuyWindowResult, BuyWindowError> {
    let session_date = parse_instant(session_date)?;
    let tier: MembershipTier = tier.parse()?;
    let now = now.map(parse_instant).transpose()?.unwrap_or_else(Utc::now);

    let result = buy_window::evaluate(session_date, buy_day_minimum, tier, now);

    tracing::info!("Tier: {}", tier);
    tracing::info!("Session: {}", session_date.to_rfc3339());
    tracing::info!(
        "Opens at: {} ({} local)",
        result.opens_at.to_rfc3339(),
        result.opens_at.with_timezone(&Local).format("%a %b %-d %H:%M")
    );
    match result.time_until_open(now) {
        None => tracing::info!("Status: open"),
        Some(remaining) => tracing::info!("Status: opens in {}", format_countdown(remaining)),
    }

    Ok(result)
}

/// Render a positive duration as `1d 2h 3m`, dropping leading zero units.
fn format_countdown(remaining: TimeDelta) -> String {
    // Round partial minutes up so "0m" never shows while still closed
    let total_minutes = (remaining.num_seconds() + 59) / 60;
    let days = total_minutes / (24 * 60);
    let hours = total_minutes / 60 % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_show_with_fixed_now() {
        let result = show(
            "2025-01-15T07:30:00Z",
            Some(6),
            "standard",
            Some("2025-01-09T09:30:00Z"),
        )
        .unwrap();
        assert!(result.is_open);
        assert_eq!(result.opens_at.to_rfc3339(), "2025-01-09T09:30:00+00:00");
    }

    #[test]
    fn test_show_rejects_unknown_tier() {
        let err = show("2025-01-15T07:30:00Z", None, "gold", None).unwrap_err();
        assert!(matches!(err, BuyWindowError::Tier(_)));
    }

    #[test]
    fn test_show_rejects_bad_timestamp() {
        let err = show("2025-01-15", None, "standard", None).unwrap_err();
        assert!(matches!(err, BuyWindowError::Timestamp(_)));
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(
            format_countdown(TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::minutes(15)),
            "2d 3h 15m"
        );
        assert_eq!(format_countdown(TimeDelta::minutes(90)), "1h 30m");
        assert_eq!(format_countdown(TimeDelta::seconds(1)), "1m");
        assert_eq!(format_countdown(TimeDelta::seconds(59 * 60 + 30)), "1h 0m");
    }
}
