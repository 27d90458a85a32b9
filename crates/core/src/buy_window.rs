//! Buy-window eligibility.
//!
//! A member may buy or sell a roster spot once the session's buy window has
//! opened for their tier. The window opens a fixed lead time before the
//! session:
//!
//! | Tier            | Lead before `session_date`                          |
//! |-----------------|-----------------------------------------------------|
//! | `Standard`      | `buy_day_minimum - 1` days + 22 hours               |
//! | `Preferred`     | `buy_day_minimum` days + 22 hours                   |
//! | `PreferredPlus` | `buy_day_minimum` days + 22 hours + `buy_day_minimum - 1` minutes |
//!
//! All arithmetic happens on UTC instants, so the result does not depend on
//! the viewer's time zone. The current time is always passed in.
//!
//! A `buy_day_minimum` of zero gives a negative standard lead, which puts the
//! opening after the session starts. That is kept as-is.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MembershipTier, Session};

/// Minimum lead in days when a session does not specify one.
pub const DEFAULT_BUY_DAY_MINIMUM: u32 = 6;

/// Hours subtracted from every tier's day-based lead.
const OFFSET_HOURS: i64 = 22;

/// When the buy window opens and whether it already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyWindowResult {
    pub opens_at: DateTime<Utc>,
    pub is_open: bool,
}

impl BuyWindowResult {
    /// Time remaining until the window opens, or `None` if it is open.
    #[must_use]
    pub fn time_until_open(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        if now >= self.opens_at {
            None
        } else {
            Some(self.opens_at - now)
        }
    }
}

/// Error parsing a timestamp supplied by a caller.
#[derive(Debug, Error)]
#[error("invalid timestamp '{input}': {source}")]
pub struct TimestampError {
    input: String,
    #[source]
    source: chrono::ParseError,
}

/// Parse an RFC 3339 timestamp into a UTC instant.
///
/// # Errors
///
/// Returns an error if the input is not valid RFC 3339.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TimestampError {
            input: input.to_string(),
            source,
        })
}

/// Total lead between the window opening and the session start.
///
/// Negative when `buy_day_minimum` is zero for the standard tier.
fn lead_time(buy_day_minimum: u32, tier: MembershipTier) -> TimeDelta {
    let minimum = i64::from(buy_day_minimum);
    let lead_days = if tier.is_preferred() {
        minimum
    } else {
        minimum - 1
    };

    let mut lead = TimeDelta::days(lead_days) + TimeDelta::hours(OFFSET_HOURS);
    if tier == MembershipTier::PreferredPlus {
        lead = lead + TimeDelta::minutes(minimum - 1);
    }
    lead
}

/// Compute when the buy window opens for a tier.
///
/// Saturates at chrono's representable range instead of panicking.
#[must_use]
pub fn opens_at(
    session_date: DateTime<Utc>,
    buy_day_minimum: Option<u32>,
    tier: MembershipTier,
) -> DateTime<Utc> {
    let lead = lead_time(buy_day_minimum.unwrap_or(DEFAULT_BUY_DAY_MINIMUM), tier);
    session_date.checked_sub_signed(lead).unwrap_or(if lead < TimeDelta::zero() {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// Compute the buy window for a tier and check it against `now`.
///
/// The window is open from `opens_at` inclusive.
#[must_use]
pub fn evaluate(
    session_date: DateTime<Utc>,
    buy_day_minimum: Option<u32>,
    tier: MembershipTier,
    now: DateTime<Utc>,
) -> BuyWindowResult {
    let opens_at = opens_at(session_date, buy_day_minimum, tier);
    BuyWindowResult {
        opens_at,
        is_open: now >= opens_at,
    }
}

impl Session {
    /// The buy window of this session for a member of `tier`.
    #[must_use]
    pub fn buy_window(&self, tier: MembershipTier, now: DateTime<Utc>) -> BuyWindowResult {
        evaluate(self.session_date, self.buy_day_minimum, tier, now)
    }
}
