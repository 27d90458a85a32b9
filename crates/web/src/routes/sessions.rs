//! Session buy-window handlers.

use axum::{Json, extract::Query};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pickup_core::MembershipTier;
use pickup_core::buy_window::{self, parse_instant};

use crate::error::Result;

/// Query parameters for the buy-window endpoint.
#[derive(Debug, Deserialize)]
pub struct BuyWindowQuery {
    /// Session start, RFC 3339.
    pub session_date: String,
    pub buy_day_minimum: Option<u32>,
    /// Tier name; defaults to `standard`.
    pub tier: Option<String>,
    /// Evaluation time, RFC 3339; defaults to the server clock.
    pub now: Option<String>,
}

/// Buy-window response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuyWindowResponse {
    pub tier: MembershipTier,
    pub opens_at: DateTime<Utc>,
    pub is_open: bool,
    /// Seconds until the window opens; absent once open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_until_open: Option<i64>,
}

/// Compute when a member of the given tier may buy or sell a spot.
///
/// # Errors
///
/// Returns `400 Bad Request` for malformed timestamps or unknown tiers.
pub async fn buy_window(Query(query): Query<BuyWindowQuery>) -> Result<Json<BuyWindowResponse>> {
    let session_date = parse_instant(&query.session_date)?;
    let tier = match query.tier.as_deref() {
        Some(raw) => raw.parse::<MembershipTier>()?,
        None => MembershipTier::Standard,
    };
    let now = match query.now.as_deref() {
        Some(raw) => parse_instant(raw)?,
        None => Utc::now(),
    };

    let result = buy_window::evaluate(session_date, query.buy_day_minimum, tier, now);
    tracing::debug!(%tier, opens_at = %result.opens_at, is_open = result.is_open, "buy window");

    Ok(Json(BuyWindowResponse {
        tier,
        opens_at: result.opens_at,
        is_open: result.is_open,
        seconds_until_open: result.time_until_open(now).map(|d| d.num_seconds()),
    }))
}
