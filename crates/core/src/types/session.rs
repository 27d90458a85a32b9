//! Session and member records as supplied by the remote API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::avatar::{AvatarRequest, FallbackKind};
use super::id::{SessionId, UserId};
use super::tier::{MemberFlags, MembershipTier};

/// A scheduled pickup session.
///
/// Read-only here: the API owns the record and this crate only derives values
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    /// When the session starts, as an absolute instant.
    pub session_date: DateTime<Utc>,
    /// Days before the session that the standard buy window opens.
    ///
    /// `None` falls back to [`crate::buy_window::DEFAULT_BUY_DAY_MINIMUM`].
    #[serde(default)]
    pub buy_day_minimum: Option<u32>,
}

/// A member as far as buy windows and avatars are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub flags: MemberFlags,
}

impl Member {
    /// The member's single effective tier.
    #[must_use]
    pub const fn tier(&self) -> MembershipTier {
        self.flags.tier()
    }

    /// Build the avatar lookup for this member.
    #[must_use]
    pub fn avatar_request(&self, size_px: u32, fallback_kind: FallbackKind) -> AvatarRequest {
        AvatarRequest {
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            size_px,
            fallback_kind,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserialize_without_minimum() {
        let session: Session = serde_json::from_str(
            r#"{"id": 12, "sessionDate": "2025-01-15T07:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(session.id, SessionId::new(12));
        assert_eq!(session.buy_day_minimum, None);
        assert_eq!(session.session_date.to_rfc3339(), "2025-01-15T07:30:00+00:00");
    }

    #[test]
    fn test_session_date_offset_is_normalized_to_utc() {
        let session: Session = serde_json::from_str(
            r#"{"id": 1, "sessionDate": "2025-01-15T02:30:00-05:00", "buyDayMinimum": 4}"#,
        )
        .unwrap();
        assert_eq!(session.session_date.to_rfc3339(), "2025-01-15T07:30:00+00:00");
        assert_eq!(session.buy_day_minimum, Some(4));
    }

    #[test]
    fn test_member_flags_flattened() {
        let member: Member = serde_json::from_str(
            r#"{"id": 3, "email": "a@b.c", "displayName": "Bobby Orr", "isPreferred": true}"#,
        )
        .unwrap();
        assert_eq!(member.tier(), MembershipTier::Preferred);

        let request = member.avatar_request(64, FallbackKind::Initials);
        assert_eq!(request.email, "a@b.c");
        assert_eq!(request.display_name, "Bobby Orr");
        assert_eq!(request.size_px, 64);
    }
}
