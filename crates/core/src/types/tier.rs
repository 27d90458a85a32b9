//! Membership tiers and the raw member flags they are derived from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a tier name cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid membership tier: {0}")]
pub struct TierParseError(pub String);

/// A member's standing, which decides how early their buy window opens.
///
/// Exactly one tier applies to a member. Derive it once from [`MemberFlags`]
/// at the data boundary instead of re-checking the flags at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    #[default]
    Standard,
    /// Buy window opens one day earlier than standard.
    Preferred,
    /// Preferred, plus a few extra minutes of head start.
    PreferredPlus,
}

impl MembershipTier {
    /// Whether this tier gets the full `buy_day_minimum` lead instead of one day less.
    #[must_use]
    pub const fn is_preferred(self) -> bool {
        matches!(self, Self::Preferred | Self::PreferredPlus)
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Preferred => write!(f, "preferred"),
            Self::PreferredPlus => write!(f, "preferred_plus"),
        }
    }
}

impl std::str::FromStr for MembershipTier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(Self::Standard),
            "preferred" => Ok(Self::Preferred),
            "preferred_plus" => Ok(Self::PreferredPlus),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// Tier flags as the remote API delivers them on a user record.
///
/// The flags are independent booleans upstream, so both may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFlags {
    #[serde(default)]
    pub is_preferred: bool,
    #[serde(default)]
    pub is_preferred_plus: bool,
}

impl MemberFlags {
    /// Resolve the flags to a single tier.
    ///
    /// `PreferredPlus` wins over `Preferred`, which wins over `Standard`.
    #[must_use]
    pub const fn tier(self) -> MembershipTier {
        if self.is_preferred_plus {
            MembershipTier::PreferredPlus
        } else if self.is_preferred {
            MembershipTier::Preferred
        } else {
            MembershipTier::Standard
        }
    }
}

impl From<MemberFlags> for MembershipTier {
    fn from(flags: MemberFlags) -> Self {
        flags.tier()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_precedence() {
        let both = MemberFlags {
            is_preferred: true,
            is_preferred_plus: true,
        };
        assert_eq!(both.tier(), MembershipTier::PreferredPlus);

        let preferred = MemberFlags {
            is_preferred: true,
            is_preferred_plus: false,
        };
        assert_eq!(preferred.tier(), MembershipTier::Preferred);

        assert_eq!(MemberFlags::default().tier(), MembershipTier::Standard);
    }

    #[test]
    fn test_flags_deserialize_missing_as_false() {
        let flags: MemberFlags = serde_json::from_str(r#"{"isPreferredPlus": true}"#).unwrap();
        assert!(!flags.is_preferred);
        assert_eq!(MembershipTier::from(flags), MembershipTier::PreferredPlus);

        let flags: MemberFlags = serde_json::from_str("{}").unwrap();
        assert_eq!(flags.tier(), MembershipTier::Standard);
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!(
            "preferred_plus".parse::<MembershipTier>().unwrap(),
            MembershipTier::PreferredPlus
        );
        assert_eq!(
            "Preferred-Plus".parse::<MembershipTier>().unwrap(),
            MembershipTier::PreferredPlus
        );
        assert_eq!(
            " standard ".parse::<MembershipTier>().unwrap(),
            MembershipTier::Standard
        );
        assert!("gold".parse::<MembershipTier>().is_err());
    }

    #[test]
    fn test_tier_display_roundtrip() {
        for tier in [
            MembershipTier::Standard,
            MembershipTier::Preferred,
            MembershipTier::PreferredPlus,
        ] {
            assert_eq!(tier.to_string().parse::<MembershipTier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_is_preferred() {
        assert!(!MembershipTier::Standard.is_preferred());
        assert!(MembershipTier::Preferred.is_preferred());
        assert!(MembershipTier::PreferredPlus.is_preferred());
    }
}
