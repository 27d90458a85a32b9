//! Core types for the pickup client.
//!
//! This module provides type-safe wrappers for the records the remote API
//! supplies and for avatar lookups.

pub mod avatar;
pub mod id;
pub mod session;
pub mod tier;

pub use avatar::{AvatarRequest, FallbackKind, FallbackParseError};
pub use id::*;
pub use session::{Member, Session};
pub use tier::{MemberFlags, MembershipTier, TierParseError};
