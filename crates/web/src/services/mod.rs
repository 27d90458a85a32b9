//! Services backing the HTTP API.
//!
//! # Services
//!
//! - `avatar` - Avatar URL resolution across hosted providers
//! - `visibility` - Shared "show details" toggle with subscribers

pub mod avatar;
pub mod visibility;

pub use avatar::{AvatarError, AvatarResolver};
pub use visibility::VisibilityStore;
