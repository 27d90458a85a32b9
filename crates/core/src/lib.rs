//! Pickup Core - Shared types and buy-window rules.
//!
//! This crate provides the types used across all pickup components:
//! - `web` - HTTP API serving buy windows, avatars and view preferences
//! - `cli` - Command-line access to the same computations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clock reads. Callers pass the current time in.
//!
//! # Modules
//!
//! - [`types`] - IDs, sessions, members, membership tiers, avatar requests
//! - [`buy_window`] - When a member may buy or sell a roster spot

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod buy_window;
pub mod types;

pub use buy_window::{BuyWindowResult, DEFAULT_BUY_DAY_MINIMUM, evaluate, opens_at};
pub use types::*;
