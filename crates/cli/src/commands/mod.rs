//! CLI subcommand implementations.

pub mod avatar;
pub mod buy_window;
