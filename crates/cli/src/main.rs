//! Pickup CLI - buy-window and avatar tools.
//!
//! # Usage
//!
//! ```bash
//! # When does the buy window open for a preferred-plus member?
//! pickup buy-window --session-date 2025-01-15T07:30:00Z --tier preferred_plus
//!
//! # Resolve an avatar URL
//! pickup avatar --email skater@example.com --name "Sam Skater"
//! ```
//!
//! # Commands
//!
//! - `buy-window` - Compute when buying/selling a spot opens
//! - `avatar` - Resolve an avatar URL against the configured providers

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pickup")]
#[command(author, version, about = "Pickup hockey CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute when a member may buy or sell a roster spot
    BuyWindow {
        /// Session start (RFC 3339, e.g. 2025-01-15T07:30:00Z)
        #[arg(short, long)]
        session_date: String,

        /// Minimum lead in days (defaults to 6)
        #[arg(short, long)]
        buy_day_minimum: Option<u32>,

        /// Membership tier (`standard`, `preferred`, `preferred_plus`)
        #[arg(short, long, default_value = "standard")]
        tier: String,

        /// Evaluate at this time instead of now (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Resolve a member's avatar URL
    Avatar {
        /// Member email
        #[arg(short, long)]
        email: Option<String>,

        /// Member display name
        #[arg(short, long)]
        name: Option<String>,

        /// Size in pixels
        #[arg(short, long, default_value_t = 40)]
        size: u32,

        /// Fallback when no hosted avatar exists (`initials`, `default_image`)
        #[arg(short, long, default_value = "initials")]
        fallback: String,
    },
}

#[tokio::main]
async fn main() {
    // Results are reported through tracing, so default to info when RUST_LOG is unset
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::BuyWindow {
            session_date,
            buy_day_minimum,
            tier,
            now,
        } => {
            commands::buy_window::show(&session_date, buy_day_minimum, &tier, now.as_deref())?;
        }
        Commands::Avatar {
            email,
            name,
            size,
            fallback,
        } => {
            commands::avatar::resolve(email, name, size, &fallback).await?;
        }
    }
    Ok(())
}
