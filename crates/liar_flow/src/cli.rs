//! Command-line interface for liar_flow.

use clap::{Parser, Subcommand};

/// Liar Flow - integration driver for the liar game API
#[derive(Parser, Debug)]
#[command(name = "liar_flow")]
#[command(about = "Drives a three-client liar game against a live server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults are used if it does not exist)
    #[arg(short, long, global = true, default_value = "liar_flow.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one full game with three simulated clients
    Flow {
        /// Game API base URL, e.g. http://127.0.0.1:20021/api/v1
        #[arg(long, env = "LIAR_FLOW_BASE_URL")]
        base_url: Option<String>,

        /// Seed for the nickname suffix
        #[arg(long)]
        seed: Option<u64>,

        /// Final-voting polls before giving up (at most 10)
        #[arg(long)]
        poll_attempts: Option<u32>,

        /// Delay between final-voting polls in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Per-request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Search a character's skill list for a substring
    Skills {
        /// Character name
        character: String,

        /// Text to look for
        query: String,

        /// Skill URL template containing {character}
        #[arg(long, env = "LIAR_FLOW_SKILL_URL")]
        url_template: Option<String>,

        /// Match regardless of case
        #[arg(short, long)]
        ignore_case: bool,
    },
}
