//! Liar Flow - black-box integration driver for the liar game REST API
//!
//! Impersonates three players (a host and two citizens) and walks one game
//! through login, room setup, hints, voting, defense, final voting and the
//! liar's guess. Also ships a small skill-search helper for game-data APIs.
//!
//! # Architecture
//!
//! - **Driver**: [`GameFlowDriver`] runs the fixed script step by step
//! - **Api**: [`GameApi`] wraps each REST endpoint
//! - **Roster**: [`Roster`] owns the three [`PlayerClient`]s
//! - **Search**: [`search_json`] walks any JSON tree for a substring
//!
//! # Example
//!
//! ```no_run
//! use liar_flow::{FlowConfig, GameFlowDriver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = FlowConfig::default().with_base_url("http://127.0.0.1:20021/api/v1");
//! let report = GameFlowDriver::new(config).run().await?;
//! println!("liar was {}", report.liar());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod client;
mod config;
mod driver;
mod error;
mod poll;
mod roster;
mod search;
mod skills;
mod snapshot;
mod transcript;
mod wire;

// Crate-level exports - API and wire types
pub use api::GameApi;
pub use wire::{
    CreateGameRequest, CreateSubjectRequest, CreateWordRequest, DefenseRequest, FinalVoteRequest,
    GameNumberRequest, GuessRequest, HintRequest, JoinRequest, LoginRequest, LoginResponse,
    Subject, VoteRequest,
};

// Crate-level exports - Clients
pub use client::{ClientLabel, PlayerClient, SUFFIX_LEN, random_suffix};
pub use roster::Roster;

// Crate-level exports - Configuration and errors
pub use config::{ConfigError, FlowConfig};
pub use error::{FlowError, FlowErrorKind};

// Crate-level exports - Driver
pub use driver::{FlowReport, GameFlowDriver, MAX_SUBJECTS};
pub use poll::{MAX_POLL_ATTEMPTS, PollOutcome, wait_for_phase};
pub use snapshot::{FINAL_VOTING_PHASE, GameSnapshot, LIAR_ROLE, PlayerEntry};
pub use transcript::Transcript;

// Crate-level exports - Skill search
pub use search::{MatchSite, SearchMatch, search_json};
pub use skills::{CHARACTER_PLACEHOLDER, SkillClient};
