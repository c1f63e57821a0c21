//! Simulated players and their nicknames.

use crate::error::{FlowError, FlowErrorKind};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, instrument};

/// Length of the random nickname suffix.
pub const SUFFIX_LEN: usize = 5;

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a suffix of [`SUFFIX_LEN`] uppercase alphanumeric characters.
pub fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Which of the three simulated players a client is.
///
/// Displays as the registry key (`host`, `p2`, `p3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum ClientLabel {
    /// Creates and starts the room.
    #[strum(serialize = "host")]
    Host,
    /// First joiner.
    #[strum(serialize = "p2")]
    CitizenA,
    /// Second joiner.
    #[strum(serialize = "p3")]
    CitizenB,
}

impl ClientLabel {
    /// All labels in registry order.
    pub const ALL: [ClientLabel; 3] = [Self::Host, Self::CitizenA, Self::CitizenB];

    /// Role name embedded in the nickname.
    pub fn role_name(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::CitizenA => "CitizenA",
            Self::CitizenB => "CitizenB",
        }
    }

    /// Nickname for this label, `MCP_<Role>_<suffix>`.
    pub fn nickname(self, suffix: &str) -> String {
        format!("MCP_{}_{}", self.role_name(), suffix)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Host => 0,
            Self::CitizenA => 1,
            Self::CitizenB => 2,
        }
    }
}

/// One simulated player with its own cookie-carrying HTTP session.
#[derive(Debug, Clone)]
pub struct PlayerClient {
    label: ClientLabel,
    nickname: String,
    http: reqwest::Client,
    /// User id reported by the server.
    pub user_id: Option<i64>,
    /// Player id within the current game.
    pub player_id: Option<i64>,
    /// Role from the last personalised state fetch.
    pub role: Option<String>,
    /// Secret word from the last personalised state fetch.
    pub word: Option<String>,
}

impl PlayerClient {
    /// Creates a client whose session keeps cookies between calls.
    #[instrument(skip(timeout), fields(label = %label))]
    pub fn new(label: ClientLabel, suffix: &str, timeout: Duration) -> Result<Self, FlowError> {
        let nickname = label.nickname(suffix);
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                FlowError::new(FlowErrorKind::Transport {
                    endpoint: "<client>".to_string(),
                    message: e.to_string(),
                })
            })?;

        debug!(nickname = %nickname, "Client created");
        Ok(Self {
            label,
            nickname,
            http,
            user_id: None,
            player_id: None,
            role: None,
            word: None,
        })
    }

    /// Registry label.
    pub fn label(&self) -> ClientLabel {
        self.label
    }

    /// Nickname sent to the server.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// HTTP session.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// True once a state fetch assigned this client the liar role.
    pub fn is_liar(&self) -> bool {
        self.role.as_deref() == Some(crate::snapshot::LIAR_ROLE)
    }
}
