//! Driver configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a game-flow run and the skill lookup.
///
/// Every field has a default, so a partial TOML file (or none at all) is
/// enough. CLI flags override whatever the file provides.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct FlowConfig {
    /// Base URL of the game API, e.g. `http://127.0.0.1:20021/api/v1`.
    #[setters(into)]
    base_url: String,

    /// Per-request timeout in milliseconds.
    request_timeout_ms: u64,

    /// Delay before each final-voting poll, in milliseconds.
    poll_interval_ms: u64,

    /// Number of final-voting polls (capped at 10).
    poll_attempts: u32,

    /// Subject created when the server has none, also the fallback guess.
    #[setters(into)]
    default_subject_name: String,

    /// Words attached to the bootstrap subject.
    default_words: Vec<String>,

    /// Text the liar submits as a defense.
    #[setters(into)]
    defense_text: String,

    /// Skill list URL with a `{character}` placeholder.
    #[setters(into)]
    skill_url_template: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:20021/api/v1".to_string(),
            request_timeout_ms: 10_000,
            poll_interval_ms: 800,
            poll_attempts: 10,
            default_subject_name: "테스트주제".to_string(),
            default_words: ["사과", "바나나", "포도", "딸기", "수박"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            defense_text: "정말 아닙니다".to_string(),
            skill_url_template: "http://127.0.0.1:8080/characters/{character}/skills".to_string(),
        }
    }
}

impl FlowConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Delay before each final-voting poll.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
