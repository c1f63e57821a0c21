//! Error types for the game-flow driver and skill search.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong during a run.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FlowErrorKind {
    /// The server answered with a non-2xx status.
    #[display("{endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        /// Endpoint path relative to the base URL.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The request never produced a response.
    #[display("Request to {endpoint} failed: {message}")]
    Transport {
        /// Endpoint path relative to the base URL.
        endpoint: String,
        /// Underlying transport error.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[display("Could not decode response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path relative to the base URL.
        endpoint: String,
        /// Decoder error.
        message: String,
    },
    /// Login answered 2xx but reported `success: false`.
    #[display("Login failed for {nickname}: {body}")]
    LoginFailed {
        /// Nickname that was rejected.
        nickname: String,
        /// Raw response body.
        body: String,
    },
    /// The subject list stayed empty after bootstrapping.
    #[display("No approved subjects available")]
    NoApprovedSubjects,
    /// No client was assigned the liar role.
    #[display("Failed to identify liar")]
    FailedToIdentifyLiar,
    /// The turn order named a nickname no client owns.
    #[display("Turn order names unknown player {_0}")]
    UnknownPlayer(String),
    /// The skill URL template is not a URL with a `{character}` path segment.
    #[display("Invalid skill URL template {_0}")]
    InvalidSkillUrl(String),
    /// The character lookup came back empty.
    #[display("Character not found: {_0}")]
    CharacterNotFound(String),
    /// The skill search matched nothing.
    #[display("No skill matching '{_0}'")]
    NoMatches(String),
}

/// Error raised by any step of a run, with the location that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct FlowError {
    /// What went wrong.
    #[error(not(source))]
    pub kind: FlowErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FlowError {
    /// Creates a new flow error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: FlowErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the kind of failure.
    pub fn kind(&self) -> &FlowErrorKind {
        &self.kind
    }
}

impl From<FlowErrorKind> for FlowError {
    #[track_caller]
    fn from(kind: FlowErrorKind) -> Self {
        Self::new(kind)
    }
}
