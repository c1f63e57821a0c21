//! Progress lines of a run.

use tracing::info;

/// Ordered progress log; every line is also emitted through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and keeps `line`.
    pub fn record(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!(target: "liar_flow::transcript", "{}", line);
        self.lines.push(line);
    }

    /// All lines so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}
