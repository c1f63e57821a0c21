//! Bounded wait for a server-side phase transition.

use crate::error::FlowError;
use crate::snapshot::GameSnapshot;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

/// Upper bound on polls regardless of configuration.
pub const MAX_POLL_ATTEMPTS: u32 = 10;

/// Result of [`wait_for_phase`].
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    /// The target phase was seen.
    pub observed: bool,
    /// Number of fetches performed.
    pub attempts: u32,
    /// Last snapshot fetched, if any.
    pub last: Option<GameSnapshot>,
}

/// Fetches state until its phase equals `target`, sleeping `interval` before
/// each fetch, for at most `attempts` (capped at [`MAX_POLL_ATTEMPTS`]) tries.
///
/// Not observing the phase is not an error; fetch errors are.
#[instrument(skip(fetch, interval))]
pub async fn wait_for_phase<F, Fut>(
    mut fetch: F,
    target: &str,
    attempts: u32,
    interval: Duration,
) -> Result<PollOutcome, FlowError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<GameSnapshot, FlowError>>,
{
    let mut outcome = PollOutcome::default();
    for _ in 0..attempts.min(MAX_POLL_ATTEMPTS) {
        tokio::time::sleep(interval).await;
        let snapshot = fetch().await?;
        outcome.attempts += 1;
        let phase_matches = snapshot.phase() == Some(target);
        debug!(attempt = outcome.attempts, phase = ?snapshot.phase(), "Polled phase");
        outcome.last = Some(snapshot);
        if phase_matches {
            outcome.observed = true;
            break;
        }
    }
    Ok(outcome)
}
