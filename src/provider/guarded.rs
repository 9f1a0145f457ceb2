//! Provider boundary policy: bounded wait, validation, random fallback.

use super::{MoveProvider, ProposedMove, ProviderError};
use crate::games::gomoku::{Board, random_legal_move};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Wraps a provider so every call yields a legal move or the sentinel.
///
/// Any answer that is not an empty cell on the board, including errors and
/// timeouts, is replaced by a uniformly random empty cell. When no
/// empty cell remains the sentinel [`ProposedMove::NO_MOVE`] is returned.
#[derive(Debug, Clone)]
pub struct GuardedProvider<P> {
    inner: P,
    timeout: Duration,
}

impl<P: MoveProvider> GuardedProvider<P> {
    /// Wraps `inner`, abandoning any call that runs longer than `timeout`.
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<P: MoveProvider> MoveProvider for GuardedProvider<P> {
    #[instrument(skip(self, board), fields(provider = %self.inner.name(), timeout = ?self.timeout))]
    async fn request_move(&self, board: &Board) -> Result<ProposedMove, ProviderError> {
        match tokio::time::timeout(self.timeout, self.inner.request_move(board)).await {
            Ok(Ok(proposal)) if proposal.is_legal_on(board) => {
                debug!(proposal = %proposal, "Provider returned a legal move");
                return Ok(proposal);
            }
            Ok(Ok(proposal)) => {
                warn!(proposal = %proposal, "Provider returned an illegal move, falling back to random");
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Provider failed, falling back to random");
            }
            Err(_) => {
                warn!("Provider timed out, falling back to random");
            }
        }
        Ok(fallback_move(board))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Picks a uniformly random empty cell, or the sentinel if the board is full.
#[instrument(skip(board))]
pub fn fallback_move(board: &Board) -> ProposedMove {
    random_legal_move(board, &mut rand::thread_rng())
        .map(ProposedMove::at)
        .unwrap_or(ProposedMove::NO_MOVE)
}
