//! Offline provider that plays random legal moves.

use super::{MoveProvider, ProposedMove, ProviderError, fallback_move};
use crate::games::gomoku::Board;
use std::time::Duration;
use tracing::{debug, instrument};

/// Plays a uniformly random empty cell; useful without network access.
#[derive(Debug, Clone)]
pub struct RandomProvider {
    name: String,
    delay: Duration,
}

impl RandomProvider {
    /// Creates a random provider that answers immediately.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay: Duration::ZERO,
        }
    }

    /// Adds a simulated thinking delay before each answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl MoveProvider for RandomProvider {
    #[instrument(skip(self, board), fields(provider = %self.name))]
    async fn request_move(&self, board: &Board) -> Result<ProposedMove, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let proposal = fallback_move(board);
        debug!(proposal = %proposal, "Random provider chose move");
        Ok(proposal)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
