//! Move providers: where the agent's moves come from.
//!
//! The orchestrator only sees the [`MoveProvider`] capability. Concrete
//! providers call an LLM ([`LlmMoveProvider`]) or pick at random
//! ([`RandomProvider`]); [`GuardedProvider`] wraps any of them with a
//! timeout and the random-legal-move fallback.

mod guarded;
mod llm;
mod random;

pub use guarded::{GuardedProvider, fallback_move};
pub use llm::{LlmMoveProvider, SYSTEM_INSTRUCTION, move_prompt, move_schema, parse_move};
pub use random::RandomProvider;

use crate::agent_config::{AgentConfig, ConfigError};
use crate::games::gomoku::{BOARD_SIZE, Board, Coordinates};
use crate::llm_client::{LlmClient, LlmError};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// A move as reported by a provider, before validation.
///
/// Rows and columns are signed so the conventional "no legal move"
/// sentinel `(-1, -1)` and any out-of-range answer from a model can be
/// represented and rejected later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposedMove {
    /// Row index as reported.
    pub row: i64,
    /// Column index as reported.
    pub col: i64,
}

impl ProposedMove {
    /// Sentinel meaning "no legal move available".
    pub const NO_MOVE: Self = Self { row: -1, col: -1 };

    /// Creates a proposal from raw indices.
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Creates a proposal pointing at `at`.
    pub fn at(at: Coordinates) -> Self {
        // Board indices are < BOARD_SIZE, far below i64::MAX.
        Self {
            row: at.row as i64,
            col: at.col as i64,
        }
    }

    /// Returns true for the "no legal move" sentinel (`row == -1`).
    pub fn is_no_move(&self) -> bool {
        self.row == -1
    }

    /// Converts to board coordinates, or `None` if either index is out of range.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < BOARD_SIZE && col < BOARD_SIZE).then(|| Coordinates::new(row, col))
    }

    /// Returns true if this proposal names an empty cell on `board`.
    pub fn is_legal_on(&self, board: &Board) -> bool {
        self.coordinates().is_some_and(|at| board.is_empty(at))
    }
}

impl std::fmt::Display for ProposedMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Source of the agent's moves.
///
/// Implementations may take arbitrarily long and may fail; callers must
/// validate the returned coordinates against the board they passed in.
#[async_trait::async_trait]
pub trait MoveProvider: Send + Sync {
    /// Chooses a cell for the agent on `board`.
    async fn request_move(&self, board: &Board) -> Result<ProposedMove, ProviderError>;

    /// Returns the provider's display name.
    fn name(&self) -> &str;
}

/// Move provider error.
#[derive(Debug, Clone, Display, Error)]
#[display("Move provider error: {} at {}:{}", message, file, line)]
pub struct ProviderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Move provider error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<LlmError> for ProviderError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(format!("LLM request failed: {}", err.message))
    }
}

impl From<serde_json::Error> for ProviderError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Failed to parse move: {}", err))
    }
}

/// Builds the guarded provider described by `config`.
///
/// With `offline` set, the LLM is replaced by a [`RandomProvider`] and no
/// API key is required.
///
/// # Errors
///
/// Returns [`ConfigError`] if the LLM API key for the configured vendor is
/// missing from the environment.
#[instrument(skip(config), fields(agent = %config.name()))]
pub fn build_provider(
    config: &AgentConfig,
    offline: bool,
) -> Result<Arc<dyn MoveProvider>, ConfigError> {
    let timeout = config.move_timeout();

    if offline {
        info!("Using offline random provider");
        let inner = RandomProvider::new(config.name().clone());
        return Ok(Arc::new(GuardedProvider::new(inner, timeout)));
    }

    let llm_config = config.create_llm_config()?;
    let inner = LlmMoveProvider::new(config.name().clone(), LlmClient::new(llm_config));
    info!(provider = ?config.llm_provider(), model = %config.llm_model(), "Using LLM provider");
    Ok(Arc::new(GuardedProvider::new(inner, timeout)))
}
