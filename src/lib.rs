//! Strictly Gomoku library - five-in-a-row against a remote LLM
//!
//! # Architecture
//!
//! - **Games**: Gomoku board, stones and the pure win/draw rules
//! - **Orchestrator**: the single owner of game state; sequences human and
//!   agent turns and discards agent replies from a game that was reset
//! - **Provider**: where the agent's moves come from (LLM, random), wrapped
//!   in a timeout-and-fallback guard
//! - **Views**: terminal UI and HTTP API, both rendering [`GameView`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_gomoku::{Coordinates, RandomProvider, TurnOrchestrator, TurnSettings};
//!
//! # async fn example() {
//! let provider = Arc::new(RandomProvider::new("Random"));
//! let game = TurnOrchestrator::new(provider, TurnSettings::default());
//!
//! game.submit_human_move(Coordinates::new(7, 7));
//! game.wait_for_agent().await;
//! assert_eq!(game.snapshot().board().stone_count(), (1, 1));
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent_config;
mod games;
mod llm_client;
mod orchestrator;
mod provider;
mod server;
mod tui;
mod view;

// Crate-level exports - Agent configuration
pub use agent_config::{AgentConfig, ConfigError};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Game types (gomoku)
pub use games::gomoku::{
    BOARD_SIZE, Board, Cell, Coordinates, Direction, Outcome, PlaceError, Player, WIN_COUNT,
    WinningLine, check_win, create_empty_board, is_board_full, legal_moves, random_legal_move,
};

// Crate-level exports - Turn orchestration
pub use orchestrator::{
    AgentResolution, GameSnapshot, Generation, HumanMove, Phase, Rejection, TurnOrchestrator,
    TurnProgress, TurnSettings,
};

// Crate-level exports - Move providers
pub use provider::{
    GuardedProvider, LlmMoveProvider, MoveProvider, ProposedMove, ProviderError, RandomProvider,
    SYSTEM_INSTRUCTION, build_provider, fallback_move, move_prompt, move_schema, parse_move,
};

// Crate-level exports - Views
pub use server::{MoveRequest, MoveResponse, router, serve};
pub use tui::run_tui;
pub use view::{GameView, status_message};
