//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strictly_gomoku::{
    BOARD_SIZE, Board, Coordinates, MoveProvider, Player, ProposedMove, ProviderError,
    TurnOrchestrator, TurnSettings,
};
use tokio::sync::Notify;

/// Provider that replays a fixed script of replies, optionally waiting on a gate first.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ProposedMove, ProviderError>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    /// Answers with `replies` in order; once exhausted every call fails.
    pub fn new(replies: impl IntoIterator<Item = Result<ProposedMove, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            gate: None,
        }
    }

    /// Answers with the given cells in order.
    pub fn moves(cells: impl IntoIterator<Item = Coordinates>) -> Self {
        Self::new(cells.into_iter().map(|at| Ok(ProposedMove::at(at))))
    }

    /// Holds every answer until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait::async_trait]
impl MoveProvider for ScriptedProvider {
    async fn request_move(&self, _board: &Board) -> Result<ProposedMove, ProviderError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::new("script exhausted")))
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

/// Orchestrator around `provider` with no think delay.
pub fn orchestrator(provider: impl MoveProvider + 'static) -> TurnOrchestrator {
    TurnOrchestrator::new(Arc::new(provider), TurnSettings::new(Duration::ZERO))
}

/// Owner of each cell in a full board that contains no five in a row.
///
/// Columns alternate within a row and each pair of rows is shifted by one,
/// which leaves at most two equal stones in a row in every direction.
/// Black gets 113 cells and white 112.
pub fn draw_pattern(at: Coordinates) -> Player {
    if (at.row / 2 + at.col) % 2 == 0 {
        Player::Human
    } else {
        Player::Agent
    }
}

/// Cells `player` owns in [`draw_pattern`], row-major.
pub fn draw_cells(player: Player) -> Vec<Coordinates> {
    (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| Coordinates::new(row, col)))
        .filter(|at| draw_pattern(*at) == player)
        .collect()
}

/// Builds a board from `(row, col, player)` triples.
pub fn board_with(stones: &[(usize, usize, Player)]) -> Board {
    stones.iter().fold(Board::new(), |board, &(row, col, player)| {
        board.with_stone(Coordinates::new(row, col), player).unwrap()
    })
}
