//! Draw detection logic for gomoku.

use super::super::{Board, Cell};
use tracing::instrument;

/// Checks if the board is full (every cell occupied).
///
/// A full board with no winner indicates a draw.
#[instrument(skip(board))]
pub fn is_board_full(board: &Board) -> bool {
    board.cells().all(|(_, cell)| cell != Cell::Empty)
}
