//! Board construction and legal move enumeration.

use super::super::{Board, Cell, Coordinates};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::instrument;

/// Creates a fresh board with every cell empty.
#[instrument]
pub fn create_empty_board() -> Board {
    Board::new()
}

/// Returns every empty cell, row-major.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board) -> Vec<Coordinates> {
    board
        .cells()
        .filter(|(_, cell)| *cell == Cell::Empty)
        .map(|(at, _)| at)
        .collect()
}

/// Picks an empty cell uniformly at random, or `None` if the board is full.
#[instrument(skip(board, rng))]
pub fn random_legal_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Coordinates> {
    legal_moves(board).choose(rng).copied()
}
