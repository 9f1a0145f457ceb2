//! Game rules for gomoku.
//!
//! Pure functions over a board snapshot: no I/O and no mutable state.
//! Rules are separated from board storage so the turn orchestrator can
//! evaluate any snapshot it holds.

pub mod draw;
pub mod moves;
pub mod win;

pub use draw::is_board_full;
pub use moves::{create_empty_board, legal_moves, random_legal_move};
pub use win::{Direction, check_win};
