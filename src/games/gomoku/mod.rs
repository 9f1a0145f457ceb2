//! Gomoku: free-style five in a row on a 15x15 board.

mod types;
pub mod rules;

pub use rules::{Direction, check_win, create_empty_board, is_board_full, legal_moves, random_legal_move};
pub use types::{BOARD_SIZE, Board, Cell, Coordinates, Outcome, PlaceError, Player, WIN_COUNT, WinningLine};
