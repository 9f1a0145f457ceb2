//! Core domain types for gomoku.

use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 15;

/// Number of contiguous stones needed to win.
pub const WIN_COUNT: usize = 5;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    /// The human at the keyboard or browser (plays black, moves first).
    Human,
    /// The remote move provider (plays white).
    Agent,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Agent,
            Player::Agent => Player::Human,
        }
    }

    /// Stone colour label used in prompts and the UI.
    pub fn stone(self) -> &'static str {
        match self {
            Player::Human => "Black",
            Player::Agent => "White",
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player's stone.
    Occupied(Player),
}

impl Cell {
    /// Numeric code used when serializing the board for a model:
    /// 0 = empty, 1 = black (human), 2 = white (agent).
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(Player::Human) => 1,
            Cell::Occupied(Player::Agent) => 2,
        }
    }
}

/// A (row, column) pair, 0-indexed.
///
/// Coordinates are not bounds-checked on construction; every board
/// accessor treats out-of-range coordinates as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Coordinates {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Coordinates {
    /// Returns true if both indices lie in `[0, BOARD_SIZE)`.
    pub fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Moves `steps` times along `(d_row, d_col)`.
    ///
    /// Returns `None` as soon as the target would leave the board, so a
    /// walk can never index out of bounds.
    pub fn offset(self, d_row: isize, d_col: isize, steps: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row.checked_mul(steps)?)?;
        let col = self.col.checked_add_signed(d_col.checked_mul(steps)?)?;
        let target = Self { row, col };
        target.in_bounds().then_some(target)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Errors that can occur when placing a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlaceError {
    /// Coordinates fall outside the board.
    #[display("{_0} is outside the board")]
    OutOfBounds(#[error(not(source))] Coordinates),
    /// Cell is already occupied.
    #[display("{_0} is already occupied")]
    Occupied(#[error(not(source))] Coordinates),
}

/// 15x15 gomoku board.
///
/// Boards are treated as immutable snapshots: placing a stone produces a
/// new board and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order.
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Gets the cell at the given coordinates, or `None` if out of bounds.
    pub fn get(&self, at: Coordinates) -> Option<Cell> {
        self.cells.get(at.row)?.get(at.col).copied()
    }

    /// Checks if the cell at `at` exists and is empty.
    pub fn is_empty(&self, at: Coordinates) -> bool {
        matches!(self.get(at), Some(Cell::Empty))
    }

    /// Returns a copy of this board with `player`'s stone at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError`] if `at` is off the board or already taken.
    #[instrument(skip(self), fields(at = %at, player = ?player))]
    pub fn with_stone(&self, at: Coordinates, player: Player) -> Result<Board, PlaceError> {
        match self.get(at) {
            None => Err(PlaceError::OutOfBounds(at)),
            Some(Cell::Occupied(_)) => Err(PlaceError::Occupied(at)),
            Some(Cell::Empty) => {
                let mut next = self.clone();
                next.cells[at.row][at.col] = Cell::Occupied(player);
                Ok(next)
            }
        }
    }

    /// Returns the rows of the board, top to bottom.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Iterates over every cell with its coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinates, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (Coordinates::new(row, col), *cell))
        })
    }

    /// Counts stones per player as `(human, agent)`.
    pub fn stone_count(&self) -> (usize, usize) {
        self.cells().fold((0, 0), |(human, agent), (_, cell)| match cell {
            Cell::Occupied(Player::Human) => (human + 1, agent),
            Cell::Occupied(Player::Agent) => (human, agent + 1),
            Cell::Empty => (human, agent),
        })
    }

    /// Formats the board as comma-separated cell codes, one row per line.
    pub fn display(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.code().to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Exactly [`WIN_COUNT`] contiguous, colinear coordinates.
pub type WinningLine = [Coordinates; WIN_COUNT];

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A player connected five.
    Win {
        /// The winner.
        player: Player,
        /// The five stones that won.
        line: WinningLine,
    },
    /// Board filled with no winner, or no move was available.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Win { player, .. } => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn winning_line(&self) -> Option<&WinningLine> {
        match self {
            Outcome::Win { line, .. } => Some(line),
            Outcome::Draw => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win { player, .. } => write!(f, "{} ({:?}) wins", player.stone(), player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_stone_leaves_original_untouched() {
        let board = Board::new();
        let at = Coordinates::new(7, 7);
        let next = board.with_stone(at, Player::Human).unwrap();

        assert_eq!(board.get(at), Some(Cell::Empty));
        assert_eq!(next.get(at), Some(Cell::Occupied(Player::Human)));
    }

    #[test]
    fn test_with_stone_rejects_occupied_and_out_of_bounds() {
        let board = Board::new()
            .with_stone(Coordinates::new(0, 0), Player::Agent)
            .unwrap();

        assert_eq!(
            board.with_stone(Coordinates::new(0, 0), Player::Human),
            Err(PlaceError::Occupied(Coordinates::new(0, 0)))
        );
        assert_eq!(
            board.with_stone(Coordinates::new(BOARD_SIZE, 3), Player::Human),
            Err(PlaceError::OutOfBounds(Coordinates::new(BOARD_SIZE, 3)))
        );
    }

    #[test]
    fn test_offset_stops_at_edges() {
        let corner = Coordinates::new(0, 0);
        assert_eq!(corner.offset(-1, 0, 1), None);
        assert_eq!(corner.offset(0, 1, 4), Some(Coordinates::new(0, 4)));

        let far = Coordinates::new(BOARD_SIZE - 1, BOARD_SIZE - 1);
        assert_eq!(far.offset(1, 1, 1), None);
        assert_eq!(far.offset(1, -1, -2), None);
        assert_eq!(far.offset(1, 1, -2), Some(Coordinates::new(12, 12)));
    }

    #[test]
    fn test_display_uses_cell_codes() {
        let board = Board::new()
            .with_stone(Coordinates::new(0, 0), Player::Human)
            .unwrap()
            .with_stone(Coordinates::new(0, 1), Player::Agent)
            .unwrap();

        let text = board.display();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("1,2,0"));
        assert_eq!(text.lines().count(), BOARD_SIZE);
    }

    #[test]
    fn test_stone_count() {
        let board = Board::new()
            .with_stone(Coordinates::new(3, 3), Player::Human)
            .unwrap()
            .with_stone(Coordinates::new(3, 4), Player::Agent)
            .unwrap()
            .with_stone(Coordinates::new(3, 5), Player::Human)
            .unwrap();
        assert_eq!(board.stone_count(), (2, 1));
    }
}
