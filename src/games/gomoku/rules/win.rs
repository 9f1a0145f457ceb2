//! Win detection logic for gomoku.

use super::super::{Board, Cell, Coordinates, Player, WIN_COUNT, WinningLine};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

/// A line direction through a cell.
///
/// Declaration order is the order [`check_win`] scans in, which keeps the
/// reported line deterministic when several lines complete at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    /// Along a row.
    Horizontal,
    /// Along a column.
    Vertical,
    /// Top-left to bottom-right.
    DiagonalDownRight,
    /// Top-right to bottom-left.
    DiagonalDownLeft,
}

impl Direction {
    /// Returns `(d_row, d_col)` for one step forward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }
}

/// Checks whether the stone just placed at `last_move` completes a line.
///
/// Each direction is walked forward and backward from the anchor, at most
/// `WIN_COUNT - 1` cells each way, stopping at the first cell that is not
/// `player`'s. The anchor itself always counts as one of
/// `player`'s stones.
///
/// Returns the first direction (in [`Direction`] order) whose run reaches
/// [`WIN_COUNT`]. The returned line holds exactly `WIN_COUNT` cells ordered
/// along the direction vector, starting at the far end of the backward
/// walk; for runs longer than five this trims to the first five cells in
/// that order, and the window always contains the anchor.
#[instrument(skip(board), fields(last_move = %last_move, player = ?player))]
pub fn check_win(board: &Board, last_move: Coordinates, player: Player) -> Option<WinningLine> {
    let line = Direction::iter().find_map(|direction| line_through(board, last_move, player, direction));
    if let Some(line) = &line {
        debug!(start = %line[0], end = %line[WIN_COUNT - 1], "Winning line found");
    }
    line
}

/// Returns the winning line through `anchor` in one direction, if any.
fn line_through(
    board: &Board,
    anchor: Coordinates,
    player: Player,
    direction: Direction,
) -> Option<WinningLine> {
    let forward = run_length(board, anchor, player, direction, 1);
    let backward = run_length(board, anchor, player, direction, -1);

    if 1 + forward + backward < WIN_COUNT {
        return None;
    }

    let (d_row, d_col) = direction.delta();
    let start = anchor.offset(d_row, d_col, -(backward as isize))?;
    let mut line = [start; WIN_COUNT];
    for (step, slot) in line.iter_mut().enumerate() {
        *slot = start.offset(d_row, d_col, step as isize)?;
    }
    Some(line)
}

/// Counts `player`'s stones adjacent to `anchor`, walking in `sign` (+1 or -1)
/// along `direction`. The walk is capped at `WIN_COUNT - 1` cells.
fn run_length(
    board: &Board,
    anchor: Coordinates,
    player: Player,
    direction: Direction,
    sign: isize,
) -> usize {
    let (d_row, d_col) = direction.delta();
    (1..WIN_COUNT as isize)
        .take_while(|&step| {
            anchor
                .offset(d_row, d_col, sign * step)
                .and_then(|at| board.get(at))
                == Some(Cell::Occupied(player))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::gomoku::BOARD_SIZE;

    fn place(board: Board, stones: &[(usize, usize)], player: Player) -> Board {
        stones.iter().fold(board, |board, &(row, col)| {
            board.with_stone(Coordinates::new(row, col), player).unwrap()
        })
    }

    #[test]
    fn test_no_winner_single_stone() {
        let board = place(Board::new(), &[(7, 7)], Player::Human);
        assert_eq!(check_win(&board, Coordinates::new(7, 7), Player::Human), None);
    }

    #[test]
    fn test_winner_vertical() {
        let stones = [(2, 4), (3, 4), (4, 4), (5, 4), (6, 4)];
        let board = place(Board::new(), &stones, Player::Agent);

        let line = check_win(&board, Coordinates::new(4, 4), Player::Agent).unwrap();
        let expected = stones.map(|(row, col)| Coordinates::new(row, col));
        assert_eq!(line, expected);
    }

    #[test]
    fn test_winner_anti_diagonal_from_edge() {
        // Runs from the top-right corner down-left.
        let stones = [(0, 14), (1, 13), (2, 12), (3, 11), (4, 10)];
        let board = place(Board::new(), &stones, Player::Human);

        let line = check_win(&board, Coordinates::new(0, BOARD_SIZE - 1), Player::Human).unwrap();
        assert_eq!(line[0], Coordinates::new(0, 14));
        assert_eq!(line[4], Coordinates::new(4, 10));
    }

    #[test]
    fn test_opponent_stone_breaks_run() {
        let board = place(Board::new(), &[(7, 3), (7, 4), (7, 6), (7, 7)], Player::Human);
        let board = place(board, &[(7, 5)], Player::Agent);
        assert_eq!(check_win(&board, Coordinates::new(7, 7), Player::Human), None);
    }

    #[test]
    fn test_long_run_trims_to_five_containing_anchor() {
        // Six in a row, anchor at the right end.
        let stones = [(9, 2), (9, 3), (9, 4), (9, 5), (9, 6), (9, 7)];
        let board = place(Board::new(), &stones, Player::Human);

        let line = check_win(&board, Coordinates::new(9, 7), Player::Human).unwrap();
        assert_eq!(line[0], Coordinates::new(9, 3));
        assert_eq!(line[4], Coordinates::new(9, 7));
    }

    #[test]
    fn test_horizontal_preferred_when_two_lines_complete() {
        let row = [(5, 1), (5, 2), (5, 3), (5, 4), (5, 5)];
        let col = [(1, 5), (2, 5), (3, 5), (4, 5)];
        let board = place(place(Board::new(), &row, Player::Agent), &col, Player::Agent);

        let line = check_win(&board, Coordinates::new(5, 5), Player::Agent).unwrap();
        assert!(line.iter().all(|at| at.row == 5));
    }
}
