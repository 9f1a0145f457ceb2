//! Cursor movement for keyboard navigation.

use crate::games::gomoku::{BOARD_SIZE, Coordinates};
use crossterm::event::KeyCode;

/// Moves the cursor one cell for arrow keys and `hjkl`; stops at the edges.
pub fn move_cursor(cursor: Coordinates, key: KeyCode) -> Coordinates {
    let last = BOARD_SIZE - 1;
    match key {
        KeyCode::Up | KeyCode::Char('k') => Coordinates::new(cursor.row.saturating_sub(1), cursor.col),
        KeyCode::Down | KeyCode::Char('j') => Coordinates::new((cursor.row + 1).min(last), cursor.col),
        KeyCode::Left | KeyCode::Char('h') => Coordinates::new(cursor.row, cursor.col.saturating_sub(1)),
        KeyCode::Right | KeyCode::Char('l') => Coordinates::new(cursor.row, (cursor.col + 1).min(last)),
        _ => cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_move_one_cell() {
        let center = Coordinates::new(7, 7);
        assert_eq!(move_cursor(center, KeyCode::Up), Coordinates::new(6, 7));
        assert_eq!(move_cursor(center, KeyCode::Char('j')), Coordinates::new(8, 7));
        assert_eq!(move_cursor(center, KeyCode::Left), Coordinates::new(7, 6));
        assert_eq!(move_cursor(center, KeyCode::Char('l')), Coordinates::new(7, 8));
    }

    #[test]
    fn test_cursor_clamped_at_edges() {
        let origin = Coordinates::new(0, 0);
        assert_eq!(move_cursor(origin, KeyCode::Up), origin);
        assert_eq!(move_cursor(origin, KeyCode::Left), origin);

        let corner = Coordinates::new(BOARD_SIZE - 1, BOARD_SIZE - 1);
        assert_eq!(move_cursor(corner, KeyCode::Down), corner);
        assert_eq!(move_cursor(corner, KeyCode::Right), corner);
    }

    #[test]
    fn test_other_keys_leave_cursor() {
        let at = Coordinates::new(3, 4);
        assert_eq!(move_cursor(at, KeyCode::Enter), at);
        assert_eq!(move_cursor(at, KeyCode::Char('x')), at);
    }
}
