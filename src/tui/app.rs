//! Application state and key handling.

use super::input::move_cursor;
use crate::games::gomoku::{BOARD_SIZE, Coordinates};
use crate::orchestrator::{GameSnapshot, HumanMove, TurnOrchestrator};
use crossterm::event::KeyCode;
use tracing::debug;

/// Main application state.
#[derive(Debug)]
pub struct App {
    orchestrator: TurnOrchestrator,
    cursor: Coordinates,
    hint: Option<String>,
    should_quit: bool,
}

impl App {
    /// Creates an app with the cursor on the center point.
    pub fn new(orchestrator: TurnOrchestrator) -> Self {
        Self {
            orchestrator,
            cursor: Coordinates::new(BOARD_SIZE / 2, BOARD_SIZE / 2),
            hint: None,
            should_quit: false,
        }
    }

    /// Current game state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.orchestrator.snapshot()
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Coordinates {
        self.cursor
    }

    /// Why the last click was ignored, if it was.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Name of the opponent.
    pub fn opponent_name(&self) -> &str {
        self.orchestrator.provider_name()
    }

    /// The user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                debug!("User quit");
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.hint = None;
                self.orchestrator.reset();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.place(),
            other => self.cursor = move_cursor(self.cursor, other),
        }
    }

    fn place(&mut self) {
        self.hint = match self.orchestrator.submit_human_move(self.cursor) {
            HumanMove::Applied(_) => None,
            HumanMove::Ignored(reason) => Some(format!("Can't move: {}", reason)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::TurnSettings;
    use crate::provider::RandomProvider;
    use std::sync::Arc;
    use std::time::Duration;

    fn app() -> App {
        let provider = Arc::new(RandomProvider::new("Random".to_string()));
        App::new(TurnOrchestrator::new(provider, TurnSettings::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_enter_places_stone_at_cursor() {
        let mut app = app();
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Enter);

        let snapshot = app.snapshot();
        assert!(!snapshot.board().is_empty(Coordinates::new(7, 6)));
        assert_eq!(app.hint(), None);
    }

    #[tokio::test]
    async fn test_second_click_while_agent_to_move_sets_hint() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char(' '));

        assert!(app.hint().is_some_and(|hint| hint.starts_with("Can't move")));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(!app.should_quit());
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
