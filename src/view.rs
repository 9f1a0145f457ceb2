//! What a view needs to render one frame.

use crate::games::gomoku::{Coordinates, Outcome, Player};
use crate::orchestrator::{GameSnapshot, Phase};
use serde::{Deserialize, Serialize};

/// Serializable picture of a [`GameSnapshot`] for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Cell codes, row-major: 0 = empty, 1 = human (black), 2 = agent (white).
    pub board: Vec<Vec<u8>>,
    /// Player to move; `None` once the game is over.
    pub active_player: Option<Player>,
    /// A provider call is in flight.
    pub agent_thinking: bool,
    /// The game has no outcome yet.
    pub game_active: bool,
    /// Winner, if any.
    pub winner: Option<Player>,
    /// The game ended in a draw.
    pub draw: bool,
    /// Stones that completed five in a row.
    pub winning_line: Option<Vec<Coordinates>>,
    /// Most recently placed stone.
    pub last_move: Option<Coordinates>,
    /// Game counter, bumped on every reset.
    pub generation: u64,
    /// Human-readable status line.
    pub status: String,
}

impl From<&GameSnapshot> for GameView {
    fn from(snapshot: &GameSnapshot) -> Self {
        let outcome = snapshot.outcome();
        Self {
            board: snapshot
                .board()
                .rows()
                .iter()
                .map(|row| row.iter().map(|cell| cell.code()).collect())
                .collect(),
            active_player: snapshot.active_player(),
            agent_thinking: snapshot.is_agent_thinking(),
            game_active: snapshot.is_active(),
            winner: outcome.and_then(Outcome::winner),
            draw: matches!(outcome, Some(Outcome::Draw)),
            winning_line: snapshot.winning_line().map(|line| line.to_vec()),
            last_move: snapshot.last_move(),
            generation: snapshot.generation(),
            status: status_message(snapshot).to_string(),
        }
    }
}

/// Status line for the current phase.
pub fn status_message(snapshot: &GameSnapshot) -> &'static str {
    match snapshot.phase() {
        Phase::HumanTurn => "Your Turn",
        Phase::AgentTurn { thinking: true } => "AI Thinking...",
        Phase::AgentTurn { thinking: false } => "AI to move",
        Phase::GameOver(Outcome::Draw) => "It's a Draw!",
        Phase::GameOver(Outcome::Win { player: Player::Human, .. }) => "You Won!",
        Phase::GameOver(Outcome::Win { player: Player::Agent, .. }) => "AI Won",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::gomoku::BOARD_SIZE;

    #[test]
    fn test_view_of_fresh_game() {
        let view = GameView::from(&GameSnapshot::new(4));
        assert_eq!(view.board.len(), BOARD_SIZE);
        assert!(view.board.iter().all(|row| row.len() == BOARD_SIZE && row.iter().all(|c| *c == 0)));
        assert_eq!(view.active_player, Some(Player::Human));
        assert!(view.game_active);
        assert!(!view.agent_thinking);
        assert_eq!(view.generation, 4);
        assert_eq!(view.status, "Your Turn");
    }

    #[test]
    fn test_view_after_human_move() {
        let mut snapshot = GameSnapshot::new(0);
        snapshot.submit_human_move(Coordinates::new(1, 2));
        let view = GameView::from(&snapshot);

        assert_eq!(view.board[1][2], 1);
        assert_eq!(view.last_move, Some(Coordinates::new(1, 2)));
        assert_eq!(view.active_player, Some(Player::Agent));
        assert_eq!(view.status, "AI to move");
    }
}
