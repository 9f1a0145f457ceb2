//! Turn state and its transitions.
//!
//! Everything here is synchronous and pure: the async shell in
//! [`TurnOrchestrator`](super::TurnOrchestrator) decides *when* a
//! transition runs, this module decides *what* it does. Transitions replace
//! the board wholesale, so a snapshot handed to a provider is never
//! mutated underneath it.

use crate::games::gomoku::{
    Board, Coordinates, Outcome, PlaceError, Player, WinningLine, check_win, is_board_full,
    random_legal_move,
};
use crate::provider::{ProposedMove, ProviderError};
use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Monotonic game counter; bumped on every reset.
pub type Generation = u64;

/// Where the game is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the human to place a stone.
    HumanTurn,
    /// The agent is to move; `thinking` is set while its provider call is in flight.
    AgentTurn {
        /// A provider call is outstanding.
        thinking: bool,
    },
    /// The game has ended.
    GameOver(Outcome),
}

/// Why a human move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    /// The game has already ended.
    #[display("the game is over")]
    GameOver,
    /// It is the agent's turn (or the agent is thinking).
    #[display("it is the agent's turn")]
    NotYourTurn,
    /// The coordinates are off the board.
    #[display("that cell is off the board")]
    OutOfBounds,
    /// The cell already holds a stone.
    #[display("that cell is taken")]
    Occupied,
}

/// Result of evaluating a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    /// The game goes on.
    Continue,
    /// The move ended the game.
    Ended,
}

/// Result of a human move submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanMove {
    /// The stone was placed.
    Applied(TurnProgress),
    /// The submission was a no-op.
    Ignored(Rejection),
}

impl HumanMove {
    /// Returns true if the stone was placed.
    pub fn is_applied(&self) -> bool {
        matches!(self, HumanMove::Applied(_))
    }
}

/// Result of resolving a provider reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentResolution {
    /// The provider's own move was applied.
    Applied {
        /// Where the agent played.
        at: Coordinates,
        /// Whether the game continues.
        progress: TurnProgress,
    },
    /// The provider failed or answered illegally; a random legal move was applied.
    Fallback {
        /// Where the agent played.
        at: Coordinates,
        /// Whether the game continues.
        progress: TurnProgress,
    },
    /// No move was available; the game is a draw.
    NoMove,
    /// The reply belongs to an earlier game or turn and was dropped.
    Discarded,
}

/// Complete state of one game as seen by views.
///
/// Cloning is cheap: the board is shared behind an [`Arc`] and replaced,
/// never edited, when a stone is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    board: Arc<Board>,
    phase: Phase,
    last_move: Option<Coordinates>,
    generation: Generation,
}

impl GameSnapshot {
    /// Creates a fresh game: empty board, human to move.
    pub fn new(generation: Generation) -> Self {
        Self {
            board: Arc::new(Board::new()),
            phase: Phase::HumanTurn,
            last_move: None,
            generation,
        }
    }

    /// Returns the current board snapshot.
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the most recently placed stone.
    pub fn last_move(&self) -> Option<Coordinates> {
        self.last_move
    }

    /// Returns the game generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the player to move, or `None` once the game is over.
    pub fn active_player(&self) -> Option<Player> {
        match self.phase {
            Phase::HumanTurn => Some(Player::Human),
            Phase::AgentTurn { .. } => Some(Player::Agent),
            Phase::GameOver(_) => None,
        }
    }

    /// Returns true while a provider call is in flight.
    pub fn is_agent_thinking(&self) -> bool {
        matches!(self.phase, Phase::AgentTurn { thinking: true })
    }

    /// Returns true until the game has an outcome.
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::GameOver(_))
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Returns the winning line, if the game was won.
    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.outcome().and_then(Outcome::winning_line)
    }

    /// Places the human's stone at `at`.
    ///
    /// Ignored (state untouched) unless it is the human's turn and `at` is an
    /// empty cell on the board.
    #[instrument(skip(self), fields(generation = self.generation, phase = ?self.phase))]
    pub fn submit_human_move(&mut self, at: Coordinates) -> HumanMove {
        match self.phase {
            Phase::GameOver(_) => return HumanMove::Ignored(Rejection::GameOver),
            Phase::AgentTurn { .. } => return HumanMove::Ignored(Rejection::NotYourTurn),
            Phase::HumanTurn => {}
        }

        match self.place(at, Player::Human) {
            Ok(progress) => {
                if progress == TurnProgress::Continue {
                    self.phase = Phase::AgentTurn { thinking: false };
                }
                debug!(at = %at, ?progress, "Human move applied");
                HumanMove::Applied(progress)
            }
            Err(PlaceError::OutOfBounds(_)) => HumanMove::Ignored(Rejection::OutOfBounds),
            Err(PlaceError::Occupied(_)) => HumanMove::Ignored(Rejection::Occupied),
        }
    }

    /// Marks the agent as thinking and hands out the board to send to the provider.
    ///
    /// Returns `None` (and changes nothing) if `generation` is stale, it is
    /// not the agent's turn, or a call is already in flight.
    #[instrument(skip(self), fields(current = self.generation))]
    pub fn begin_agent_turn(&mut self, generation: Generation) -> Option<Arc<Board>> {
        if generation != self.generation || self.phase != (Phase::AgentTurn { thinking: false }) {
            debug!(phase = ?self.phase, "Agent turn not startable");
            return None;
        }
        self.phase = Phase::AgentTurn { thinking: true };
        Some(Arc::clone(&self.board))
    }

    /// Applies the provider's reply for a call issued in `generation`.
    ///
    /// A stale generation, or a snapshot that is not waiting on the agent,
    /// yields [`AgentResolution::Discarded`] and leaves state untouched. In
    /// every other branch the thinking flag is cleared by leaving
    /// `AgentTurn`.
    #[instrument(skip(self, reply, rng), fields(current = self.generation))]
    pub fn resolve_agent_reply<R: Rng + ?Sized>(
        &mut self,
        generation: Generation,
        reply: Result<ProposedMove, ProviderError>,
        rng: &mut R,
    ) -> AgentResolution {
        if generation != self.generation || !self.is_agent_thinking() {
            warn!(phase = ?self.phase, "Discarding stale agent reply");
            return AgentResolution::Discarded;
        }

        let (at, from_provider) = match reply {
            Ok(proposal) if proposal.is_no_move() => {
                info!("Provider reported no legal move");
                return self.finish_without_move();
            }
            Ok(proposal) => match proposal.coordinates().filter(|at| self.board.is_empty(*at)) {
                Some(at) => (Some(at), true),
                None => {
                    warn!(proposal = %proposal, "Illegal agent move, falling back to random");
                    (random_legal_move(&self.board, rng), false)
                }
            },
            Err(e) => {
                warn!(error = %e, "Agent move failed, falling back to random");
                (random_legal_move(&self.board, rng), false)
            }
        };

        let Some(at) = at else {
            return self.finish_without_move();
        };

        match self.place(at, Player::Agent) {
            Ok(progress) => {
                if progress == TurnProgress::Continue {
                    self.phase = Phase::HumanTurn;
                }
                if from_provider {
                    AgentResolution::Applied { at, progress }
                } else {
                    AgentResolution::Fallback { at, progress }
                }
            }
            Err(e) => {
                // Unreachable: `at` was checked empty above.
                error!(error = %e, "Validated agent move rejected");
                self.finish_without_move()
            }
        }
    }

    /// Writes `player`'s stone into a new board snapshot and evaluates the result.
    fn place(&mut self, at: Coordinates, player: Player) -> Result<TurnProgress, PlaceError> {
        let next = self.board.with_stone(at, player)?;
        self.board = Arc::new(next);
        self.last_move = Some(at);
        Ok(self.evaluate_outcome(at, player))
    }

    /// Ends the game if `player`'s stone at `at` won or filled the board.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn evaluate_outcome(&mut self, at: Coordinates, player: Player) -> TurnProgress {
        if let Some(line) = check_win(&self.board, at, player) {
            info!(?player, "Game won");
            self.phase = Phase::GameOver(Outcome::Win { player, line });
            return TurnProgress::Ended;
        }

        if is_board_full(&self.board) {
            info!("Board full, game drawn");
            self.phase = Phase::GameOver(Outcome::Draw);
            return TurnProgress::Ended;
        }

        TurnProgress::Continue
    }

    fn finish_without_move(&mut self) -> AgentResolution {
        self.phase = Phase::GameOver(Outcome::Draw);
        AgentResolution::NoMove
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::gomoku::{BOARD_SIZE, Cell};

    fn rng() -> rand::rngs::ThreadRng {
        rand::thread_rng()
    }

    /// Snapshot in generation 0 where the agent has just been asked to move.
    fn thinking_snapshot() -> (GameSnapshot, Arc<Board>) {
        let mut snapshot = GameSnapshot::new(0);
        snapshot.submit_human_move(Coordinates::new(7, 7));
        let board = snapshot.begin_agent_turn(0).unwrap();
        (snapshot, board)
    }

    #[test]
    fn test_fresh_snapshot() {
        let snapshot = GameSnapshot::default();
        assert_eq!(snapshot.phase(), Phase::HumanTurn);
        assert_eq!(snapshot.active_player(), Some(Player::Human));
        assert!(snapshot.is_active());
        assert!(!snapshot.is_agent_thinking());
        assert_eq!(snapshot.last_move(), None);
        assert_eq!(snapshot.outcome(), None);
    }

    #[test]
    fn test_human_move_hands_turn_to_agent() {
        let mut snapshot = GameSnapshot::new(0);
        let result = snapshot.submit_human_move(Coordinates::new(3, 4));

        assert_eq!(result, HumanMove::Applied(TurnProgress::Continue));
        assert_eq!(snapshot.phase(), Phase::AgentTurn { thinking: false });
        assert_eq!(snapshot.last_move(), Some(Coordinates::new(3, 4)));
        assert_eq!(
            snapshot.board().get(Coordinates::new(3, 4)),
            Some(Cell::Occupied(Player::Human))
        );
    }

    #[test]
    fn test_human_move_rejections_leave_state_unchanged() {
        let (thinking, _) = thinking_snapshot();
        let mut during_agent = thinking.clone();
        assert_eq!(
            during_agent.submit_human_move(Coordinates::new(0, 0)),
            HumanMove::Ignored(Rejection::NotYourTurn)
        );
        assert_eq!(during_agent, thinking);

        let mut off_board = GameSnapshot::new(0);
        let before = off_board.clone();
        assert_eq!(
            off_board.submit_human_move(Coordinates::new(BOARD_SIZE, 0)),
            HumanMove::Ignored(Rejection::OutOfBounds)
        );
        assert_eq!(off_board, before);
    }

    #[test]
    fn test_begin_agent_turn_only_once() {
        let mut snapshot = GameSnapshot::new(3);
        snapshot.submit_human_move(Coordinates::new(0, 0));

        assert!(snapshot.begin_agent_turn(2).is_none());
        assert!(snapshot.begin_agent_turn(3).is_some());
        assert!(snapshot.is_agent_thinking());
        assert!(snapshot.begin_agent_turn(3).is_none());
    }

    #[test]
    fn test_legal_reply_applied() {
        let (mut snapshot, _) = thinking_snapshot();
        let resolution = snapshot.resolve_agent_reply(0, Ok(ProposedMove::new(7, 8)), &mut rng());

        assert_eq!(
            resolution,
            AgentResolution::Applied {
                at: Coordinates::new(7, 8),
                progress: TurnProgress::Continue
            }
        );
        assert_eq!(snapshot.phase(), Phase::HumanTurn);
        assert_eq!(snapshot.last_move(), Some(Coordinates::new(7, 8)));
    }

    #[test]
    fn test_occupied_reply_falls_back_to_empty_cell() {
        let (mut snapshot, _) = thinking_snapshot();
        let resolution = snapshot.resolve_agent_reply(0, Ok(ProposedMove::new(7, 7)), &mut rng());

        let AgentResolution::Fallback { at, .. } = resolution else {
            panic!("expected fallback, got {resolution:?}");
        };
        assert_ne!(at, Coordinates::new(7, 7));
        assert_eq!(snapshot.board().get(at), Some(Cell::Occupied(Player::Agent)));
        assert!(!snapshot.is_agent_thinking());
    }

    #[test]
    fn test_sentinel_reply_is_draw() {
        let (mut snapshot, _) = thinking_snapshot();
        let resolution = snapshot.resolve_agent_reply(0, Ok(ProposedMove::NO_MOVE), &mut rng());

        assert_eq!(resolution, AgentResolution::NoMove);
        assert_eq!(snapshot.outcome(), Some(&Outcome::Draw));
        assert!(!snapshot.is_agent_thinking());
    }

    #[test]
    fn test_stale_reply_discarded() {
        let (thinking, _) = thinking_snapshot();
        let mut reset = GameSnapshot::new(thinking.generation() + 1);
        let before = reset.clone();

        let resolution = reset.resolve_agent_reply(0, Ok(ProposedMove::new(1, 1)), &mut rng());
        assert_eq!(resolution, AgentResolution::Discarded);
        assert_eq!(reset, before);
    }

    #[test]
    fn test_provider_keeps_old_board_snapshot() {
        let (mut snapshot, sent) = thinking_snapshot();
        snapshot.resolve_agent_reply(0, Ok(ProposedMove::new(0, 0)), &mut rng());

        assert!(!Arc::ptr_eq(&sent, snapshot.board()));
        assert_eq!(sent.get(Coordinates::new(0, 0)), Some(Cell::Empty));
    }
}
