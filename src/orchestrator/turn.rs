//! Turn orchestration between the human and the move provider.

use super::state::{AgentResolution, GameSnapshot, Generation, HumanMove, Phase, Rejection};
use crate::agent_config::AgentConfig;
use crate::games::gomoku::{Board, Coordinates};
use crate::provider::{MoveProvider, ProposedMove, ProviderError};
use derive_new::new;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Pacing knobs for the agent's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct TurnSettings {
    /// Pause between the human's move and the provider call.
    pub think_delay: Duration,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            think_delay: Duration::from_millis(500),
        }
    }
}

impl From<&AgentConfig> for TurnSettings {
    fn from(config: &AgentConfig) -> Self {
        Self::new(config.think_delay())
    }
}

/// Owns the authoritative game state and sequences turns.
///
/// State lives in a [`watch`] channel: every transition replaces the
/// snapshot and wakes subscribed views. The only suspending step is the
/// provider call, which runs on a spawned task stamped with the game
/// generation current when it was issued; a reply whose stamp no longer
/// matches is dropped, so a reset mid-call can never leak a stale stone
/// into the new game.
///
/// Cloning is cheap and yields a handle to the same game.
#[derive(Clone)]
pub struct TurnOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<GameSnapshot>,
    provider: Arc<dyn MoveProvider>,
    settings: TurnSettings,
    agent_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("provider", &self.inner.provider.name())
            .field("settings", &self.inner.settings)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl TurnOrchestrator {
    /// Creates an orchestrator with a fresh game.
    #[instrument(skip(provider), fields(provider = %provider.name()))]
    pub fn new(provider: Arc<dyn MoveProvider>, settings: TurnSettings) -> Self {
        info!("Creating turn orchestrator");
        let (state, _) = watch::channel(GameSnapshot::new(0));
        Self {
            inner: Arc::new(Inner {
                state,
                provider,
                settings,
                agent_task: Mutex::new(None),
            }),
        }
    }

    /// Subscribes to state changes; the receiver always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.inner.state.subscribe()
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Returns the move provider's display name.
    pub fn provider_name(&self) -> &str {
        self.inner.provider.name()
    }

    /// Handles a click on `at`.
    ///
    /// Illegal clicks are ignored without touching state. If the move hands
    /// the turn to the agent, the agent turn is started in the background.
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(self), fields(at = %at))]
    pub fn submit_human_move(&self, at: Coordinates) -> HumanMove {
        let mut result = None;
        let mut agent_generation = None;

        self.inner.state.send_if_modified(|snapshot| {
            let outcome = snapshot.submit_human_move(at);
            if outcome.is_applied() && snapshot.phase() == (Phase::AgentTurn { thinking: false }) {
                agent_generation = Some(snapshot.generation());
            }
            result = Some(outcome);
            outcome.is_applied()
        });

        if let Some(generation) = agent_generation {
            self.spawn_agent_turn(generation);
        }

        let result = result.unwrap_or(HumanMove::Ignored(Rejection::GameOver));
        if let HumanMove::Ignored(reason) = result {
            debug!(%reason, "Human move ignored");
        }
        result
    }

    /// Starts a new game. Callable at any time, including mid agent turn.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.inner.state.send_modify(|snapshot| {
            let generation = snapshot.generation() + 1;
            info!(generation, "Resetting game");
            *snapshot = GameSnapshot::new(generation);
        });
    }

    /// Waits for the most recently spawned agent turn to finish.
    pub async fn wait_for_agent(&self) {
        let handle = match self.inner.agent_task.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Agent turn task failed");
        }
    }

    fn spawn_agent_turn(&self, generation: Generation) {
        let this = self.clone();
        let handle = tokio::spawn(async move { this.run_agent_turn(generation).await });

        let previous = match self.inner.agent_task.lock() {
            Ok(mut slot) => slot.replace(handle),
            Err(poisoned) => poisoned.into_inner().replace(handle),
        };
        if previous.is_some_and(|task| !task.is_finished()) {
            debug!("Previous agent turn still running; its reply will be discarded if stale");
        }
    }

    /// Runs one agent turn for `generation`.
    #[instrument(skip(self), fields(provider = %self.inner.provider.name()))]
    async fn run_agent_turn(self, generation: Generation) {
        let delay = self.inner.settings.think_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut board = None;
        self.inner.state.send_if_modified(|snapshot| {
            board = snapshot.begin_agent_turn(generation);
            board.is_some()
        });
        let Some(board) = board else {
            debug!("Agent turn superseded before it began");
            return;
        };

        info!("Agent thinking");
        let reply = self.request_move(board).await;

        let mut resolution = AgentResolution::Discarded;
        self.inner.state.send_if_modified(|snapshot| {
            resolution = snapshot.resolve_agent_reply(generation, reply, &mut rand::thread_rng());
            resolution != AgentResolution::Discarded
        });

        match resolution {
            AgentResolution::Applied { at, progress } => info!(at = %at, ?progress, "Agent moved"),
            AgentResolution::Fallback { at, progress } => {
                info!(at = %at, ?progress, "Agent moved (fallback)")
            }
            AgentResolution::NoMove => info!("Agent had no move; draw"),
            AgentResolution::Discarded => debug!("Agent reply discarded"),
        }
    }

    /// Calls the provider on its own task so a panic there is reported as a
    /// failure instead of leaving the agent thinking forever.
    async fn request_move(&self, board: Arc<Board>) -> Result<ProposedMove, ProviderError> {
        let provider = Arc::clone(&self.inner.provider);
        let call = tokio::spawn(async move { provider.request_move(&board).await });
        match call.await {
            Ok(reply) => reply,
            Err(e) => Err(ProviderError::new(format!("Move provider task failed: {}", e))),
        }
    }
}
