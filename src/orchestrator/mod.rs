//! Turn orchestration: the explicit game state machine and its async driver.

mod state;
mod turn;

pub use state::{
    AgentResolution, GameSnapshot, Generation, HumanMove, Phase, Rejection, TurnProgress,
};
pub use turn::{TurnOrchestrator, TurnSettings};
