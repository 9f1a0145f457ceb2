//! HTTP surface for a running game.
//!
//! A second view over the same [`TurnOrchestrator`] the terminal UI drives:
//! clients poll `GET /api/game` and post clicks to `POST /api/game/move`.

use crate::games::gomoku::Coordinates;
use crate::orchestrator::{HumanMove, Rejection, TurnOrchestrator};
use crate::view::GameView;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// A click on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row, 0-based from the top.
    pub row: i64,
    /// Column, 0-based from the left.
    pub col: i64,
}

/// Result of a click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// The stone was placed.
    pub accepted: bool,
    /// Why the click was ignored, if it was.
    pub reason: Option<String>,
    /// Game state after the click.
    pub game: GameView,
}

/// Builds the router for `orchestrator`.
pub fn router(orchestrator: TurnOrchestrator) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/game", get(get_game))
        .route("/api/game/move", post(make_move))
        .route("/api/game/reset", post(reset_game))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(orchestrator)
}

/// Serves `orchestrator` on `host:port` until the process exits.
#[instrument(skip(orchestrator))]
pub async fn serve(host: String, port: u16, orchestrator: TurnOrchestrator) -> anyhow::Result<()> {
    let app = router(orchestrator);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn get_game(State(orchestrator): State<TurnOrchestrator>) -> Json<GameView> {
    Json(GameView::from(&orchestrator.snapshot()))
}

#[instrument(skip(orchestrator), fields(row = request.row, col = request.col))]
async fn make_move(
    State(orchestrator): State<TurnOrchestrator>,
    Json(request): Json<MoveRequest>,
) -> Json<MoveResponse> {
    let outcome = match (usize::try_from(request.row), usize::try_from(request.col)) {
        (Ok(row), Ok(col)) => orchestrator.submit_human_move(Coordinates::new(row, col)),
        _ => HumanMove::Ignored(Rejection::OutOfBounds),
    };

    let reason = match outcome {
        HumanMove::Applied(_) => None,
        HumanMove::Ignored(rejection) => Some(rejection.to_string()),
    };

    Json(MoveResponse {
        accepted: outcome.is_applied(),
        reason,
        game: GameView::from(&orchestrator.snapshot()),
    })
}

#[instrument(skip(orchestrator))]
async fn reset_game(State(orchestrator): State<TurnOrchestrator>) -> Json<GameView> {
    orchestrator.reset();
    Json(GameView::from(&orchestrator.snapshot()))
}
