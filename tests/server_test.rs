//! HTTP API against an in-process router.

mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use common::{ScriptedProvider, orchestrator};
use serde::de::DeserializeOwned;
use strictly_gomoku::{Coordinates, GameView, MoveResponse, Player, router};
use tower::ServiceExt;

async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = router(orchestrator(ScriptedProvider::default()));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_game_returns_fresh_board() {
    let app = router(orchestrator(ScriptedProvider::default()));
    let response = app
        .oneshot(Request::builder().uri("/api/game").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let view: GameView = read_json(response).await;
    assert_eq!(view.active_player, Some(Player::Human));
    assert!(view.game_active);
    assert_eq!(view.status, "Your Turn");
}

#[tokio::test]
async fn test_move_then_agent_reply() {
    let game = orchestrator(ScriptedProvider::moves([Coordinates::new(0, 0)]));
    let app = router(game.clone());

    let response = app
        .clone()
        .oneshot(post_json("/api/game/move", r#"{"row": 7, "col": 7}"#))
        .await
        .unwrap();
    let reply: MoveResponse = read_json(response).await;
    assert!(reply.accepted);
    assert_eq!(reply.game.board[7][7], 1);

    game.wait_for_agent().await;

    let response = app
        .oneshot(Request::builder().uri("/api/game").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let view: GameView = read_json(response).await;
    assert_eq!(view.board[0][0], 2);
    assert_eq!(view.last_move, Some(Coordinates::new(0, 0)));
    assert_eq!(view.active_player, Some(Player::Human));
}

#[tokio::test]
async fn test_off_board_move_rejected() {
    let app = router(orchestrator(ScriptedProvider::default()));

    for body in [r#"{"row": -1, "col": 3}"#, r#"{"row": 3, "col": 15}"#] {
        let response = app.clone().oneshot(post_json("/api/game/move", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let reply: MoveResponse = read_json(response).await;
        assert!(!reply.accepted);
        assert_eq!(reply.reason.as_deref(), Some("that cell is off the board"));
        assert!(reply.game.board.iter().flatten().all(|code| *code == 0));
    }
}

#[tokio::test]
async fn test_reset_bumps_generation() {
    let game = orchestrator(ScriptedProvider::moves([Coordinates::new(0, 0)]));
    let app = router(game.clone());

    app.clone()
        .oneshot(post_json("/api/game/move", r#"{"row": 1, "col": 1}"#))
        .await
        .unwrap();
    game.wait_for_agent().await;

    let response = app.oneshot(post_json("/api/game/reset", "")).await.unwrap();
    let view: GameView = read_json(response).await;
    assert_eq!(view.generation, 1);
    assert!(view.board.iter().flatten().all(|code| *code == 0));
    assert_eq!(view.last_move, None);
}
