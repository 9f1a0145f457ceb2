//! Move provider backed by an LLM chat completion.

use super::{MoveProvider, ProposedMove, ProviderError};
use crate::games::gomoku::{BOARD_SIZE, Board};
use crate::llm_client::LlmClient;
use tracing::{debug, info, instrument};

/// System instruction sent with every move request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a grandmaster Gomoku (Five-in-a-Row) player.
You are playing White (Player 2).
The opponent is Black (Player 1).
The board is 15x15.
0 = Empty, 1 = Black, 2 = White.

Your Goal: Win the game.
Rules:
1. Connect 5 stones of your color (2) in a row horizontally, vertically, or diagonally.
2. Block the opponent (1) if they are about to connect 5.
3. Prioritize winning over blocking if you have a guaranteed win.
4. Do not make illegal moves (placing on top of non-zero cells).

Return ONLY the JSON object with coordinates: {\"row\": number, \"col\": number}.";

/// Builds the user prompt for `board`.
pub fn move_prompt(board: &Board) -> String {
    format!(
        "Current Board State ({n}x{n}):\n{board}\n\nMake your move as White (2).",
        n = BOARD_SIZE,
        board = board.display()
    )
}

/// JSON schema for the `{"row", "col"}` answer, for vendors that enforce one.
pub fn move_schema() -> serde_json::Value {
    let max = BOARD_SIZE - 1;
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "row": { "type": "INTEGER", "description": format!("Row index (0-{max})") },
            "col": { "type": "INTEGER", "description": format!("Column index (0-{max})") },
        },
        "required": ["row", "col"],
    })
}

/// Extracts a `{"row", "col"}` object from model output.
///
/// Tolerates Markdown code fences and prose around the object by parsing
/// the outermost `{...}` span.
///
/// # Errors
///
/// Returns [`ProviderError`] if no object is present or it does not parse.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_move(text: &str) -> Result<ProposedMove, ProviderError> {
    let start = text
        .find('{')
        .ok_or_else(|| ProviderError::new(format!("No JSON object in response: {}", text)))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| ProviderError::new(format!("Unterminated JSON object in response: {}", text)))?;

    let proposal: ProposedMove = serde_json::from_str(&text[start..=end])?;
    debug!(proposal = %proposal, "Parsed move from response");
    Ok(proposal)
}

/// Asks an LLM for the agent's move.
///
/// Performs no validation of its own; wrap in
/// [`GuardedProvider`](super::GuardedProvider) to get the fallback policy.
#[derive(Debug, Clone)]
pub struct LlmMoveProvider {
    name: String,
    client: LlmClient,
}

impl LlmMoveProvider {
    /// Creates a provider named `name` that uses `client`.
    #[instrument(skip(client), fields(name = %name))]
    pub fn new(name: String, client: LlmClient) -> Self {
        info!("Creating LLM move provider");
        Self { name, client }
    }
}

#[async_trait::async_trait]
impl MoveProvider for LlmMoveProvider {
    #[instrument(skip(self, board), fields(provider = %self.name))]
    async fn request_move(&self, board: &Board) -> Result<ProposedMove, ProviderError> {
        let prompt = move_prompt(board);
        let response = self
            .client
            .generate_json(SYSTEM_INSTRUCTION, &prompt, &move_schema())
            .await?;
        parse_move(&response)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
