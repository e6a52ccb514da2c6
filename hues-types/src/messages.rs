use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{GamePhase, GameState, PlayerId, Position};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddPlayerRequest {
    pub name: String,
}

/// A guess either as a zero-based pair or as board notation ("B12").
/// When both are given the pair wins.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    pub player_id: PlayerId,
    #[serde(default)]
    pub x: Option<u8>,
    #[serde(default)]
    pub y: Option<u8>,
    #[serde(default)]
    pub coordinate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SetWordsRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SetWordRequest {
    pub word: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SetMaxRoundsRequest {
    pub max_rounds: u32,
}

/// Outcome of a phase operation. `applied == false` means the engine
/// declined because its precondition was not met; `state` is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransitionResponse {
    pub applied: bool,
    pub state: GameState,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GameStatusResponse {
    pub phase: GamePhase,
    pub round: u32,
    pub max_rounds: u32,
    pub current_word: String,
    pub all_players_guessed: bool,
    pub result_quorum_met: bool,
    pub average_position: Option<Position>,
}

/// One recorded guess, resolved against the roster and word history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRow {
    pub round: u32,
    pub word: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub player_color: String,
    pub coordinate: String,
    pub position: Position,
}

/// Selection history table plus how many played rounds lack a recorded word
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectionsResponse {
    pub rows: Vec<SelectionRow>,
    pub missing_words: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Single-player variant: what the player sends to the host
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub clue_id: String,
    pub word: String,
    pub clue_category: String,
    pub coordinate: String,
}

/// Single-player variant: the document POSTed to the remote collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClueSubmission {
    pub user_id: Uuid,
    pub clue_id: String,
    pub word: String,
    pub clue_category: String,
    pub coordinate: String,
    pub timestamp: String, // ISO 8601 string
}
