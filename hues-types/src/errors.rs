use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("Player {player_id} not found")]
    PlayerNotFound { player_id: PlayerId },
    #[error("Player name must not be empty")]
    InvalidPlayerName,
    #[error("Position ({x}, {y}) is outside the board")]
    PositionOutOfBounds { x: u8, y: u8 },
    #[error("Invalid coordinate '{input}': expected A-P followed by 1-30")]
    InvalidCoordinate { input: String },
    #[error("Invalid number of rounds: {max_rounds}")]
    InvalidMaxRounds { max_rounds: u32 },
}
