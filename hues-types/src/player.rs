use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub type PlayerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String, // CSS hex color, e.g. "#FF5733"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub player_id: PlayerId,
    pub score: u32,
}

/// A player joined with their current score, as shown on the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Standing {
    pub player: Player,
    pub score: u32,
}
