use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::player::{Player, PlayerId, Score};

/// Number of board columns (numbered 1-30 on the physical board)
pub const BOARD_COLUMNS: u8 = 30;
/// Number of board rows (lettered A-P on the physical board)
pub const BOARD_ROWS: u8 = 16;
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Zero-based board cell. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub fn is_on_board(&self) -> bool {
        self.x < BOARD_COLUMNS && self.y < BOARD_ROWS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub player_id: PlayerId,
    pub position: Position,
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordHistoryEntry {
    pub round: u32,
    pub word: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Setup,    // Roster and round count being configured
    Guessing, // Word revealed, players placing guesses
    Scoring,  // Round average shown
    End,      // Final scores computed
}

/// Full game snapshot. This is also the persisted document, so field names
/// follow the camelCase shape stored by earlier versions of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    pub current_round: u32,
    pub current_word: String,
    pub guesses: Vec<Guess>,
    pub scores: Vec<Score>,
    pub game_phase: GamePhase,
    pub average_position: Option<Position>,
    pub words: Vec<String>,
    pub max_rounds: u32,
    pub word_history: Vec<WordHistoryEntry>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

impl GameState {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            players: Vec::new(),
            current_round: 1,
            current_word: String::new(),
            guesses: Vec::new(),
            scores: Vec::new(),
            game_phase: GamePhase::Setup,
            average_position: None,
            words: Vec::new(),
            max_rounds,
            word_history: Vec::new(),
        }
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn score_of(&self, player_id: PlayerId) -> Option<u32> {
        self.scores
            .iter()
            .find(|s| s.player_id == player_id)
            .map(|s| s.score)
    }

    pub fn guesses_for_round(&self, round: u32) -> impl Iterator<Item = &Guess> {
        self.guesses.iter().filter(move |g| g.round == round)
    }

    pub fn current_round_guesses(&self) -> Vec<&Guess> {
        self.guesses_for_round(self.current_round).collect()
    }

    pub fn current_guess_of(&self, player_id: PlayerId) -> Option<&Guess> {
        self.guesses
            .iter()
            .find(|g| g.player_id == player_id && g.round == self.current_round)
    }

    pub fn history_word(&self, round: u32) -> Option<&str> {
        self.word_history
            .iter()
            .find(|entry| entry.round == round)
            .map(|entry| entry.word.as_str())
    }
}
