use hues_types::{
    DEFAULT_MAX_ROUNDS, GameError, GamePhase, GameState, Guess, Player, PlayerId, Position,
    Score, Standing, WordHistoryEntry,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::{FinalQuorum, GameEvent, GameEventBus, GameEventHandler, ScoringEngine, draw_word};

pub const PLAYER_COLORS: [&str; 12] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A8", "#A833FF", "#33FFF5", "#FF8C33", "#BCFF33",
    "#FFD133", "#FF33D1", "#33FFAE", "#3390FF",
];

/// Engine settings that are not part of the persisted game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub default_max_rounds: u32,
    pub final_quorum: FinalQuorum,
    /// Fixed seed for word and color draws; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            default_max_rounds: DEFAULT_MAX_ROUNDS,
            final_quorum: FinalQuorum::default(),
            seed: None,
        }
    }
}

impl GameRules {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// The round engine. Owns the game state and is the only thing that mutates it.
///
/// Phase operations never fail: when their precondition does not hold they
/// leave the state untouched and report that nothing was applied. Only
/// invalid input (unknown player, off-board position, blank name) is an error.
#[derive(Debug)]
pub struct Game {
    state: GameState,
    rules: GameRules,
    next_player_id: PlayerId,
    rng: StdRng,
    event_bus: GameEventBus,
}

impl Game {
    pub fn new(rules: GameRules) -> Self {
        Self {
            state: GameState::new(rules.default_max_rounds),
            rules,
            next_player_id: 1,
            rng: rules.rng(),
            event_bus: GameEventBus::new(),
        }
    }

    /// Rebuild an engine from a persisted snapshot
    pub fn restore(mut state: GameState, rules: GameRules) -> Self {
        if state.max_rounds == 0 {
            state.max_rounds = rules.default_max_rounds;
        }
        if state.current_round == 0 {
            state.current_round = 1;
        }
        for player in &state.players {
            if !state.scores.iter().any(|s| s.player_id == player.id) {
                state.scores.push(Score {
                    player_id: player.id,
                    score: 0,
                });
            }
        }

        // Ids stay unique even against guesses of players removed before the save
        let highest_id = state
            .players
            .iter()
            .map(|p| p.id)
            .chain(state.guesses.iter().map(|g| g.player_id))
            .max()
            .unwrap_or(0);

        info!(
            "Restored game in {:?} phase, round {}/{} with {} players",
            state.game_phase,
            state.current_round,
            state.max_rounds,
            state.players.len()
        );

        Self {
            state,
            rules,
            next_player_id: highest_id + 1,
            rng: rules.rng(),
            event_bus: GameEventBus::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidPlayerName);
        }

        let id = self.next_player_id;
        self.next_player_id += 1;

        let color = PLAYER_COLORS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(PLAYER_COLORS[0])
            .to_string();

        let player = Player {
            id,
            name: name.to_string(),
            color,
        };

        self.state.players.push(player.clone());
        self.state.scores.push(Score {
            player_id: id,
            score: 0,
        });

        info!("Player {} joined as '{}'", id, player.name);
        self.event_bus.publish(GameEvent::PlayerJoined { player });
        Ok(id)
    }

    /// Drop a player and their score. Their guesses stay recorded.
    pub fn remove_player(&mut self, player_id: PlayerId) -> bool {
        let before = self.state.players.len();
        self.state.players.retain(|p| p.id != player_id);
        self.state.scores.retain(|s| s.player_id != player_id);

        let removed = self.state.players.len() != before;
        if removed {
            info!("Player {} removed", player_id);
            self.event_bus.publish(GameEvent::PlayerRemoved { player_id });
        }
        removed
    }

    /// Record a guess for the current round, replacing the player's earlier
    /// guess for the same round if there is one.
    pub fn submit_guess(&mut self, player_id: PlayerId, position: Position) -> Result<(), GameError> {
        if self.state.player(player_id).is_none() {
            return Err(GameError::PlayerNotFound { player_id });
        }
        if !position.is_on_board() {
            return Err(GameError::PositionOutOfBounds {
                x: position.x,
                y: position.y,
            });
        }

        let round = self.state.current_round;
        let existing = self
            .state
            .guesses
            .iter_mut()
            .find(|g| g.player_id == player_id && g.round == round);

        let replaced = match existing {
            Some(guess) => {
                guess.position = position;
                true
            }
            None => {
                self.state.guesses.push(Guess {
                    player_id,
                    position,
                    round,
                });
                false
            }
        };

        debug!(
            "Player {} guessed ({}, {}) in round {}",
            player_id, position.x, position.y, round
        );
        self.event_bus.publish(GameEvent::GuessSubmitted {
            player_id,
            position,
            round,
            replaced,
        });
        Ok(())
    }

    /// Every player on the roster has a guess for the current round
    pub fn all_players_guessed(&self) -> bool {
        !self.state.players.is_empty()
            && self
                .state
                .players
                .iter()
                .all(|p| self.state.current_guess_of(p.id).is_some())
    }

    /// Enough guesses exist this round to display an average
    pub fn result_quorum_met(&self) -> bool {
        // Guesses of players removed mid-round still count toward the quorum
        let guesses = self.state.guesses_for_round(self.state.current_round).count();
        guesses >= ScoringEngine::live_quorum(self.state.players.len())
    }

    /// `setup -> guessing`
    pub fn start(&mut self) -> bool {
        if self.state.game_phase != GamePhase::Setup {
            warn!("Cannot start game from {:?} phase", self.state.game_phase);
            return false;
        }
        if self.state.players.is_empty() {
            warn!("Cannot start game without players");
            return false;
        }

        if self.state.current_word.is_empty() {
            self.state.current_word = draw_word(&self.state.words, &mut self.rng);
        }
        if !self.state.current_word.is_empty()
            && self.state.history_word(self.state.current_round).is_none()
        {
            self.state.word_history.push(WordHistoryEntry {
                round: self.state.current_round,
                word: self.state.current_word.clone(),
            });
        }

        self.state.game_phase = GamePhase::Guessing;
        info!(
            "Game started with {} players, word '{}'",
            self.state.players.len(),
            self.state.current_word
        );
        self.event_bus.publish(GameEvent::GameStarted {
            word: self.state.current_word.clone(),
        });
        true
    }

    /// `guessing -> scoring`: compute and expose the round average
    pub fn compute_results(&mut self) -> Option<Position> {
        if self.state.game_phase != GamePhase::Guessing {
            warn!("Cannot compute results from {:?} phase", self.state.game_phase);
            return None;
        }
        if !self.result_quorum_met() {
            warn!(
                "Not enough guesses to compute the average for round {}",
                self.state.current_round
            );
            return None;
        }

        let positions: Vec<Position> = self
            .state
            .guesses_for_round(self.state.current_round)
            .map(|g| g.position)
            .collect();
        let average = ScoringEngine::average_position(&positions)?;

        debug!("Average position for round {}: {:?}", self.state.current_round, average);
        self.state.average_position = Some(average);
        self.state.game_phase = GamePhase::Scoring;

        info!("Round {} moved to scoring", self.state.current_round);
        self.event_bus.publish(GameEvent::RoundScored {
            round: self.state.current_round,
            average,
        });
        Some(average)
    }

    /// `scoring -> guessing` while rounds remain, otherwise `scoring -> end`
    pub fn advance_round(&mut self) -> bool {
        if self.state.game_phase != GamePhase::Scoring {
            warn!("Cannot advance round from {:?} phase", self.state.game_phase);
            return false;
        }
        if self.state.current_round >= self.state.max_rounds {
            return self.finalize();
        }

        self.record_current_word();

        self.state.current_round += 1;
        self.state.current_word = draw_word(&self.state.words, &mut self.rng);
        self.state.average_position = None;
        self.state.game_phase = GamePhase::Guessing;

        info!(
            "Round {}/{} started with word '{}'",
            self.state.current_round, self.state.max_rounds, self.state.current_word
        );
        self.event_bus.publish(GameEvent::RoundStarted {
            round: self.state.current_round,
            word: self.state.current_word.clone(),
        });
        true
    }

    /// Recompute all scores over every round played and end the game.
    /// Re-running it in the `end` phase yields the same scores.
    pub fn finalize(&mut self) -> bool {
        if !matches!(self.state.game_phase, GamePhase::Scoring | GamePhase::End) {
            warn!("Cannot compute final scores from {:?} phase", self.state.game_phase);
            return false;
        }

        self.record_current_word();

        let min_guesses =
            ScoringEngine::final_quorum(self.rules.final_quorum, self.state.players.len());
        self.state.scores =
            ScoringEngine::final_scores(&self.state.players, &self.state.guesses, min_guesses);
        self.state.game_phase = GamePhase::End;

        info!("Game finished after {} rounds", self.state.current_round);
        self.event_bus.publish(GameEvent::GameCompleted {
            final_scores: self.state.scores.clone(),
        });
        true
    }

    /// New game with the same roster: scores zeroed, word pool and round
    /// count kept, everything round-related cleared.
    pub fn reset(&mut self) {
        let mut state = GameState::new(self.state.max_rounds);
        state.scores = self
            .state
            .players
            .iter()
            .map(|p| Score {
                player_id: p.id,
                score: 0,
            })
            .collect();
        state.players = std::mem::take(&mut self.state.players);
        state.words = std::mem::take(&mut self.state.words);
        self.state = state;

        info!("Game reset with {} players", self.state.players.len());
        self.event_bus.publish(GameEvent::GameReset);
    }

    /// Replace the word pool. During setup this also draws the first word.
    pub fn set_words(&mut self, words: Vec<String>) {
        self.state.words = words;
        if self.state.game_phase == GamePhase::Setup {
            self.state.current_word = draw_word(&self.state.words, &mut self.rng);
            debug!("Initial word drawn: '{}'", self.state.current_word);
        }
        info!("Word pool set with {} words", self.state.words.len());
    }

    /// Swap in a freshly loaded pool without disturbing a word already in play.
    /// Returns whether a new word had to be drawn.
    pub fn refresh_words(&mut self, words: Vec<String>) -> bool {
        self.state.words = words;
        if !self.state.current_word.is_empty() || self.state.words.is_empty() {
            return false;
        }

        self.state.current_word = draw_word(&self.state.words, &mut self.rng);
        if self.state.game_phase != GamePhase::Setup {
            self.record_current_word();
        }
        debug!("Drew missing word '{}' after refresh", self.state.current_word);
        true
    }

    /// Override the active word. Mid-game the round's history entry follows it.
    pub fn set_current_word(&mut self, word: &str) {
        if self.state.game_phase != GamePhase::Setup && word != self.state.current_word {
            self.upsert_history(self.state.current_round, word.to_string());
        }
        self.state.current_word = word.to_string();
    }

    pub fn set_max_rounds(&mut self, max_rounds: u32) -> Result<(), GameError> {
        if max_rounds == 0 {
            return Err(GameError::InvalidMaxRounds { max_rounds });
        }
        self.state.max_rounds = max_rounds;
        Ok(())
    }

    /// Players with their scores, best first; ties keep roster order
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .state
            .players
            .iter()
            .map(|player| Standing {
                player: player.clone(),
                score: self.state.score_of(player.id).unwrap_or(0),
            })
            .collect();
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }

    /// Distance of the player's current guess from the displayed average
    pub fn distance_from_average(&self, player_id: PlayerId) -> Option<u32> {
        let average = self.state.average_position?;
        let guess = self.state.current_guess_of(player_id)?;
        Some(ScoringEngine::distance(average, guess.position))
    }

    /// Word used in `round`, if known
    pub fn round_word(&self, round: u32) -> Option<&str> {
        if round == self.state.current_round && !self.state.current_word.is_empty() {
            return Some(self.state.current_word.as_str());
        }
        self.state.history_word(round)
    }

    fn record_current_word(&mut self) {
        if !self.state.current_word.is_empty() {
            self.upsert_history(self.state.current_round, self.state.current_word.clone());
        }
    }

    fn upsert_history(&mut self, round: u32, word: String) {
        match self.state.word_history.iter_mut().find(|e| e.round == round) {
            Some(entry) => entry.word = word,
            None => self.state.word_history.push(WordHistoryEntry { round, word }),
        }
    }
}
