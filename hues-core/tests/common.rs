use hues_core::{Game, GameEvent, GameEventHandler, GameRules};
use hues_types::{GamePhase, PlayerId, Position};
use std::sync::{Arc, Mutex};

pub fn test_words() -> Vec<String> {
    ["rojo", "azul", "verde", "amarillo", "cielo", "fuego"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

/// Creates a seeded game with the test word pool and the given players
pub fn create_game_with_players(names: &[&str]) -> Game {
    let mut game = Game::new(GameRules::seeded(2024));
    game.set_words(test_words());
    for name in names {
        game.add_player(name).expect("valid player name");
    }
    game
}

/// Creates a started two-player game (Ana = 1, Luis = 2)
pub fn create_standard_game() -> Game {
    let mut game = create_game_with_players(&["Ana", "Luis"]);
    assert!(game.start());
    game
}

/// Submits every (player, x, y) guess for the current round
pub fn submit_guesses(game: &mut Game, guesses: &[(PlayerId, u8, u8)]) {
    for &(player_id, x, y) in guesses {
        game.submit_guess(player_id, Position::new(x, y))
            .expect("valid guess");
    }
}

/// Plays the current round through to scoring
pub fn play_round(game: &mut Game, guesses: &[(PlayerId, u8, u8)]) -> Position {
    submit_guesses(game, guesses);
    game.compute_results().expect("round reaches quorum")
}

pub fn assert_phase(game: &Game, expected_phase: GamePhase) {
    assert_eq!(
        game.state().game_phase,
        expected_phase,
        "Expected phase {:?}, got {:?}",
        expected_phase,
        game.state().game_phase
    );
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn last_event(&self) -> Option<GameEvent> {
        self.events.lock().unwrap().last().cloned()
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
