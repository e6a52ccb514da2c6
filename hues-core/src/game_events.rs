use hues_types::{Player, PlayerId, Position, Score};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerJoined {
        player: Player,
    },
    PlayerRemoved {
        player_id: PlayerId,
    },
    GuessSubmitted {
        player_id: PlayerId,
        position: Position,
        round: u32,
        replaced: bool,
    },
    GameStarted {
        word: String,
    },
    RoundScored {
        round: u32,
        average: Position,
    },
    RoundStarted {
        round: u32,
        word: String,
    },
    GameCompleted {
        final_scores: Vec<Score>,
    },
    GameReset,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::PlayerRemoved { .. } => "player_removed",
            GameEvent::GuessSubmitted { .. } => "guess_submitted",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::RoundScored { .. } => "round_scored",
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::GameCompleted { .. } => "game_completed",
            GameEvent::GameReset => "game_reset",
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send + Sync {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
