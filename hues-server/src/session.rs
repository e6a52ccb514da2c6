use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use hues_core::{Game, GameEvent, GameEventHandler, GameRules};
use hues_persistence::{SnapshotStore, should_persist};
use hues_types::GameState;

/// Logs every engine event
pub struct TracingEventHandler {
    session_key: String,
}

impl TracingEventHandler {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
        }
    }
}

impl GameEventHandler for TracingEventHandler {
    fn handle_event(&mut self, event: GameEvent) {
        match &event {
            GameEvent::PlayerJoined { player } => {
                info!("[{}] {} joined as player {}", self.session_key, player.name, player.id)
            }
            GameEvent::PlayerRemoved { player_id } => {
                info!("[{}] Player {} removed", self.session_key, player_id)
            }
            GameEvent::GuessSubmitted {
                player_id,
                position,
                round,
                replaced,
            } => debug!(
                "[{}] Player {} guessed ({}, {}) in round {} (replaced: {})",
                self.session_key, player_id, position.x, position.y, round, replaced
            ),
            GameEvent::GameCompleted { final_scores } => {
                info!("[{}] Game completed: {:?}", self.session_key, final_scores)
            }
            other => info!("[{}] {:?}", self.session_key, other),
        }
    }
}

/// The one game hosted by this process plus the store its snapshots go to.
/// Every mutation runs under the write lock and is persisted before the lock
/// is released, so snapshots land in the order the changes were made.
pub struct GameSession {
    game: RwLock<Game>,
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl GameSession {
    pub fn new(mut game: Game, store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        game.add_event_handler(Box::new(TracingEventHandler::new(key.clone())));
        Self {
            game: RwLock::new(game),
            store,
            key,
        }
    }

    /// Resume the saved game for `key`, or start a fresh one when there is
    /// nothing usable in the store
    pub async fn open(store: Arc<dyn SnapshotStore>, key: &str, rules: GameRules) -> Self {
        let game = match store.load(key).await {
            Ok(Some(state)) => Game::restore(state, rules),
            Ok(None) => {
                info!("No saved game for session '{}', starting fresh", key);
                Game::new(rules)
            }
            Err(e) => {
                warn!("Ignoring saved game for session '{}': {:#}", key, e);
                Game::new(rules)
            }
        };

        Self::new(game, store, key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn read<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        let game = self.game.read().await;
        f(&game)
    }

    pub async fn snapshot(&self) -> GameState {
        self.game.read().await.snapshot()
    }

    /// Apply `f` to the game and return its result with the resulting state.
    /// A changed state is saved when worth keeping; a failed save is logged
    /// and never rolls back the change.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Game) -> R) -> (R, GameState) {
        let mut game = self.game.write().await;
        let before = game.snapshot();
        let result = f(&mut game);
        let after = game.snapshot();

        if after != before && should_persist(&after) {
            if let Err(e) = self.store.save(&self.key, &after).await {
                error!("Failed to save game for session '{}': {:#}", self.key, e);
            }
        }

        (result, after)
    }
}
