use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use tracing::debug;

use crate::entities::{game_snapshots, prelude::*};
use crate::store::SnapshotStore;
use hues_types::GameState;

/// Snapshot store backed by the `game_snapshots` table
pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// When the snapshot for `key` was last written
    pub async fn last_saved_at(&self, key: &str) -> Result<Option<String>> {
        let model = GameSnapshots::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(model.map(|m| m.updated_at.to_rfc3339()))
    }
}

#[async_trait]
impl SnapshotStore for SnapshotRepository {
    async fn save(&self, key: &str, state: &GameState) -> Result<()> {
        let document = serde_json::to_string(state).context("Failed to serialize game state")?;

        let snapshot = game_snapshots::ActiveModel {
            session_key: ActiveValue::Set(key.to_string()),
            state: ActiveValue::Set(document),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        GameSnapshots::insert(snapshot)
            .on_conflict(
                OnConflict::column(game_snapshots::Column::SessionKey)
                    .update_columns([
                        game_snapshots::Column::State,
                        game_snapshots::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!("Saved snapshot for session '{}'", key);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<GameState>> {
        let Some(model) = GameSnapshots::find_by_id(key.to_string()).one(&self.db).await? else {
            return Ok(None);
        };

        let state = serde_json::from_str(&model.state)
            .with_context(|| format!("Corrupt snapshot for session '{}'", key))?;
        Ok(Some(state))
    }

    async fn clear(&self, key: &str) -> Result<()> {
        GameSnapshots::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use hues_types::{GamePhase, Guess, Player, Position, Score};
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> SnapshotRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SnapshotRepository::new(db)
    }

    fn sample_state() -> GameState {
        let mut state = GameState::default();
        state.players.push(Player {
            id: 12,
            name: "Ana".to_string(),
            color: "#A833FF".to_string(),
        });
        state.scores.push(Score {
            player_id: 12,
            score: 3,
        });
        state.guesses.push(Guess {
            player_id: 12,
            position: Position::new(8, 2),
            round: 1,
        });
        state.game_phase = GamePhase::Scoring;
        state.average_position = Some(Position::new(8, 2));
        state.words = vec!["rojo".to_string(), "azul".to_string()];
        state.current_word = "azul".to_string();
        state
    }

    #[tokio::test]
    async fn test_save_and_load_snapshot() {
        let repo = setup_test_db().await;
        assert!(repo.load("default").await.unwrap().is_none());

        let state = sample_state();
        repo.save("default", &state).await.unwrap();

        let loaded = repo.load("default").await.unwrap().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.players[0].id, 12);
        assert!(repo.last_saved_at("default").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let repo = setup_test_db().await;

        let mut state = sample_state();
        repo.save("default", &state).await.unwrap();

        state.current_round = 2;
        state.game_phase = GamePhase::Guessing;
        state.average_position = None;
        repo.save("default", &state).await.unwrap();

        let loaded = repo.load("default").await.unwrap().unwrap();
        assert_eq!(loaded.current_round, 2);
        assert_eq!(loaded.game_phase, GamePhase::Guessing);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let repo = setup_test_db().await;

        repo.save("mesa-1", &sample_state()).await.unwrap();
        repo.save("mesa-2", &GameState::default()).await.unwrap();

        repo.clear("mesa-1").await.unwrap();
        assert!(repo.load("mesa-1").await.unwrap().is_none());
        assert_eq!(
            repo.load("mesa-2").await.unwrap(),
            Some(GameState::default())
        );
        assert!(repo.last_saved_at("mesa-1").await.unwrap().is_none());
    }
}
