use anyhow::{Context, Result};
use async_trait::async_trait;
use hues_types::GameState;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key-value store for full game snapshots. One document per session key,
/// always written and read whole.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, key: &str, state: &GameState) -> Result<()>;
    async fn load(&self, key: &str) -> Result<Option<GameState>>;
    async fn clear(&self, key: &str) -> Result<()>;
}

/// A snapshot is only worth keeping once someone joined or play moved on
pub fn should_persist(state: &GameState) -> bool {
    !state.players.is_empty() || state.current_round > 1
}

/// Process-local store holding the serialized documents, used by tests and
/// by hosts that run without a database.
#[derive(Default)]
pub struct MemorySnapshotStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw document as-is, bypassing serialization
    pub async fn insert_raw(&self, key: &str, document: &str) {
        self.documents
            .write()
            .await
            .insert(key.to_string(), document.to_string());
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, key: &str, state: &GameState) -> Result<()> {
        let document = serde_json::to_string(state).context("Failed to serialize game state")?;
        self.documents.write().await.insert(key.to_string(), document);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<GameState>> {
        let documents = self.documents.read().await;
        match documents.get(key) {
            Some(document) => {
                let state = serde_json::from_str(document)
                    .with_context(|| format!("Corrupt snapshot for session '{}'", key))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.documents.write().await.remove(key);
        Ok(())
    }
}
