use anyhow::{Context, Result};
use async_trait::async_trait;
use hues_core::WordPool;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;

/// Where clue words come from. Loading may fail; callers fall back.
#[async_trait]
pub trait WordSupply: Send + Sync {
    async fn load_words(&self) -> Result<Vec<String>>;

    fn source(&self) -> String;
}

/// Reads the clue-word CSV from disk
pub struct FileWordSupply {
    path: PathBuf,
}

impl FileWordSupply {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WordSupply for FileWordSupply {
    async fn load_words(&self) -> Result<Vec<String>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read word file {}", self.path.display()))?;
        Ok(WordPool::from_csv(&text).into_words())
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the clue-word CSV over HTTP
pub struct HttpWordSupply {
    client: Client,
    url: String,
}

impl HttpWordSupply {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl WordSupply for HttpWordSupply {
    async fn load_words(&self) -> Result<Vec<String>> {
        let text = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to fetch word list from {}", self.url))?
            .text()
            .await
            .context("Failed to read word list body")?;
        Ok(WordPool::from_csv(&text).into_words())
    }

    fn source(&self) -> String {
        self.url.clone()
    }
}

/// Fixed list, for tests and offline play
pub struct StaticWordSupply {
    words: Vec<String>,
}

impl StaticWordSupply {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }
}

#[async_trait]
impl WordSupply for StaticWordSupply {
    async fn load_words(&self) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }

    fn source(&self) -> String {
        "static list".to_string()
    }
}

/// `WORDS_URL` wins over `WORDS_PATH` when both are configured
pub fn supply_from_config(config: &Config) -> Box<dyn WordSupply> {
    match &config.words_url {
        Some(url) => Box::new(HttpWordSupply::new(url.clone())),
        None => Box::new(FileWordSupply::new(&config.words_path)),
    }
}

/// Load the pool, substituting the built-in list on failure or when nothing usable came back
pub async fn load_word_pool(supply: &dyn WordSupply) -> WordPool {
    match supply.load_words().await {
        Ok(words) if !words.is_empty() => {
            info!("Loaded {} clue words from {}", words.len(), supply.source());
            WordPool::new(words)
        }
        Ok(_) => {
            warn!("No clue words found in {}, using fallback list", supply.source());
            WordPool::fallback()
        }
        Err(e) => {
            warn!("Error loading clue words: {:#}. Using fallback list", e);
            WordPool::fallback()
        }
    }
}
