use rand::Rng;
use rand::seq::SliceRandom;

/// Used whenever the clue list cannot be loaded or turns out empty
pub const FALLBACK_WORDS: [&str; 8] = [
    "rojo", "azul", "verde", "amarillo", "naranja", "morado", "rosa", "turquesa",
];

/// Candidate clue words for the rounds of a game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Parse the clue-word document: a delimited file whose header row is
    /// skipped and whose second column holds the word.
    pub fn from_csv(csv_text: &str) -> Self {
        let words = csv_text
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').nth(1))
            .map(|word| word.trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();

        Self { words }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_WORDS.iter().map(|w| w.to_string()).collect())
    }

    /// Substitute the fallback list when nothing usable was loaded
    pub fn or_fallback(self) -> Self {
        if self.is_empty() { Self::fallback() } else { self }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

/// Uniform draw with replacement; empty string for an empty pool
pub fn draw_word<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> String {
    words.choose(rng).cloned().unwrap_or_default()
}
