use anyhow::{Context, Result, bail};
use hues_core::{FinalQuorum, GameRules};
use hues_persistence::connection::DEFAULT_DATABASE_URL;
use hues_types::DEFAULT_MAX_ROUNDS;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_key: String,
    pub words_path: String,
    pub words_url: Option<String>,
    pub max_rounds: u32,
    pub final_quorum: FinalQuorum,
    pub submission_url: Option<String>,
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source; unset and blank values take the default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let max_rounds: u32 = parse_or(var("MAX_ROUNDS"), "MAX_ROUNDS", DEFAULT_MAX_ROUNDS)?;
        if max_rounds == 0 {
            bail!("Invalid MAX_ROUNDS: must be at least 1");
        }

        let final_quorum = match var("FINAL_QUORUM").as_deref().map(str::trim) {
            None | Some("live") => FinalQuorum::MatchLive,
            Some("strict") => FinalQuorum::Strict,
            Some(other) => bail!("Invalid FINAL_QUORUM '{}': expected 'live' or 'strict'", other),
        };

        let rng_seed = var("RNG_SEED")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid RNG_SEED '{}'", value))
            })
            .transpose()?;

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(var("PORT"), "PORT", 8080)?,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            session_key: var("SESSION_KEY").unwrap_or_else(|| "default".to_string()),
            words_path: var("WORDS_PATH").unwrap_or_else(|| "./data/clue-words.csv".to_string()),
            words_url: var("WORDS_URL"),
            max_rounds,
            final_quorum,
            submission_url: var("SUBMISSION_URL"),
            rng_seed,
        })
    }

    pub fn game_rules(&self) -> GameRules {
        GameRules {
            default_max_rounds: self.max_rounds,
            final_quorum: self.final_quorum,
            seed: self.rng_seed,
        }
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} '{}'", name, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.session_key, "default");
        assert_eq!(config.words_path, "./data/clue-words.csv");
        assert!(config.words_url.is_none());
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.final_quorum, FinalQuorum::MatchLive);
        assert!(config.submission_url.is_none());
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("MAX_ROUNDS", "3"),
            ("FINAL_QUORUM", "strict"),
            ("RNG_SEED", "42"),
            ("SUBMISSION_URL", "https://example.test/clues"),
            ("WORDS_URL", ""),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.words_url, None);
        assert_eq!(config.submission_url.as_deref(), Some("https://example.test/clues"));

        let rules = config.game_rules();
        assert_eq!(rules.default_max_rounds, 3);
        assert_eq!(rules.final_quorum, FinalQuorum::Strict);
        assert_eq!(rules.seed, Some(42));
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = config_from(&[("MAX_ROUNDS", "0")]).unwrap_err();
        assert!(err.to_string().contains("MAX_ROUNDS"));

        let err = config_from(&[("FINAL_QUORUM", "lenient")]).unwrap_err();
        assert!(err.to_string().contains("FINAL_QUORUM"));
    }
}
