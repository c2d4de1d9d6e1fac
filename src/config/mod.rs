//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::game::DEFAULT_LIVES;
use crate::spawn::MapSize;

/// Arena configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Lives every actor starts with
    pub initial_lives: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Map whose preset table seeds arena spawns
    pub map_size: MapSize,
    /// Skip scanning the scene for extra spawn markers
    pub presets_only: bool,

    /// Actors in the simulated lobby
    pub lobby_size: usize,
    /// Seed for the simulated death schedule
    pub seed: u64,
    /// Simulated tick period in milliseconds
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_lives: DEFAULT_LIVES,
            log_level: "info".to_string(),
            map_size: MapSize::Large,
            presets_only: true,
            lobby_size: 8,
            seed: 0,
            tick_ms: 50,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, defaulting anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            initial_lives: parse_value(
                "ARENA_INITIAL_LIVES",
                env::var("ARENA_INITIAL_LIVES").ok(),
                defaults.initial_lives,
            )?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            map_size: parse_value(
                "ARENA_MAP_SIZE",
                env::var("ARENA_MAP_SIZE").ok(),
                defaults.map_size,
            )?,
            presets_only: parse_value(
                "ARENA_PRESETS_ONLY",
                env::var("ARENA_PRESETS_ONLY").ok(),
                defaults.presets_only,
            )?,

            lobby_size: parse_value(
                "ARENA_LOBBY_SIZE",
                env::var("ARENA_LOBBY_SIZE").ok(),
                defaults.lobby_size,
            )?,
            seed: parse_value("ARENA_SEED", env::var("ARENA_SEED").ok(), defaults.seed)?,
            tick_ms: parse_value(
                "ARENA_TICK_MS",
                env::var("ARENA_TICK_MS").ok(),
                defaults.tick_ms,
            )?,
        })
    }
}

fn parse_value<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_defaults_when_unset() {
        assert_eq!(parse_value("X", None, 3u32).unwrap(), 3);
    }

    #[test]
    fn test_parse_value_reads_raw() {
        assert_eq!(parse_value("X", Some(" 5 ".to_string()), 3u32).unwrap(), 5);
        assert_eq!(
            parse_value("X", Some("small".to_string()), MapSize::Large).unwrap(),
            MapSize::Small
        );
        assert!(!parse_value("X", Some("false".to_string()), true).unwrap());
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert!(matches!(
            parse_value("ARENA_INITIAL_LIVES", Some("-1".to_string()), 3u32),
            Err(ConfigError::Invalid("ARENA_INITIAL_LIVES"))
        ));
    }
}
