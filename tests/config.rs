use std::env;

use ffa_arena::{Config, ConfigError, MapSize};

const VARS: [&str; 7] = [
    "ARENA_INITIAL_LIVES",
    "LOG_LEVEL",
    "ARENA_MAP_SIZE",
    "ARENA_PRESETS_ONLY",
    "ARENA_LOBBY_SIZE",
    "ARENA_SEED",
    "ARENA_TICK_MS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

// One test owns the process environment so nothing races on it
#[test]
fn from_env_reads_defaults_overrides_and_rejects_garbage() {
    clear_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config.initial_lives, 3);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.map_size, MapSize::Large);
    assert!(config.presets_only);
    assert_eq!(config.lobby_size, 8);
    assert_eq!(config.seed, 0);
    assert_eq!(config.tick_ms, 50);

    env::set_var("ARENA_INITIAL_LIVES", "5");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("ARENA_MAP_SIZE", "small");
    env::set_var("ARENA_PRESETS_ONLY", "false");
    env::set_var("ARENA_LOBBY_SIZE", "6");
    env::set_var("ARENA_SEED", "42");
    env::set_var("ARENA_TICK_MS", "10");

    let config = Config::from_env().unwrap();
    assert_eq!(config.initial_lives, 5);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.map_size, MapSize::Small);
    assert!(!config.presets_only);
    assert_eq!(config.lobby_size, 6);
    assert_eq!(config.seed, 42);
    assert_eq!(config.tick_ms, 10);

    env::set_var("ARENA_LOBBY_SIZE", "many");
    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::Invalid("ARENA_LOBBY_SIZE"))
    ));

    clear_env();
}
