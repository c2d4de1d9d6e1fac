//! FFA Arena - last-actor-standing match core
//!
//! Tracks per-actor lives, detects elimination and the end of a match, and
//! allocates non-colliding spawn slots. The host game is reached only
//! through the capability traits in [`host`].

pub mod config;
pub mod game;
pub mod host;
pub mod spawn;
pub mod util;

pub use config::{Config, ConfigError};
pub use game::{ArenaSession, DeathSource, EndOutcome, MatchState, Standing};
pub use host::{ActorId, ArenaHost, HostError, SceneHost};
pub use spawn::{MapSize, SpawnAllocator, SpawnSlot};
