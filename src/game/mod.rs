//! Last-actor-standing match logic

pub mod r#match;
pub mod session;
pub mod standings;
pub mod targeting;

pub use r#match::{ActorRecord, EndGameError, EndOutcome, MatchPhase, MatchState, DEFAULT_LIVES};
pub use session::{ArenaSession, DeathOutcome, DeathSource};
pub use standings::Standing;
pub use targeting::{Candidate, CandidateKind, MissileShot};
