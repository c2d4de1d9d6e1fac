//! Match state for last-actor-standing play
//!
//! One instance per session. The authoritative process and every observer
//! keep their own copy; they agree because the host replicates the death
//! events that drive it, not this state.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::host::{ActorId, ArenaHost, HostError};

use super::standings::{display_name, sort_standings, Standing};

/// Default lives when no configuration is applied
pub const DEFAULT_LIVES: u32 = 3;

/// Fewer registered participants than this engages the roster fallback
const MIN_PARTICIPANTS: usize = 2;

/// Broadcast text when the fallback announcement has no unique winner
const NO_WINNER_NAME: &str = "Nobody";

/// Match phase within one epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Eliminations are being tracked
    Active,
    /// Terminal until the next reset
    Ended,
}

/// Tracked state of one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRecord {
    pub lives: u32,
    pub eliminated: bool,
    /// Registered at least once this epoch
    pub participant: bool,
}

/// What a call to [`MatchState::maybe_end_match`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// End condition not met, or not enough participants yet
    Pending,
    /// Match had already ended; nothing happened
    AlreadyEnded,
    /// Host's own end-of-match routine ran
    NativeEndGame,
    /// Native routine unavailable; winner message broadcast instead
    FallbackAnnounced,
}

/// Why the native end-of-match routine did not run
#[derive(Debug, thiserror::Error)]
pub enum EndGameError {
    #[error("native end game already requested this match")]
    AlreadyRequested,

    #[error("no single winner remains")]
    NoUniqueWinner,

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Lives, eliminations and the end-of-match flags for one session
#[derive(Debug, Clone)]
pub struct MatchState {
    default_lives: u32,
    actors: HashMap<ActorId, ActorRecord>,
    phase: MatchPhase,
    end_triggered: bool,
}

impl MatchState {
    pub fn new(default_lives: u32) -> Self {
        Self {
            default_lives,
            actors: HashMap::new(),
            phase: MatchPhase::Active,
            end_triggered: false,
        }
    }

    /// Start a new epoch
    pub fn reset(&mut self) {
        self.actors.clear();
        self.phase = MatchPhase::Active;
        self.end_triggered = false;
    }

    pub fn is_ended(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    pub fn record(&self, actor: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&actor)
    }

    pub fn participant_count(&self) -> usize {
        self.actors.values().filter(|r| r.participant).count()
    }

    fn fresh_record(&self) -> ActorRecord {
        ActorRecord {
            lives: self.default_lives,
            eliminated: false,
            participant: false,
        }
    }

    /// Seed default lives on first sight and register as participant
    pub fn ensure_initialized(&mut self, actor: ActorId) {
        if actor.is_nil() {
            return;
        }
        let fresh = self.fresh_record();
        self.actors.entry(actor).or_insert(fresh).participant = true;
    }

    /// Current lives, lazily seeding the default for an unseen actor
    pub fn get_lives(&mut self, actor: ActorId) -> u32 {
        if actor.is_nil() {
            return 0;
        }
        let fresh = self.fresh_record();
        self.actors.entry(actor).or_insert(fresh).lives
    }

    /// Read-only view of [`get_lives`](Self::get_lives)
    pub fn lives(&self, actor: ActorId) -> u32 {
        if actor.is_nil() {
            return 0;
        }
        self.actors
            .get(&actor)
            .map(|r| r.lives)
            .unwrap_or(self.default_lives)
    }

    /// Take one life, flooring at zero. Reaching zero eliminates.
    pub fn decrement_life(&mut self, actor: ActorId) -> u32 {
        if actor.is_nil() {
            return 0;
        }
        let fresh = self.fresh_record();
        let record = self.actors.entry(actor).or_insert(fresh);
        record.lives = record.lives.saturating_sub(1);
        if record.lives == 0 {
            record.eliminated = true;
        }
        record.lives
    }

    /// Nil references count as out; unseen live actors are still in
    pub fn is_eliminated(&self, actor: ActorId) -> bool {
        if actor.is_nil() {
            return true;
        }
        self.actors.get(&actor).map_or(false, |r| r.eliminated)
    }

    /// Force elimination regardless of lives (disconnect, forfeit)
    pub fn mark_eliminated(&mut self, actor: ActorId) {
        if actor.is_nil() {
            return;
        }
        let fresh = self.fresh_record();
        self.actors.entry(actor).or_insert(fresh).eliminated = true;
    }

    /// Live recount against the host roster
    pub fn count_remaining(&self, host: &dyn ArenaHost) -> usize {
        host.roster()
            .into_iter()
            .filter(|a| !self.is_eliminated(*a))
            .count()
    }

    /// The single non-eliminated roster actor, if exactly one remains
    pub fn find_winner(&self, host: &dyn ArenaHost) -> Option<ActorId> {
        let mut winner = None;
        for actor in host.roster() {
            if self.is_eliminated(actor) {
                continue;
            }
            if winner.is_some() {
                return None;
            }
            winner = Some(actor);
        }
        winner
    }

    /// End the match once at most one actor remains
    pub fn maybe_end_match(&mut self, host: &dyn ArenaHost) -> EndOutcome {
        if self.is_ended() {
            return EndOutcome::AlreadyEnded;
        }

        let participants = self.participant_count();
        if participants < MIN_PARTICIPANTS {
            // Warm-up: participants may not have registered yet
            let detected = host.roster().len();
            if detected < MIN_PARTICIPANTS {
                return EndOutcome::Pending;
            }
            debug!(
                participants,
                detected, "Proceeding with roster-detected actors"
            );
        }

        let remaining = self.count_remaining(host);
        if remaining > 1 {
            return EndOutcome::Pending;
        }

        self.phase = MatchPhase::Ended;
        self.freeze_all(host);
        info!(participants, remaining, "End condition met");

        match self.trigger_native_end(host) {
            Ok(winner) => {
                info!(winner = %winner, "Native end game invoked");
                EndOutcome::NativeEndGame
            }
            Err(err) => {
                warn!(error = %err, "Native end game unavailable, announcing winner");
                self.announce_winner(host);
                EndOutcome::FallbackAnnounced
            }
        }
    }

    /// Runs at most once per epoch
    fn trigger_native_end(&mut self, host: &dyn ArenaHost) -> Result<ActorId, EndGameError> {
        if self.end_triggered {
            return Err(EndGameError::AlreadyRequested);
        }
        self.end_triggered = true;

        let winner = self.find_winner(host).ok_or(EndGameError::NoUniqueWinner)?;
        if !host.is_authoritative() {
            return Err(HostError::NotAuthoritative.into());
        }
        host.end_match(winner)?;
        Ok(winner)
    }

    fn freeze_all(&self, host: &dyn ArenaHost) {
        for actor in host.roster() {
            if let Err(err) = host.freeze_actor(actor) {
                debug!(actor = %actor, error = %err, "Freeze failed");
            }
        }
    }

    fn announce_winner(&self, host: &dyn ArenaHost) {
        let name = match self.find_winner(host) {
            Some(winner) => display_name(host, winner),
            None => NO_WINNER_NAME.to_string(),
        };
        match host.announce_winner(&name) {
            Ok(()) => info!(winner = %name, "Fallback winner announced"),
            Err(err) => warn!(error = %err, "Fallback winner announcement failed"),
        }
    }

    /// Roster standings: survivors first, then lives descending, then name
    pub fn build_standings(&self, host: &dyn ArenaHost) -> Vec<Standing> {
        let mut standings: Vec<Standing> = host
            .roster()
            .into_iter()
            .map(|actor| Standing {
                name: display_name(host, actor),
                lives: self.lives(actor),
                eliminated: self.is_eliminated(actor),
            })
            .collect();
        sort_standings(&mut standings);
        standings
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(DEFAULT_LIVES)
    }
}
