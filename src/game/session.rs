//! Arena session: the object the host talks to
//!
//! Owns one [`MatchState`] and one [`SpawnAllocator`]. The session is active
//! from the moment arena spawns are collected until `teardown`; while
//! inactive every hook passes through untouched.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::host::{ActorId, ArenaHost, SceneHost};
use crate::spawn::{MapSize, SpawnAllocator, SpawnSlot};
use crate::util::log_sampler::LogSampler;

use super::r#match::{EndOutcome, MatchState};
use super::targeting::{self, Candidate, MissileShot};

/// Respawn-block notices are logged once per this many
const RESPAWN_LOG_EVERY: u32 = 4;

/// Which host notification path delivered a death
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathSource {
    /// Server-side notification on the authoritative process
    Authoritative,
    /// Replicated notification every process receives
    Observer,
}

/// Result of a counted death
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathOutcome {
    pub lives_left: u32,
    pub eliminated: bool,
    pub end: EndOutcome,
}

pub struct ArenaSession {
    state: MatchState,
    spawns: SpawnAllocator,
    active: bool,
    sampler: LogSampler,
}

impl ArenaSession {
    pub fn new(config: &Config) -> Self {
        Self {
            state: MatchState::new(config.initial_lives),
            spawns: SpawnAllocator::new(config.presets_only),
            active: false,
            sampler: LogSampler::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn spawns(&self) -> &SpawnAllocator {
        &self.spawns
    }

    /// New epoch: collect arena spawns, register the lobby, and fill the
    /// host's fixed-length spawn array.
    pub fn start_match<H>(
        &mut self,
        host: &H,
        map_size: MapSize,
        lobby_size: usize,
    ) -> Vec<Option<SpawnSlot>>
    where
        H: ArenaHost + SceneHost,
    {
        self.state.reset();
        self.spawns.collect_for_map_size(host, map_size);
        self.active = true;

        for actor in host.roster() {
            self.state.ensure_initialized(actor);
        }

        let slots = self.spawns.hydrate_fixed_array(host, lobby_size);
        info!(
            map_size = ?map_size,
            participants = self.state.participant_count(),
            slots = slots.len(),
            candidates = self.spawns.len(),
            "Arena match started"
        );
        slots
    }

    /// Count a death reported by the host. Returns `None` when the
    /// notification is ignored.
    pub fn on_death(
        &mut self,
        host: &dyn ArenaHost,
        actor: ActorId,
        source: DeathSource,
    ) -> Option<DeathOutcome> {
        if !self.active || actor.is_nil() {
            return None;
        }
        // The authoritative process also receives the observer echo
        if source == DeathSource::Observer && host.is_authoritative() {
            return None;
        }

        let before = self.state.get_lives(actor);
        self.state.ensure_initialized(actor);
        let lives_left = self.state.decrement_life(actor);
        if lives_left == 0 {
            self.state.mark_eliminated(actor);
        }
        debug!(
            actor = %actor,
            source = ?source,
            lives_before = before,
            lives_after = lives_left,
            "Death counted"
        );

        let end = self.state.maybe_end_match(host);
        Some(DeathOutcome {
            lives_left,
            eliminated: self.state.is_eliminated(actor),
            end,
        })
    }

    /// Whether the host should skip its respawn routine for `actor`
    pub fn should_block_respawn(&mut self, actor: ActorId) -> bool {
        if !self.active {
            return false;
        }
        let ended = self.state.is_ended();
        let eliminated = self.state.is_eliminated(actor);
        if (ended || eliminated) && self.sampler.every("respawn_block", RESPAWN_LOG_EVERY) {
            debug!(actor = %actor, ended, eliminated, "Blocking respawn");
        }
        ended || eliminated
    }

    /// Free-for-all missile target. `None` while inactive leaves the host's
    /// own team-filtered scan in charge.
    pub fn missile_target(
        &self,
        current: Option<ActorId>,
        shot: &MissileShot,
        candidates: &[Candidate],
    ) -> Option<ActorId> {
        if !self.active {
            return None;
        }
        targeting::select_missile_target(current, shot, candidates)
    }

    /// Free-for-all wisp target; `None` while inactive
    pub fn wisp_target(
        &self,
        current: Option<ActorId>,
        owner: ActorId,
        candidates: &[Candidate],
    ) -> Option<ActorId> {
        if !self.active {
            return None;
        }
        targeting::select_wisp_target(current, owner, candidates)
    }

    /// Leave arena mode and release host-side spawn objects
    pub fn teardown(&mut self, scene: &dyn SceneHost) {
        if !self.active {
            warn!("Teardown requested while arena mode inactive");
        }
        scene.clear_portals();
        self.spawns.clear();
        self.state.reset();
        self.active = false;
        info!("Arena mode torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::sim::SimulatedHost;
    use glam::Vec3;

    #[test]
    fn test_inactive_session_passes_through() {
        let host = SimulatedHost::with_lobby(2);
        let mut session = ArenaSession::new(&Config::default());
        let actor = host.roster()[0];

        assert!(session.on_death(&host, actor, DeathSource::Authoritative).is_none());
        assert!(!session.should_block_respawn(actor));
        assert!(session.state().record(actor).is_none());
    }

    #[test]
    fn test_start_match_registers_lobby() {
        let host = SimulatedHost::with_lobby(5);
        let mut session = ArenaSession::new(&Config::default());

        let slots = session.start_match(&host, MapSize::Large, 5);
        assert!(session.is_active());
        assert_eq!(session.state().participant_count(), 5);
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(Option::is_some));
    }

    #[test]
    fn test_observer_echo_ignored_on_authoritative() {
        let host = SimulatedHost::with_lobby(3);
        let mut session = ArenaSession::new(&Config::default());
        session.start_match(&host, MapSize::Small, 3);
        let actor = host.roster()[0];

        let counted = session
            .on_death(&host, actor, DeathSource::Authoritative)
            .unwrap();
        assert_eq!(counted.lives_left, 2);
        assert!(session.on_death(&host, actor, DeathSource::Observer).is_none());
        assert_eq!(session.state().lives(actor), 2);
    }

    #[test]
    fn test_observer_counts_on_non_authoritative() {
        let host = SimulatedHost::observer();
        let a = host.add_actor("a");
        host.add_actor("b");
        let mut session = ArenaSession::new(&Config::default());
        session.start_match(&host, MapSize::Small, 2);

        let counted = session.on_death(&host, a, DeathSource::Observer).unwrap();
        assert_eq!(counted.lives_left, 2);
    }

    #[test]
    fn test_respawn_blocked_for_eliminated() {
        let host = SimulatedHost::with_lobby(3);
        let config = Config {
            initial_lives: 1,
            ..Config::default()
        };
        let mut session = ArenaSession::new(&config);
        session.start_match(&host, MapSize::Large, 3);
        let roster = host.roster();

        let outcome = session
            .on_death(&host, roster[0], DeathSource::Authoritative)
            .unwrap();
        assert!(outcome.eliminated);
        assert_eq!(outcome.end, EndOutcome::Pending);
        assert!(session.should_block_respawn(roster[0]));
        assert!(!session.should_block_respawn(roster[1]));
    }

    #[test]
    fn test_teardown_deactivates() {
        let host = SimulatedHost::with_lobby(2);
        let mut session = ArenaSession::new(&Config::default());
        session.start_match(&host, MapSize::Large, 2);
        assert!(host.portal_count() > 0);

        session.teardown(&host);
        assert!(!session.is_active());
        assert!(session.spawns().is_empty());
        assert_eq!(host.portal_count(), 0);
    }

    #[test]
    fn test_targeting_only_while_active() {
        let host = SimulatedHost::with_lobby(2);
        let roster = host.roster();
        let mut session = ArenaSession::new(&Config::default());
        let shot = MissileShot {
            owner: roster[0],
            origin: Vec3::ZERO,
            forward: Vec3::Z,
            shot_by_ai: false,
        };
        let candidates = [
            Candidate::player(roster[0], Vec3::ZERO),
            Candidate::player(roster[1], Vec3::new(0.0, 0.0, 4.0)),
        ];

        assert_eq!(session.missile_target(None, &shot, &candidates), None);
        assert_eq!(session.wisp_target(Some(roster[0]), roster[0], &candidates), None);

        session.start_match(&host, MapSize::Large, 2);
        assert_eq!(session.missile_target(None, &shot, &candidates), Some(roster[1]));
        assert_eq!(
            session.wisp_target(Some(roster[0]), roster[0], &candidates),
            Some(roster[1])
        );
    }
}
