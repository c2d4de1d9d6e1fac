//! In-memory host adapter
//!
//! Backs the `ffa_arena` binary and the test-suite. Interior state sits
//! behind a mutex because host capabilities are called through `&self`.

use glam::Vec3;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::Config;
use crate::game::{ArenaSession, DeathSource, Standing};
use crate::util::time::{tick_duration, Timer};

use super::{ActorId, ArenaHost, HostError, PortalHandle, SceneHost, SceneNode};

/// Per-actor control flags the freeze capability clears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub can_move: bool,
    pub can_jump: bool,
    pub can_move_camera: bool,
    pub can_swap_item: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            can_move: true,
            can_jump: true,
            can_move_camera: true,
            can_swap_item: true,
        }
    }
}

impl Controls {
    pub fn is_frozen(&self) -> bool {
        !(self.can_move || self.can_jump || self.can_move_camera || self.can_swap_item)
    }
}

#[derive(Debug, Clone)]
struct SimActor {
    id: ActorId,
    name: String,
    team: i32,
    controls: Controls,
}

#[derive(Debug, Default)]
struct SimInner {
    actors: Vec<SimActor>,
    tagged: HashMap<String, Vec<SceneNode>>,
    nodes: Vec<SceneNode>,
    end_match_calls: u32,
    announcements: Vec<String>,
    next_portal: u64,
    portals: Vec<PortalHandle>,
    portal_attempts: u32,
}

/// How the simulated scene answers portal creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PortalSupport {
    Available,
    Unsupported,
    /// Component exists but every creation fails
    Failing,
}

/// Simulated host process
pub struct SimulatedHost {
    inner: Mutex<SimInner>,
    authoritative: bool,
    native_end_game: bool,
    portals: PortalSupport,
}

impl SimulatedHost {
    /// Authoritative host with every capability available
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SimInner::default()),
            authoritative: true,
            native_end_game: true,
            portals: PortalSupport::Available,
        }
    }

    /// Observer process: native end-of-match is refused
    pub fn observer() -> Self {
        Self {
            authoritative: false,
            ..Self::new()
        }
    }

    /// Lobby of `count` actors named `Player_1..=Player_count`
    pub fn with_lobby(count: usize) -> Self {
        let host = Self::new();
        for i in 1..=count {
            host.add_actor(format!("Player_{}", i));
        }
        host
    }

    pub fn without_native_end_game(mut self) -> Self {
        self.native_end_game = false;
        self
    }

    pub fn without_portals(mut self) -> Self {
        self.portals = PortalSupport::Unsupported;
        self
    }

    /// Portal component present, but creation always fails
    pub fn with_failing_portals(mut self) -> Self {
        self.portals = PortalSupport::Failing;
        self
    }

    pub fn add_actor(&self, name: impl Into<String>) -> ActorId {
        let id = ActorId::random();
        self.inner.lock().actors.push(SimActor {
            id,
            name: name.into(),
            team: 0,
            controls: Controls::default(),
        });
        id
    }

    /// Drop an actor from the roster (disconnect, destroyed)
    pub fn remove_actor(&self, id: ActorId) {
        self.inner.lock().actors.retain(|a| a.id != id);
    }

    pub fn add_scene_node(&self, node: SceneNode) {
        self.inner.lock().nodes.push(node);
    }

    /// Register a node under `tag`. The node is also part of the scene.
    pub fn add_tagged_node(&self, tag: impl Into<String>, node: SceneNode) {
        let mut inner = self.inner.lock();
        inner.nodes.push(node.clone());
        inner.tagged.entry(tag.into()).or_default().push(node);
    }

    pub fn end_match_calls(&self) -> u32 {
        self.inner.lock().end_match_calls
    }

    pub fn announcements(&self) -> Vec<String> {
        self.inner.lock().announcements.clone()
    }

    pub fn controls(&self, id: ActorId) -> Option<Controls> {
        self.inner
            .lock()
            .actors
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.controls)
    }

    pub fn team(&self, id: ActorId) -> Option<i32> {
        self.inner
            .lock()
            .actors
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.team)
    }

    pub fn portal_count(&self) -> usize {
        self.inner.lock().portals.len()
    }

    /// Calls to `create_portal`, successful or not
    pub fn portal_attempts(&self) -> u32 {
        self.inner.lock().portal_attempts
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaHost for SimulatedHost {
    fn roster(&self) -> Vec<ActorId> {
        self.inner.lock().actors.iter().map(|a| a.id).collect()
    }

    fn display_name(&self, actor: ActorId) -> Result<String, HostError> {
        self.inner
            .lock()
            .actors
            .iter()
            .find(|a| a.id == actor)
            .map(|a| a.name.clone())
            .ok_or(HostError::InvalidActor(actor))
    }

    fn freeze_actor(&self, actor: ActorId) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        let sim = inner
            .actors
            .iter_mut()
            .find(|a| a.id == actor)
            .ok_or(HostError::InvalidActor(actor))?;
        sim.controls = Controls {
            can_move: false,
            can_jump: false,
            can_move_camera: false,
            can_swap_item: false,
        };
        Ok(())
    }

    fn is_authoritative(&self) -> bool {
        self.authoritative
    }

    fn end_match(&self, winner: ActorId) -> Result<(), HostError> {
        if !self.native_end_game {
            return Err(HostError::MissingInstance("respawn manager"));
        }
        if !self.authoritative {
            return Err(HostError::NotAuthoritative);
        }

        let mut inner = self.inner.lock();
        if !inner.actors.iter().any(|a| a.id == winner) {
            return Err(HostError::InvalidActor(winner));
        }
        // Winner on team 0, the host declares team 1 the loser
        for actor in inner.actors.iter_mut() {
            actor.team = if actor.id == winner { 0 } else { 1 };
        }
        inner.end_match_calls += 1;
        Ok(())
    }

    fn announce_winner(&self, name: &str) -> Result<(), HostError> {
        self.inner.lock().announcements.push(name.to_string());
        Ok(())
    }
}

impl SceneHost for SimulatedHost {
    fn find_tagged(&self, tag: &str) -> Result<Vec<SceneNode>, HostError> {
        self.inner
            .lock()
            .tagged
            .get(tag)
            .cloned()
            .ok_or_else(|| HostError::TagUndefined(tag.to_string()))
    }

    fn scene_nodes(&self) -> Vec<SceneNode> {
        self.inner.lock().nodes.clone()
    }

    fn create_portal(&self, _position: Vec3) -> Result<PortalHandle, HostError> {
        let mut inner = self.inner.lock();
        inner.portal_attempts += 1;
        match self.portals {
            PortalSupport::Available => {}
            PortalSupport::Unsupported => {
                return Err(HostError::UnknownCapability("teleport destination"))
            }
            PortalSupport::Failing => return Err(HostError::MissingInstance("teleport destination")),
        }
        inner.next_portal += 1;
        let handle = PortalHandle(inner.next_portal);
        inner.portals.push(handle);
        Ok(handle)
    }

    fn clear_portals(&self) {
        self.inner.lock().portals.clear();
    }
}

/// Play a match out on `host`: every tick a seeded pick among the surviving
/// actors dies. Each death arrives twice, once on the authoritative path and
/// once as the observer echo. Returns the final standings.
pub async fn run(session: &mut ArenaSession, host: &SimulatedHost, config: &Config) -> Vec<Standing> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut ticker = tokio::time::interval(tick_duration(config.tick_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let timer = Timer::new();
    let mut tick: u64 = 0;

    loop {
        ticker.tick().await;
        tick += 1;

        if session.state().is_ended() {
            break;
        }

        let alive: Vec<ActorId> = host
            .roster()
            .into_iter()
            .filter(|a| !session.state().is_eliminated(*a))
            .collect();
        if alive.is_empty() {
            break;
        }

        let victim = alive[rng.gen_range(0..alive.len())];
        debug!(tick, actor = %victim, "Simulated death");
        session.on_death(host, victim, DeathSource::Authoritative);
        session.on_death(host, victim, DeathSource::Observer);
    }

    info!(
        ticks = tick,
        elapsed_ms = timer.elapsed_ms(),
        ended = session.state().is_ended(),
        "Simulated match finished"
    );

    session.state().build_standings(host)
}
