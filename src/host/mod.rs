//! Host capability seams
//!
//! The arena core never owns host objects. Everything it needs from the
//! running game (roster, names, freezing, the native end-of-match routine,
//! scene markers, teleport portals) is a capability on one of these traits,
//! implemented once per host adapter.

pub mod sim;

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier the host assigns to a participant entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Fresh random identifier
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The null reference. Never resolvable on any host.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle to a host teleport-destination component attached to a spawn slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalHandle(pub u64);

/// A named transform in the host scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    /// Name of the parent transform, if any
    pub parent: Option<String>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Failures reported by a host adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host capability unavailable: {0}")]
    UnknownCapability(&'static str),

    #[error("only the authoritative process may do this")]
    NotAuthoritative,

    #[error("actor {0} does not resolve on the host")]
    InvalidActor(ActorId),

    #[error("host instance not found: {0}")]
    MissingInstance(&'static str),

    #[error("tag is not defined: {0}")]
    TagUndefined(String),
}

/// Match-level capabilities the core calls into
pub trait ArenaHost {
    /// All currently-live participant-capable actors. Actors that left or
    /// were destroyed are simply absent.
    fn roster(&self) -> Vec<ActorId>;

    /// Human-readable name for standings and announcements
    fn display_name(&self, actor: ActorId) -> Result<String, HostError>;

    /// Disable movement, jumping, camera and item swapping on an actor
    fn freeze_actor(&self, actor: ActorId) -> Result<(), HostError>;

    /// Whether this process may trigger match-ending side effects
    fn is_authoritative(&self) -> bool;

    /// Move `winner` to the distinguished side, everyone else to the other,
    /// and run the host's own end-of-match routine.
    fn end_match(&self, winner: ActorId) -> Result<(), HostError>;

    /// Broadcast a plain winner message
    fn announce_winner(&self, name: &str) -> Result<(), HostError>;
}

/// Scene-level capabilities used by spawn allocation
pub trait SceneHost {
    /// Nodes carrying `tag`. Hosts without that tag report `TagUndefined`.
    fn find_tagged(&self, tag: &str) -> Result<Vec<SceneNode>, HostError>;

    /// Every transform in the scene, inactive ones included
    fn scene_nodes(&self) -> Vec<SceneNode>;

    /// Attach a teleport destination at `position`. Hosts that do not expose
    /// the component report `UnknownCapability`.
    fn create_portal(&self, position: Vec3) -> Result<PortalHandle, HostError>;

    /// Destroy every portal created through `create_portal`
    fn clear_portals(&self);
}
