//! Team-agnostic target selection for homing projectiles
//!
//! The host's own scans filter by team, which leaves nobody to hit in a
//! free-for-all. These selectors keep the host's other filters and drop the
//! team comparison. Both are pure: the host adapter gathers candidates from
//! its physics scan and applies the result.

use glam::Vec3;
use tracing::debug;

use crate::host::ActorId;

/// Missile scan radius around the projectile
pub const MISSILE_RADIUS: f32 = 30.0;

/// Candidates further off the forward vector than this are skipped
pub const MISSILE_MAX_ANGLE_DEG: f32 = 90.0;

/// Weight of the off-axis angle (degrees) against distance
const ANGLE_WEIGHT: f32 = 0.5;

/// Wisp scan radius around the world origin
pub const WISP_RADIUS: f32 = 10_000.0;

/// What a scanned object is tagged as on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Player,
    /// Bot-controlled actor
    Npc,
    /// Marked as never targetable by bots
    Ignorable,
    Other,
}

/// One object returned by a host scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub actor: ActorId,
    pub position: Vec3,
    /// Actor owning this object (summons, decoys), if any
    pub owned_by: Option<ActorId>,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn player(actor: ActorId, position: Vec3) -> Self {
        Self {
            actor,
            position,
            owned_by: None,
            kind: CandidateKind::Player,
        }
    }

    pub fn with_kind(mut self, kind: CandidateKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn owned_by(mut self, owner: ActorId) -> Self {
        self.owned_by = Some(owner);
        self
    }

    fn belongs_to(&self, owner: ActorId) -> bool {
        self.actor == owner || self.owned_by == Some(owner)
    }
}

/// State of a missile looking for a target
#[derive(Debug, Clone, Copy)]
pub struct MissileShot {
    pub owner: ActorId,
    pub origin: Vec3,
    pub forward: Vec3,
    pub shot_by_ai: bool,
}

/// Angle between two vectors in degrees; 0 when either is degenerate
fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Pick a missile target. An existing target is kept as-is.
pub fn select_missile_target(
    current: Option<ActorId>,
    shot: &MissileShot,
    candidates: &[Candidate],
) -> Option<ActorId> {
    if current.is_some() {
        return current;
    }
    if shot.owner.is_nil() {
        return None;
    }

    let mut best: Option<(f32, ActorId)> = None;
    for candidate in candidates {
        if candidate.belongs_to(shot.owner) {
            continue;
        }
        if shot.shot_by_ai
            && matches!(candidate.kind, CandidateKind::Npc | CandidateKind::Ignorable)
        {
            continue;
        }

        let offset = candidate.position - shot.origin;
        let dist = offset.length();
        if dist > MISSILE_RADIUS {
            continue;
        }
        let angle = angle_deg(shot.forward, offset);
        if angle > MISSILE_MAX_ANGLE_DEG {
            continue;
        }

        let score = dist + angle * ANGLE_WEIGHT;
        if best.map_or(true, |(s, _)| score < s) {
            best = Some((score, candidate.actor));
        }
    }

    if let Some((score, actor)) = best {
        debug!(actor = %actor, score, "Missile target selected");
    }
    best.map(|(_, actor)| actor)
}

/// Pick a wisp target. A current target other than the owner is kept;
/// otherwise the player nearest the world origin is chosen.
pub fn select_wisp_target(
    current: Option<ActorId>,
    owner: ActorId,
    candidates: &[Candidate],
) -> Option<ActorId> {
    if owner.is_nil() {
        return current;
    }
    if let Some(target) = current {
        if target != owner {
            return Some(target);
        }
    }

    candidates
        .iter()
        .filter(|c| c.kind == CandidateKind::Player && c.actor != owner)
        .map(|c| (c.position.length_squared(), c.actor))
        .filter(|(d, _)| *d <= WISP_RADIUS * WISP_RADIUS)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, actor)| actor)
}
