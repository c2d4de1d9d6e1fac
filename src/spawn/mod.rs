//! Spawn slot allocation
//!
//! Level geometry does not reliably expose spawn markers for every map, so
//! arena play seeds preset coordinates and pads the list instead of failing.
//! Downstream host code indexes fixed-length arrays without bounds checks,
//! which is why every collection path guarantees a minimum slot count.

pub mod presets;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::host::{HostError, PortalHandle, SceneHost, SceneNode};

/// Minimum slots after arena collection
pub const ARENA_MIN_SLOTS: usize = 8;
/// Minimum slots after neutral collection
pub const NEUTRAL_MIN_SLOTS: usize = 4;
/// Smallest fixed array the host accepts
pub const FIXED_ARRAY_MIN: usize = 4;

const NEUTRAL_TAG: &str = "Spawn";
const NEUTRAL_NAME_HINTS: [&str; 3] = ["spawn", "redspawn", "bluespawn"];

/// Map configuration selecting the preset table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSize {
    Small,
    Large,
}

impl MapSize {
    /// Host map info: 0 is the large map, anything else the small one
    pub fn from_map_info(map_info: i32) -> Self {
        if map_info == 0 {
            Self::Large
        } else {
            Self::Small
        }
    }

    /// Tags and name fragments marking map-specific spawns
    pub fn name_hints(self) -> &'static [&'static str] {
        match self {
            Self::Large => &["FFA_Large_Spawn", "FFA_Lrg_Spawn", "FFA_Large", "FFALarge"],
            Self::Small => &["FFA_Medium_Spawn", "FFA_Med_Spawn", "FFA_Medium", "FFAMed"],
        }
    }

    /// Parent transform grouping map-specific spawns
    pub fn group_name(self) -> &'static str {
        match self {
            Self::Large => "FFA_Large_Spawns",
            Self::Small => "FFA_Medium_Spawns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map size: {0}")]
pub struct ParseMapSizeError(String);

impl FromStr for MapSize {
    type Err = ParseMapSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "large" => Ok(Self::Large),
            "small" | "medium" => Ok(Self::Small),
            other => other
                .parse::<i32>()
                .map(Self::from_map_info)
                .map_err(|_| ParseMapSizeError(s.to_string())),
        }
    }
}

/// Candidate spawn position, optionally with a teleport destination
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnSlot {
    pub position: Vec3,
    pub portal: Option<PortalHandle>,
}

impl SpawnSlot {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            portal: None,
        }
    }
}

/// Ordered, duplicate-permitting list of spawn slots for the current map
#[derive(Debug, Clone, Default)]
pub struct SpawnAllocator {
    slots: Vec<SpawnSlot>,
    presets_only: bool,
}

impl SpawnAllocator {
    pub fn new(presets_only: bool) -> Self {
        Self {
            slots: Vec::new(),
            presets_only,
        }
    }

    /// Allocator preloaded with `slots`, no padding applied
    pub fn with_slots(slots: Vec<SpawnSlot>) -> Self {
        Self {
            slots,
            presets_only: true,
        }
    }

    pub fn slots(&self) -> &[SpawnSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Seed presets for `map_size`, optionally add scene markers, then pad
    /// to [`ARENA_MIN_SLOTS`] by repeating the last slot.
    pub fn collect_for_map_size(&mut self, scene: &dyn SceneHost, map_size: MapSize) {
        self.slots.clear();
        self.seed_presets(scene, map_size);

        if !self.presets_only {
            self.scan_map_markers(scene, map_size);
        }

        if let Some(last) = self.slots.last().copied() {
            while self.slots.len() < ARENA_MIN_SLOTS {
                self.slots.push(last);
            }
        }
        info!(map_size = ?map_size, slots = self.slots.len(), "Collected arena spawns");
    }

    fn seed_presets(&mut self, scene: &dyn SceneHost, map_size: MapSize) {
        let mut portals_available = true;
        for &position in presets::for_map(map_size) {
            let portal = if portals_available {
                match scene.create_portal(position) {
                    Ok(handle) => Some(handle),
                    Err(HostError::UnknownCapability(what)) => {
                        debug!(capability = what, "Portals unavailable, slots stay position-only");
                        portals_available = false;
                        None
                    }
                    Err(err) => {
                        warn!(error = %err, "Portal creation failed, slots stay position-only");
                        portals_available = false;
                        None
                    }
                }
            } else {
                None
            };
            self.slots.push(SpawnSlot { position, portal });
        }
    }

    fn scan_map_markers(&mut self, scene: &dyn SceneHost, map_size: MapSize) {
        let hints = map_size.name_hints();
        let mut found: Vec<SceneNode> = Vec::new();

        for tag in hints {
            match scene.find_tagged(tag) {
                Ok(nodes) => found.extend(nodes),
                Err(err) => debug!(tag, error = %err, "Spawn tag query skipped"),
            }
        }

        let nodes = scene.scene_nodes();
        let group = map_size.group_name();
        found.extend(
            nodes
                .iter()
                .filter(|n| {
                    n.parent
                        .as_deref()
                        .is_some_and(|p| p.eq_ignore_ascii_case(group))
                })
                .cloned(),
        );

        if found.is_empty() {
            let lowered: Vec<String> = hints.iter().map(|h| h.to_lowercase()).collect();
            found.extend(
                nodes
                    .into_iter()
                    .filter(|n| name_matches(&n.name, &lowered)),
            );
        }

        debug!(map_size = ?map_size, markers = found.len(), "Scanned map spawn markers");
        self.slots
            .extend(found.into_iter().map(|n| SpawnSlot::at(n.position)));
    }

    /// Generic spawn markers: the `Spawn` tag, falling back to a name scan.
    /// Pads to [`NEUTRAL_MIN_SLOTS`] by repeating the first slot.
    pub fn collect_neutral_spawns(&mut self, scene: &dyn SceneHost) {
        self.slots.clear();

        match scene.find_tagged(NEUTRAL_TAG) {
            Ok(nodes) => self
                .slots
                .extend(nodes.into_iter().map(|n| SpawnSlot::at(n.position))),
            Err(err) => debug!(error = %err, "Spawn tag unavailable, scanning names"),
        }

        if self.slots.is_empty() {
            let hints: Vec<String> = NEUTRAL_NAME_HINTS.iter().map(|h| h.to_string()).collect();
            self.slots.extend(
                scene
                    .scene_nodes()
                    .into_iter()
                    .filter(|n| name_matches(&n.name, &hints))
                    .map(|n| SpawnSlot::at(n.position)),
            );
        }

        if let Some(first) = self.slots.first().copied() {
            while self.slots.len() < NEUTRAL_MIN_SLOTS {
                self.slots.push(first);
            }
        } else {
            warn!("No neutral spawn markers found");
        }
    }

    /// Slot whose nearest occupied position is farthest away. Ties keep the
    /// first-seen slot; with nothing occupied every slot scores zero.
    pub fn select_farthest_from(
        &mut self,
        scene: &dyn SceneHost,
        occupied: &[Vec3],
    ) -> Option<SpawnSlot> {
        if self.slots.is_empty() {
            self.collect_neutral_spawns(scene);
        }

        let score = |slot: &SpawnSlot| -> f32 {
            if occupied.is_empty() {
                return 0.0;
            }
            occupied
                .iter()
                .map(|p| slot.position.distance(*p))
                .fold(f32::MAX, f32::min)
        };

        let (first, rest) = self.slots.split_first()?;
        let mut best = *first;
        let mut best_score = score(first);
        for slot in rest {
            let s = score(slot);
            if s > best_score {
                best_score = s;
                best = *slot;
            }
        }
        Some(best)
    }

    /// Exactly `max(length, FIXED_ARRAY_MIN)` entries, cycling through the
    /// loaded slots. Entries are `None` only if no slot can be produced.
    pub fn hydrate_fixed_array(
        &mut self,
        scene: &dyn SceneHost,
        length: usize,
    ) -> Vec<Option<SpawnSlot>> {
        if self.slots.is_empty() {
            self.collect_neutral_spawns(scene);
        }

        let length = length.max(FIXED_ARRAY_MIN);
        let count = self.slots.len();
        (0..length)
            .map(|i| (count > 0).then(|| self.slots[i % count]))
            .collect()
    }
}

/// Case-insensitive substring match against pre-lowered hints
fn name_matches(name: &str, lowered_hints: &[String]) -> bool {
    if name.is_empty() {
        return false;
    }
    let lower = name.to_lowercase();
    lowered_hints.iter().any(|h| lower.contains(h.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::sim::SimulatedHost;

    fn slots_at(xs: &[f32]) -> Vec<SpawnSlot> {
        xs.iter().map(|&x| SpawnSlot::at(Vec3::new(x, 0.0, 0.0))).collect()
    }

    #[test]
    fn test_map_size_parsing() {
        assert_eq!("large".parse::<MapSize>().unwrap(), MapSize::Large);
        assert_eq!("Medium".parse::<MapSize>().unwrap(), MapSize::Small);
        assert_eq!("0".parse::<MapSize>().unwrap(), MapSize::Large);
        assert_eq!("1".parse::<MapSize>().unwrap(), MapSize::Small);
        assert!("huge".parse::<MapSize>().is_err());
    }

    #[test]
    fn test_farthest_picks_max_min_distance() {
        // Distances from origin: 3, 7, 5
        let mut alloc = SpawnAllocator::with_slots(slots_at(&[3.0, -7.0, 5.0]));
        let host = SimulatedHost::new();

        let picked = alloc.select_farthest_from(&host, &[Vec3::ZERO]).unwrap();
        assert_eq!(picked.position, Vec3::new(-7.0, 0.0, 0.0));
    }

    #[test]
    fn test_farthest_uses_nearest_occupied() {
        let mut alloc = SpawnAllocator::with_slots(slots_at(&[0.0, 10.0, 20.0]));
        let host = SimulatedHost::new();
        let occupied = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(21.0, 0.0, 0.0)];

        let picked = alloc.select_farthest_from(&host, &occupied).unwrap();
        assert_eq!(picked.position.x, 10.0);
    }

    #[test]
    fn test_farthest_empty_occupied_keeps_first() {
        let mut alloc = SpawnAllocator::with_slots(slots_at(&[4.0, 8.0]));
        let host = SimulatedHost::new();

        let picked = alloc.select_farthest_from(&host, &[]).unwrap();
        assert_eq!(picked.position.x, 4.0);
    }

    #[test]
    fn test_farthest_none_without_candidates() {
        let mut alloc = SpawnAllocator::default();
        let host = SimulatedHost::new();
        assert!(alloc.select_farthest_from(&host, &[Vec3::ZERO]).is_none());
    }

    #[test]
    fn test_hydrate_cycles() {
        let mut alloc = SpawnAllocator::with_slots(slots_at(&[0.0, 1.0, 2.0]));
        let host = SimulatedHost::new();

        let xs: Vec<f32> = alloc
            .hydrate_fixed_array(&host, 10)
            .into_iter()
            .map(|s| s.unwrap().position.x)
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_hydrate_raises_to_minimum() {
        let mut alloc = SpawnAllocator::with_slots(slots_at(&[1.0]));
        let host = SimulatedHost::new();
        assert_eq!(alloc.hydrate_fixed_array(&host, 2).len(), FIXED_ARRAY_MIN);
    }

    #[test]
    fn test_hydrate_without_slots_is_all_none() {
        let mut alloc = SpawnAllocator::default();
        let host = SimulatedHost::new();

        let entries = alloc.hydrate_fixed_array(&host, 6);
        assert_eq!(entries.len(), 6);
        assert!(entries.iter().all(Option::is_none));
    }

    #[test]
    fn test_neutral_prefers_tag() {
        let host = SimulatedHost::new();
        host.add_tagged_node("Spawn", SceneNode::new("A", Vec3::new(1.0, 0.0, 0.0)));
        host.add_scene_node(SceneNode::new("RedSpawn_2", Vec3::new(2.0, 0.0, 0.0)));

        let mut alloc = SpawnAllocator::new(true);
        alloc.collect_neutral_spawns(&host);
        assert_eq!(alloc.len(), NEUTRAL_MIN_SLOTS);
        assert!(alloc.slots().iter().all(|s| s.position.x == 1.0));
    }

    #[test]
    fn test_neutral_name_scan_fallback() {
        let host = SimulatedHost::new();
        host.add_scene_node(SceneNode::new("BlueSpawnPoint", Vec3::new(1.0, 0.0, 0.0)));
        host.add_scene_node(SceneNode::new("Tree", Vec3::new(2.0, 0.0, 0.0)));
        host.add_scene_node(SceneNode::new("spawn_b", Vec3::new(3.0, 0.0, 0.0)));

        let mut alloc = SpawnAllocator::new(true);
        alloc.collect_neutral_spawns(&host);

        let xs: Vec<f32> = alloc.slots().iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_presets_without_portals() {
        let host = SimulatedHost::new().without_portals();
        let mut alloc = SpawnAllocator::new(true);
        alloc.collect_for_map_size(&host, MapSize::Small);

        assert_eq!(alloc.len(), 12);
        assert!(alloc.slots().iter().all(|s| s.portal.is_none()));
        assert_eq!(host.portal_attempts(), 1);
    }

    #[test]
    fn test_failing_portals_stop_after_first_error() {
        let host = SimulatedHost::new().with_failing_portals();
        let mut alloc = SpawnAllocator::new(true);
        alloc.collect_for_map_size(&host, MapSize::Large);

        assert_eq!(alloc.len(), 16);
        assert!(alloc.slots().iter().all(|s| s.portal.is_none()));
        assert_eq!(host.portal_attempts(), 1);
        assert_eq!(host.portal_count(), 0);
    }

    #[test]
    fn test_scan_adds_group_children() {
        let host = SimulatedHost::new();
        host.add_scene_node(
            SceneNode::new("p1", Vec3::new(500.0, 0.0, 0.0)).with_parent("ffa_large_spawns"),
        );
        host.add_scene_node(SceneNode::new("FFA_Large_Spawn_Extra", Vec3::new(600.0, 0.0, 0.0)));

        let mut alloc = SpawnAllocator::new(false);
        alloc.collect_for_map_size(&host, MapSize::Large);

        // Group child found, so the name scan does not run
        assert_eq!(alloc.len(), presets::LARGE.len() + 1);
        assert_eq!(alloc.slots().last().unwrap().position.x, 500.0);
    }

    #[test]
    fn test_scan_name_fallback() {
        let host = SimulatedHost::new();
        host.add_scene_node(SceneNode::new("ffamed_corner", Vec3::new(700.0, 0.0, 0.0)));

        let mut alloc = SpawnAllocator::new(false);
        alloc.collect_for_map_size(&host, MapSize::Small);
        assert_eq!(alloc.len(), presets::SMALL.len() + 1);
    }
}
