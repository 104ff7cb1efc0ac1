// A single cell of the zone grid.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::collision::aabb::Aabb;
use crate::collision::{ColliderId, ColliderRef};

/// Index of a zone in its grid (row-major). Non-owning: a collider's zone
/// back-reference is one of these, never a pointer to the zone itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(usize);

impl ZoneId {
    pub const fn new(index: usize) -> Self {
        ZoneId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

/// A fixed axis-aligned grid cell.
///
/// Owns the set of colliders assigned to it this tick (cleared and refilled
/// every pass) and a static list of its 8-neighbourhood, filled once when the
/// grid is built.
#[derive(Debug)]
pub struct Zone {
    id: ZoneId,
    col: usize,
    row: usize,
    bounds: Aabb,
    members: FxHashMap<ColliderId, ColliderRef>,
    adjacent: Vec<ZoneId>,
}

impl Zone {
    pub(crate) fn new(id: ZoneId, col: usize, row: usize, bounds: Aabb, adjacent: Vec<ZoneId>) -> Self {
        Self {
            id,
            col,
            row,
            bounds,
            members: FxHashMap::default(),
            adjacent,
        }
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Grid coordinates `(col, row)` of this zone.
    pub fn cell(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn adjacent(&self) -> &[ZoneId] {
        &self.adjacent
    }

    /// True iff the point lies within this zone, all four edges included.
    pub fn within_bounds(&self, x: i32, y: i32) -> bool {
        self.bounds.contains(x, y)
    }

    /// Adds a member. Returns false (and changes nothing) if already present.
    pub fn add_member(&mut self, collider: ColliderRef) -> bool {
        let id = collider.id();
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(id, collider);
        true
    }

    pub fn remove_member(&mut self, id: ColliderId) -> Option<ColliderRef> {
        self.members.remove(&id)
    }

    pub fn clear_members(&mut self) {
        self.members.clear();
    }

    pub fn members(&self) -> impl Iterator<Item = &ColliderRef> {
        self.members.values()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Distance from the collider's bounding circle to the nearest edge of
    /// this zone, measured inward.
    pub fn edge_margin(&self, collider: &ColliderRef) -> i64 {
        self.bounds.inner_margin(collider.position(), collider.collision_radius())
    }

    /// A fringe object's bounding circle reaches or crosses this zone's edge.
    pub fn is_fringe(&self, collider: &ColliderRef) -> bool {
        self.edge_margin(collider) <= 0
    }

    /// Union of this zone's members and every adjacent zone's members,
    /// without duplicates. `zones` is the grid this zone belongs to.
    pub fn compute_candidates(&self, zones: &[Zone]) -> Vec<ColliderRef> {
        let mut seen = FxHashSet::default();
        let mut candidates = Vec::with_capacity(self.members.len());

        let neighbours = self.adjacent.iter().filter_map(|id| zones.get(id.index()));
        for zone in std::iter::once(self).chain(neighbours) {
            for (id, collider) in &zone.members {
                if seen.insert(*id) {
                    candidates.push(collider.clone());
                }
            }
        }
        candidates
    }
}
