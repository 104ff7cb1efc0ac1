// The capability contract every object tracked by a spatial map must meet.

use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::collision::sleep::AWAKE;
use crate::collision::zone::ZoneId;
use crate::error::Result;
use crate::math::vec2::{AtomicVec2, Vec2};
use crate::shapes::Shape;

static NEXT_COLLIDER_ID: AtomicU64 = AtomicU64::new(1);

// Zone back-reference value meaning "not assigned yet".
const NO_ZONE: usize = usize::MAX;

/// Opaque identity of a collidable. Allocated once per `ColliderState`, never
/// reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderId(u64);

impl ColliderId {
    fn next() -> Self {
        ColliderId(NEXT_COLLIDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The mutable bookkeeping a spatial map needs from every collidable:
/// identity, position, sleep countdown and zone back-reference.
///
/// Everything is atomic so a collidable can be shared as `Arc<dyn Collidable>`
/// between the caller and the detection workers. The sleep timer is the only
/// field written concurrently during a pass, and it is only ever lowered there
/// (see [`ColliderState::lower_sleep_time`]).
#[derive(Debug)]
pub struct ColliderState {
    id: ColliderId,
    position: AtomicVec2,
    sleep_time: AtomicI32,
    zone: AtomicUsize,
}

impl ColliderState {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: ColliderId::next(),
            position: AtomicVec2::new(position),
            sleep_time: AtomicI32::new(AWAKE),
            zone: AtomicUsize::new(NO_ZONE),
        }
    }

    pub fn id(&self) -> ColliderId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position.load()
    }

    pub fn set_position(&self, position: Vec2) {
        self.position.store(position);
    }

    pub fn sleep_time(&self) -> i32 {
        self.sleep_time.load(Ordering::Acquire)
    }

    pub fn set_sleep_time(&self, ticks: i32) {
        self.sleep_time.store(ticks, Ordering::Release);
    }

    /// Monotone-minimum update: the stored value becomes `min(current, ticks)`.
    /// Returns the value held before the update.
    pub fn lower_sleep_time(&self, ticks: i32) -> i32 {
        self.sleep_time.fetch_min(ticks, Ordering::AcqRel)
    }

    pub fn zone(&self) -> Option<ZoneId> {
        match self.zone.load(Ordering::Acquire) {
            NO_ZONE => None,
            index => Some(ZoneId::new(index)),
        }
    }

    pub fn set_zone(&self, zone: Option<ZoneId>) {
        let raw = zone.map_or(NO_ZONE, ZoneId::index);
        self.zone.store(raw, Ordering::Release);
    }
}

/// An entity the spatial map can detect collisions for.
///
/// Implementors embed a [`ColliderState`] and expose it through `state()`;
/// the provided methods give the position / sleep / zone accessors the
/// coordinator uses. `precise_collides` is the exact overlap test run after a
/// broad-phase hit.
pub trait Collidable: Send + Sync + fmt::Debug {
    /// The shared bookkeeping cell for this object.
    fn state(&self) -> &ColliderState;

    /// Upper bound on how far this object moves in one tick.
    fn max_speed(&self) -> i32;

    /// Radius of a circle centred on the position that encloses the whole shape.
    fn collision_radius(&self) -> i32;

    /// Exact geometric overlap test.
    ///
    /// Returns `CollisionError::ShapeMismatch` when `other` is a shape this
    /// implementation does not know how to test against.
    fn precise_collides(&self, other: &dyn Collidable) -> Result<bool>;

    /// The built-in shape backing this object, if any. Used for narrow-phase
    /// dispatch between objects from this crate.
    fn shape(&self) -> Option<&Shape> {
        None
    }

    fn id(&self) -> ColliderId {
        self.state().id()
    }

    fn position(&self) -> Vec2 {
        self.state().position()
    }

    fn set_position(&self, position: Vec2) {
        self.state().set_position(position);
    }

    fn sleep_time(&self) -> i32 {
        self.state().sleep_time()
    }

    fn set_sleep_time(&self, ticks: i32) {
        self.state().set_sleep_time(ticks);
    }

    fn zone(&self) -> Option<ZoneId> {
        self.state().zone()
    }

    fn set_zone(&self, zone: Option<ZoneId>) {
        self.state().set_zone(zone);
    }
}

/// Shared handle to a collidable. The spatial map holds these; the objects
/// themselves are owned by whoever created them.
pub type ColliderRef = Arc<dyn Collidable>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::sleep::FORCE_WAKE;
    use std::thread;

    #[test]
    fn test_collider_ids_are_unique() {
        let a = ColliderState::new(Vec2::ZERO);
        let b = ColliderState::new(Vec2::ZERO);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_state_defaults() {
        let state = ColliderState::new(Vec2::new(3, 4));
        assert_eq!(state.position(), Vec2::new(3, 4));
        assert_eq!(state.sleep_time(), AWAKE);
        assert_eq!(state.zone(), None);
    }

    #[test]
    fn test_zone_back_reference_round_trip() {
        let state = ColliderState::new(Vec2::ZERO);
        state.set_zone(Some(ZoneId::new(7)));
        assert_eq!(state.zone(), Some(ZoneId::new(7)));
        state.set_zone(None);
        assert_eq!(state.zone(), None);
    }

    #[test]
    fn test_lower_sleep_time_is_monotone() {
        let state = ColliderState::new(Vec2::ZERO);
        state.set_sleep_time(10);
        state.lower_sleep_time(4);
        assert_eq!(state.sleep_time(), 4);
        state.lower_sleep_time(9);
        assert_eq!(state.sleep_time(), 4);
        state.lower_sleep_time(FORCE_WAKE);
        assert_eq!(state.sleep_time(), FORCE_WAKE);
    }

    #[test]
    fn test_lower_sleep_time_under_contention_keeps_minimum() {
        let state = Arc::new(ColliderState::new(Vec2::ZERO));
        state.set_sleep_time(i32::MAX);

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    for step in 0..1000 {
                        state.lower_sleep_time(1000 + worker * 1000 - step);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Worker 0 proposes 1000 down to 1.
        assert_eq!(state.sleep_time(), 1);
    }
}
