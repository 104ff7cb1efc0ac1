//! Zone-partitioned 2D collision detection.
//!
//! A [`SpatialMap`] splits the world into a fixed grid of zones and, once
//! per tick, reports every pair of tracked colliders that overlap. Colliders
//! that are provably too far from everything to collide soon are put to
//! sleep and skipped, and zones are checked in parallel.

pub mod collision;
pub mod error;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{
    Collidable, ColliderId, ColliderPair, ColliderRef, ColliderState, CollisionSet,
    ReferenceDetector, SpeedBound,
};
pub use error::{CollisionError, Result};
pub use math::vec2::Vec2;
pub use objects::Collider;
pub use shapes::{Circle, Shape, Square};
pub use world::{PassStats, SpatialMap, SpatialMapConfig};
