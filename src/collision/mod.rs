pub mod aabb;
pub mod collidable;
pub mod detection;
pub mod pair;
pub mod pair_tracker;
pub mod reference;
pub mod sleep;
pub mod spatial_grid;
pub mod zone;

pub use aabb::Aabb;
pub use collidable::{Collidable, ColliderId, ColliderRef, ColliderState};
pub use pair::{ColliderPair, CollisionSet};
pub use pair_tracker::PairTracker;
pub use reference::ReferenceDetector;
pub use sleep::{SpeedBound, AWAKE, FORCE_WAKE};
pub use spatial_grid::ZoneGrid;
pub use zone::{Zone, ZoneId};
