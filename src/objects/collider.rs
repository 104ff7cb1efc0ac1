use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::collision::aabb::Aabb;
use crate::collision::detection;
use crate::collision::sleep::ceil_sqrt;
use crate::collision::{Collidable, ColliderState};
use crate::error::{CollisionError, Result};
use crate::math::vec2::{AtomicVec2, Vec2};
use crate::shapes::{Circle, Shape, Square};

/// A moving shape that can be tracked by a `SpatialMap`.
///
/// Position and velocity sit behind atomics so the caller can keep an
/// `Arc<Collider>` and move it between detection passes while the map holds
/// its own handle.
#[derive(Debug)]
pub struct Collider {
    state: ColliderState,
    shape: Shape,
    velocity: AtomicVec2,
    max_speed: AtomicI32,
}

/// Euclidean length of a velocity, rounded up.
fn speed_of(velocity: Vec2) -> i32 {
    i32::try_from(ceil_sqrt(velocity.magnitude_squared())).unwrap_or(i32::MAX)
}

impl Collider {
    /// Creates a stationary collider centred at `position`.
    pub fn new(shape: impl Into<Shape>, position: Vec2) -> Self {
        Self {
            state: ColliderState::new(position),
            shape: shape.into(),
            velocity: AtomicVec2::new(Vec2::ZERO),
            max_speed: AtomicI32::new(0),
        }
    }

    /// An axis-aligned square of side `size` centred at `(x, y)`.
    pub fn square(x: i32, y: i32, size: i32) -> Self {
        Self::new(Square::new(size), Vec2::new(x, y))
    }

    /// A circle of the given radius centred at `(x, y)`.
    pub fn circle(x: i32, y: i32, radius: i32) -> Self {
        Self::new(Circle::new(radius), Vec2::new(x, y))
    }

    /// Sets the per-tick velocity. The speed bound grows to cover it.
    pub fn with_velocity(self, x: i32, y: i32) -> Self {
        self.set_velocity(Vec2::new(x, y));
        self
    }

    /// Declares a speed bound larger than the current velocity needs, for
    /// objects that will later be accelerated.
    pub fn with_max_speed(self, max_speed: i32) -> Self {
        self.max_speed.fetch_max(max_speed, Ordering::AcqRel);
        self
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.load()
    }

    pub fn set_velocity(&self, velocity: Vec2) {
        self.velocity.store(velocity);
        self.max_speed.fetch_max(speed_of(velocity), Ordering::AcqRel);
    }

    /// Moves the collider by one tick of velocity.
    ///
    /// With `world` bounds, the position is clamped inside them and any
    /// velocity component that pushed it out is reflected, so the object
    /// bounces off the walls. The displacement never exceeds the velocity.
    pub fn advance(&self, world: Option<&Aabb>) {
        let mut velocity = self.velocity();
        let mut next = self.position() + velocity;

        if let Some(bounds) = world {
            if next.x < bounds.min.x || next.x > bounds.max.x {
                velocity.x = -velocity.x;
            }
            if next.y < bounds.min.y || next.y > bounds.max.y {
                velocity.y = -velocity.y;
            }
            next = next.clamp(bounds.min, bounds.max);
            self.velocity.store(velocity);
        }
        self.set_position(next);
    }
}

impl fmt::Display for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.shape.name(), self.id(), self.position())
    }
}

impl Collidable for Collider {
    fn state(&self) -> &ColliderState {
        &self.state
    }

    fn max_speed(&self) -> i32 {
        self.max_speed.load(Ordering::Acquire)
    }

    fn collision_radius(&self) -> i32 {
        self.shape.bounding_radius()
    }

    fn precise_collides(&self, other: &dyn Collidable) -> Result<bool> {
        let Some(other_shape) = other.shape() else {
            return Err(CollisionError::ShapeMismatch {
                left: self.id(),
                right: other.id(),
            });
        };
        Ok(detection::shapes_overlap(
            &self.shape,
            self.position(),
            other_shape,
            other.position(),
        ))
    }

    fn shape(&self) -> Option<&Shape> {
        Some(&self.shape)
    }
}
