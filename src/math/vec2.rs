use std::fmt;
use std::ops::Add;
use std::sync::atomic::{AtomicI32, Ordering};

/// An integer 2D vector. Positions and velocities in the collision world are
/// whole units, so all distance math stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };

    /// Creates a new Vec2.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Dot product, widened to i64 so it cannot overflow.
    pub fn dot(self, other: Self) -> i64 {
        i64::from(self.x) * i64::from(other.x) + i64::from(self.y) * i64::from(other.y)
    }

    /// Squared magnitude, widened to i64.
    pub fn magnitude_squared(self) -> i64 {
        self.dot(self)
    }

    /// Squared distance between two points.
    /// Computed on widened components so points at opposite ends of the i32
    /// range do not wrap.
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Component-wise clamp into `[min, max]`.
    pub fn clamp(self, min: Vec2, max: Vec2) -> Self {
        Self::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }
}

/// A `Vec2` that can be read and written through a shared reference.
///
/// Collidables are shared between the caller and the detection workers via
/// `Arc`, so their position and velocity live in atomics. The two components
/// are stored independently: a reader racing a writer may observe a torn
/// value, which is why writes are only allowed between detection passes.
#[derive(Debug, Default)]
pub struct AtomicVec2 {
    x: AtomicI32,
    y: AtomicI32,
}

impl AtomicVec2 {
    pub fn new(value: Vec2) -> Self {
        Self {
            x: AtomicI32::new(value.x),
            y: AtomicI32::new(value.y),
        }
    }

    pub fn load(&self) -> Vec2 {
        Vec2::new(self.x.load(Ordering::Acquire), self.y.load(Ordering::Acquire))
    }

    pub fn store(&self, value: Vec2) {
        self.x.store(value.x, Ordering::Release);
        self.y.store(value.y, Ordering::Release);
    }
}
