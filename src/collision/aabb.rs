// Defines an integer Axis-Aligned Bounding Box

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
/// Both corners are inclusive: a point lying exactly on an edge is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new Aabb.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        // Ensure min coordinates are <= max coordinates
        Aabb {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Builds the box `[min_x, max_x] x [min_y, max_y]`.
    pub fn from_bounds(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    /// True iff the point lies within the box, edges included.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }

    /// Smallest distance from a circle of radius `radius` centred at `center`
    /// to any edge of this box, measured inward. Zero or negative when the
    /// circle touches or crosses an edge.
    pub fn inner_margin(&self, center: Vec2, radius: i32) -> i64 {
        let r = i64::from(radius);
        let left = i64::from(center.x) - i64::from(self.min.x);
        let right = i64::from(self.max.x) - i64::from(center.x);
        let bottom = i64::from(center.y) - i64::from(self.min.y);
        let top = i64::from(self.max.y) - i64::from(center.y);
        left.min(right).min(bottom).min(top) - r
    }
}
