use crate::collision::sleep::ceil_sqrt;

/// An axis-aligned square of side `size`, centred on its collider's position.
/// Odd sizes put the edges on half units; the narrow phase works in doubled
/// coordinates so they stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pub size: i32,
}

impl Square {
    pub fn new(size: i32) -> Self {
        assert!(size >= 0, "Square size cannot be negative");
        Self { size }
    }

    /// Circumscribed-circle radius `ceil(sqrt(2) * size / 2)`, i.e. the
    /// smallest `r` with `2 * r^2 >= size^2`.
    pub fn circumradius(&self) -> i32 {
        let size = i64::from(self.size);
        // ceil(size^2 / 2) is the smallest square r^2 may be.
        let r = ceil_sqrt((size * size + 1) / 2);
        i32::try_from(r).unwrap_or(i32::MAX)
    }

    /// Edges of the square along one axis, in doubled coordinates.
    pub(crate) fn doubled_interval(&self, center: i32) -> (i64, i64) {
        let c = 2 * i64::from(center);
        let size = i64::from(self.size);
        (c - size, c + size)
    }
}
