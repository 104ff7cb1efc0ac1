pub mod circle;
pub mod square;

// Re-export the specific shape types
pub use circle::Circle;
pub use square::Square;

/// Enum representing the geometry of a collider. The narrow phase dispatches
/// on this tag, so every combination of variants has an exact test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square(Square),
    Circle(Circle),
}

impl Shape {
    /// Radius of the smallest origin-centred circle enclosing the shape,
    /// rounded up to a whole unit.
    pub fn bounding_radius(&self) -> i32 {
        match self {
            Shape::Square(square) => square.circumradius(),
            Shape::Circle(circle) => circle.radius,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Square(_) => "square",
            Shape::Circle(_) => "circle",
        }
    }
}

impl From<Square> for Shape {
    fn from(square: Square) -> Self {
        Shape::Square(square)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
