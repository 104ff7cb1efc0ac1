// Exact (narrow-phase) overlap tests between the built-in shapes.
//
// All tests are inclusive: shapes that merely touch collide. Squares have
// half-unit edges when their size is odd, so square math is done in doubled
// coordinates.

use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Shape, Square};

/// True if two closed intervals `[a_min, a_max]` and `[b_min, b_max]` share a point.
#[inline]
fn intervals_overlap((a_min, a_max): (i64, i64), (b_min, b_max): (i64, i64)) -> bool {
    a_max >= b_min && b_max >= a_min
}

/// Checks for overlap between two axis-aligned squares.
pub fn check_square_square(square_a: &Square, pos_a: Vec2, square_b: &Square, pos_b: Vec2) -> bool {
    let x_overlap = intervals_overlap(
        square_a.doubled_interval(pos_a.x),
        square_b.doubled_interval(pos_b.x),
    );
    let y_overlap = intervals_overlap(
        square_a.doubled_interval(pos_a.y),
        square_b.doubled_interval(pos_b.y),
    );
    x_overlap && y_overlap
}

/// Checks for overlap between two circles.
pub fn check_circle_circle(circle_a: &Circle, pos_a: Vec2, circle_b: &Circle, pos_b: Vec2) -> bool {
    let radii_sum = i64::from(circle_a.radius) + i64::from(circle_b.radius);
    pos_a.distance_squared(pos_b) <= radii_sum * radii_sum
}

/// Checks for overlap between a circle and an axis-aligned square.
pub fn check_circle_square(circle: &Circle, circle_pos: Vec2, square: &Square, square_pos: Vec2) -> bool {
    let (min_x, max_x) = square.doubled_interval(square_pos.x);
    let (min_y, max_y) = square.doubled_interval(square_pos.y);
    let cx = 2 * i64::from(circle_pos.x);
    let cy = 2 * i64::from(circle_pos.y);

    // Closest point of the square to the circle centre
    let dx = cx - cx.clamp(min_x, max_x);
    let dy = cy - cy.clamp(min_y, max_y);
    let r = 2 * i64::from(circle.radius);
    dx * dx + dy * dy <= r * r
}

/// Dispatches on both shapes and runs the matching exact test.
pub fn shapes_overlap(shape_a: &Shape, pos_a: Vec2, shape_b: &Shape, pos_b: Vec2) -> bool {
    match (shape_a, shape_b) {
        (Shape::Square(a), Shape::Square(b)) => check_square_square(a, pos_a, b, pos_b),
        (Shape::Circle(a), Shape::Circle(b)) => check_circle_circle(a, pos_a, b, pos_b),
        (Shape::Circle(c), Shape::Square(s)) => check_circle_square(c, pos_a, s, pos_b),
        (Shape::Square(s), Shape::Circle(c)) => check_circle_square(c, pos_b, s, pos_a),
    }
}
