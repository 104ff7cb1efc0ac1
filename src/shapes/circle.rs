#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub radius: i32,
}

impl Circle {
    pub fn new(radius: i32) -> Self {
        assert!(radius >= 0, "Circle radius cannot be negative");
        Self { radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_new() {
        let c = Circle::new(5);
        assert_eq!(c.radius, 5);
    }

    #[test]
    #[should_panic]
    fn test_circle_new_negative_radius() {
        Circle::new(-1);
    }
}
