use std::collections::BTreeSet;
use std::fmt;

use crate::collision::ColliderId;

/// An unordered pair of colliders, stored canonically as `(lower id, higher id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderPair {
    first: ColliderId,
    second: ColliderId,
}

impl ColliderPair {
    /// Builds the canonical pair. Returns `None` for a self-pair.
    pub fn new(a: ColliderId, b: ColliderId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> ColliderId {
        self.first
    }

    pub fn second(&self) -> ColliderId {
        self.second
    }
}

impl fmt::Display for ColliderPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Result of one detection pass: every colliding pair, each exactly once.
pub type CollisionSet = BTreeSet<ColliderPair>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ColliderState;
    use crate::math::vec2::Vec2;

    fn two_ids() -> (ColliderId, ColliderId) {
        let a = ColliderState::new(Vec2::ZERO).id();
        let b = ColliderState::new(Vec2::ZERO).id();
        (a, b)
    }

    #[test]
    fn test_pair_is_canonical() {
        let (a, b) = two_ids();
        assert_eq!(ColliderPair::new(a, b), ColliderPair::new(b, a));
        let pair = ColliderPair::new(b, a).unwrap();
        assert!(pair.first() < pair.second());
    }

    #[test]
    fn test_self_pair_rejected() {
        let (a, _) = two_ids();
        assert!(ColliderPair::new(a, a).is_none());
    }
}
