// Brute-force all-pairs detector used as ground truth.

use crate::collision::pair::{ColliderPair, CollisionSet};
use crate::collision::ColliderRef;
use crate::error::Result;

/// Tests every unordered pair of an explicit list with the exact narrow
/// phase. No zones, no sleep pruning, no threads.
#[derive(Debug, Default)]
pub struct ReferenceDetector {
    colliders: Vec<ColliderRef>,
}

impl ReferenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, collider: ColliderRef) {
        self.colliders.push(collider);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn detect_collisions(&self) -> Result<CollisionSet> {
        let mut pairs = CollisionSet::new();
        for (i, a) in self.colliders.iter().enumerate() {
            for b in &self.colliders[i + 1..] {
                let Some(pair) = ColliderPair::new(a.id(), b.id()) else {
                    continue;
                };
                if a.precise_collides(b.as_ref())? {
                    pairs.insert(pair);
                }
            }
        }
        Ok(pairs)
    }
}

impl FromIterator<ColliderRef> for ReferenceDetector {
    fn from_iter<I: IntoIterator<Item = ColliderRef>>(iter: I) -> Self {
        Self {
            colliders: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Collider;
    use std::sync::Arc;

    #[test]
    fn test_reference_all_pairs() {
        let a: ColliderRef = Arc::new(Collider::square(30, 30, 10));
        let b: ColliderRef = Arc::new(Collider::square(31, 31, 10));
        let c: ColliderRef = Arc::new(Collider::square(32, 32, 10));
        let far: ColliderRef = Arc::new(Collider::square(80, 80, 10));
        let detector: ReferenceDetector = [a.clone(), b.clone(), c.clone(), far].into_iter().collect();

        let pairs = detector.detect_collisions().unwrap();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&ColliderPair::new(a.id(), c.id()).unwrap()));
    }

    #[test]
    fn test_reference_ignores_duplicate_entries() {
        let a: ColliderRef = Arc::new(Collider::square(30, 30, 10));
        let mut detector = ReferenceDetector::new();
        detector.add(a.clone());
        detector.add(a);
        assert_eq!(detector.len(), 2);
        assert!(detector.detect_collisions().unwrap().is_empty());
    }
}
