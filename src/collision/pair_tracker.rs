// Thread-safe symmetric record of which colliders were examined together
// during one detection pass, and which of those pairs actually collide.

use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use rustc_hash::{FxHashMap, FxHashSet, FxHasher};

use crate::collision::pair::{ColliderPair, CollisionSet};
use crate::collision::ColliderId;

const SHARD_COUNT: usize = 32;

type Adjacency = FxHashMap<ColliderId, FxHashSet<ColliderId>>;

/// A map from collider to partner set, split across lock shards by key hash.
#[derive(Debug)]
struct ShardedAdjacency {
    shards: Vec<Mutex<Adjacency>>,
}

impl ShardedAdjacency {
    fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(Adjacency::default())).collect(),
        }
    }

    fn shard_for(&self, key: ColliderId) -> &Mutex<Adjacency> {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        // Truncation is fine, only the low bits pick a shard.
        &self.shards[hasher.finish() as usize % self.shards.len()]
    }

    /// Adds `value` to `key`'s partner set. Returns true if it was not there.
    fn insert(&self, key: ColliderId, value: ColliderId) -> bool {
        // A poisoned shard only means another worker panicked mid-insert; the
        // set itself is still a valid set.
        let mut shard = self.shard_for(key).lock().unwrap_or_else(PoisonError::into_inner);
        shard.entry(key).or_default().insert(value)
    }

    /// Merges all shards into one map. Needs exclusive access, so no locking.
    fn into_merged(self) -> Adjacency {
        let mut merged = Adjacency::default();
        for shard in self.shards {
            merged.extend(shard.into_inner().unwrap_or_else(PoisonError::into_inner));
        }
        merged
    }
}

/// Per-pass pair bookkeeping shared by all zone workers.
///
/// Every insert is symmetric. The canonical side (lower id) is written first,
/// so when two workers discover the same pair concurrently exactly one of them
/// sees `record_checked` return true and processes it.
#[derive(Debug)]
pub struct PairTracker {
    checked: ShardedAdjacency,
    confirmed: ShardedAdjacency,
}

impl Default for PairTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PairTracker {
    pub fn new() -> Self {
        Self {
            checked: ShardedAdjacency::new(),
            confirmed: ShardedAdjacency::new(),
        }
    }

    /// Records that `a` and `b` were examined together.
    /// Returns true if this call is the first to record the pair; false for
    /// a duplicate discovery or a self-pair.
    pub fn record_checked(&self, a: ColliderId, b: ColliderId) -> bool {
        Self::insert_symmetric(&self.checked, a, b)
    }

    /// Records that `a` and `b` collide.
    pub fn record_confirmed(&self, a: ColliderId, b: ColliderId) {
        Self::insert_symmetric(&self.confirmed, a, b);
    }

    fn insert_symmetric(map: &ShardedAdjacency, a: ColliderId, b: ColliderId) -> bool {
        let Some(pair) = ColliderPair::new(a, b) else {
            return false;
        };
        let first_time = map.insert(pair.first(), pair.second());
        if first_time {
            map.insert(pair.second(), pair.first());
        }
        first_time
    }

    /// Flattens the confirmed records into canonical pairs, consuming the
    /// tracker. Each key emits its partners once, then its own entry is
    /// removed from every partner's set so the mirror is never emitted again.
    pub fn drain_confirmed_pairs(self) -> CollisionSet {
        let mut confirmed = self.confirmed.into_merged();
        let mut pairs = CollisionSet::new();

        let keys: Vec<ColliderId> = confirmed.keys().copied().collect();
        for key in keys {
            let Some(partners) = confirmed.remove(&key) else {
                continue;
            };
            for partner in partners {
                if let Some(pair) = ColliderPair::new(key, partner) {
                    pairs.insert(pair);
                }
                if let Some(mirror) = confirmed.get_mut(&partner) {
                    mirror.remove(&key);
                }
            }
        }
        pairs
    }
}
