use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::collision::sleep::{pair_skip, skip_ticks};
use crate::collision::{
    CollisionSet, ColliderId, ColliderRef, PairTracker, SpeedBound, ZoneGrid, ZoneId, AWAKE,
    FORCE_WAKE,
};
use crate::error::Result;
use crate::world::config::SpatialMapConfig;

/// Counters describing the most recent detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Colliders examined this pass.
    pub awake: usize,
    /// Colliders skipped because their sleep timer was still running.
    pub asleep: usize,
    /// Distinct pairs that reached the broad phase.
    pub pairs_checked: usize,
    /// Pairs whose bounding circles touched.
    pub broad_hits: usize,
    /// Pairs confirmed by the narrow phase.
    pub confirmed: usize,
    /// Rings of zones searched around each zone.
    pub reach: usize,
}

#[derive(Default)]
struct PassCounters {
    pairs_checked: AtomicUsize,
    broad_hits: AtomicUsize,
}

/// Values every awake collider's starting sleep is derived from. Fixed for
/// the duration of one pass.
#[derive(Debug, Clone, Copy)]
struct SleepBounds {
    reach: usize,
    max_awake_radius: i64,
    max_awake_speed: i32,
    /// Smallest of the configured cap and every sleeper's remaining ticks.
    cap: i32,
}

/// Zone-partitioned collision coordinator.
///
/// Holds shared handles to every tracked collider and the fixed zone grid.
/// Each call to [`SpatialMap::detect_collisions`] ticks the sleep timers,
/// reassigns awake colliders to zones, checks every zone's candidate pairs in
/// parallel and returns the colliding pairs.
///
/// Between two passes no collider may move farther than the configured speed
/// bound. Callers that teleport colliders should call
/// [`SpatialMap::wake_all`] first.
pub struct SpatialMap {
    config: SpatialMapConfig,
    grid: ZoneGrid,
    colliders: FxHashMap<ColliderId, ColliderRef>,
    pool: Option<rayon::ThreadPool>,
    wake_pending: bool,
    last_stats: PassStats,
}

impl std::fmt::Debug for SpatialMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialMap")
            .field("config", &self.config)
            .field("colliders", &self.colliders.len())
            .field("wake_pending", &self.wake_pending)
            .field("last_stats", &self.last_stats)
            .finish()
    }
}

impl SpatialMap {
    /// Creates a map over a `width x height` world split into
    /// `x_zones x y_zones` zones, with `max_speed` bounding how far any
    /// collider moves per tick.
    pub fn new(width: i32, height: i32, max_speed: i32, x_zones: i32, y_zones: i32) -> Result<Self> {
        Self::with_config(SpatialMapConfig::new(width, height, max_speed, x_zones, y_zones))
    }

    pub fn with_config(config: SpatialMapConfig) -> Result<Self> {
        config.validate()?;
        let grid = ZoneGrid::new(config.width, config.height, config.x_zones, config.y_zones)?;
        let pool = match config.worker_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads.max(1))
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            grid,
            colliders: FxHashMap::default(),
            pool,
            wake_pending: false,
            last_stats: PassStats::default(),
        })
    }

    // --- Population ---

    /// Starts tracking a collider and assigns it to its zone right away.
    /// Returns false if it is already tracked.
    ///
    /// Every collider wakes on the next pass, since sleep timers handed out
    /// so far did not account for the newcomer.
    pub fn add_collider(&mut self, collider: ColliderRef) -> bool {
        let id = collider.id();
        if self.colliders.contains_key(&id) {
            return false;
        }
        if self.config.speed_bound == SpeedBound::Global && collider.max_speed() > self.config.max_speed {
            log::warn!(
                "Collider {} may move {} per tick, above the map bound of {}",
                id,
                collider.max_speed(),
                self.config.max_speed
            );
        }
        let zone = self.grid.insert(&collider);
        log::trace!("Tracking collider {} in {}", id, zone);
        self.colliders.insert(id, collider);
        self.wake_pending = true;
        true
    }

    /// Adds a batch. Returns how many were not already tracked.
    pub fn add_colliders<I>(&mut self, colliders: I) -> usize
    where
        I: IntoIterator<Item = ColliderRef>,
    {
        colliders
            .into_iter()
            .filter(|collider| self.add_collider(collider.clone()))
            .count()
    }

    /// Stops tracking a collider and clears its zone back-reference.
    pub fn remove_collider(&mut self, id: ColliderId) -> Option<ColliderRef> {
        let collider = self.colliders.remove(&id)?;
        self.grid.remove(&collider);
        Some(collider)
    }

    /// Removes a batch, returning the handles that were tracked.
    pub fn remove_colliders<I>(&mut self, ids: I) -> Vec<ColliderRef>
    where
        I: IntoIterator<Item = ColliderId>,
    {
        ids.into_iter().filter_map(|id| self.remove_collider(id)).collect()
    }

    /// Makes every collider examined on the next pass regardless of its
    /// sleep timer.
    pub fn wake_all(&mut self) {
        self.wake_pending = true;
    }

    // --- Queries ---

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.colliders.contains_key(&id)
    }

    pub fn get(&self, id: ColliderId) -> Option<&ColliderRef> {
        self.colliders.get(&id)
    }

    pub fn colliders(&self) -> impl Iterator<Item = &ColliderRef> {
        self.colliders.values()
    }

    pub fn grid(&self) -> &ZoneGrid {
        &self.grid
    }

    pub fn config(&self) -> &SpatialMapConfig {
        &self.config
    }

    pub fn last_stats(&self) -> &PassStats {
        &self.last_stats
    }

    // --- Detection ---

    /// Runs one detection pass and returns every colliding pair exactly once.
    ///
    /// On error no pairs are returned, and every collider is woken on the
    /// next pass because timers written by the aborted pass are incomplete.
    pub fn detect_collisions(&mut self) -> Result<CollisionSet> {
        self.advance_sleep_timers();
        let awake = self.reassign_zones();
        let bounds = self.sleep_bounds(&awake);
        self.seed_sleep_times(&awake, &bounds);

        let tracker = PairTracker::new();
        let counters = PassCounters::default();
        if let Err(err) = self.run_zone_tasks(&tracker, &counters, bounds.reach) {
            log::warn!("Detection pass aborted, waking all colliders: {}", err);
            self.wake_pending = true;
            return Err(err);
        }
        let pairs = tracker.drain_confirmed_pairs();

        self.last_stats = PassStats {
            awake: awake.len(),
            asleep: self.colliders.len() - awake.len(),
            pairs_checked: counters.pairs_checked.into_inner(),
            broad_hits: counters.broad_hits.into_inner(),
            confirmed: pairs.len(),
            reach: bounds.reach,
        };
        log::trace!("Detection pass: {:?}", self.last_stats);
        Ok(pairs)
    }

    // --- Helper Methods ---

    /// Counts every running timer down by one and turns forced wakes into
    /// plain wakes.
    fn advance_sleep_timers(&mut self) {
        let wake_everyone = std::mem::take(&mut self.wake_pending);
        for collider in self.colliders.values() {
            let sleep = collider.sleep_time();
            if wake_everyone || sleep < AWAKE {
                collider.set_sleep_time(AWAKE);
            } else if sleep > AWAKE {
                collider.set_sleep_time(sleep - 1);
            }
        }
    }

    /// Rebuilds zone membership from the awake colliders. Sleepers keep
    /// their old back-reference and take no part in this pass.
    fn reassign_zones(&mut self) -> Vec<ColliderRef> {
        self.grid.clear();
        let mut awake = Vec::new();
        for collider in self.colliders.values() {
            if collider.sleep_time() == AWAKE {
                self.grid.insert(collider);
                awake.push(collider.clone());
            }
        }
        awake
    }

    fn sleep_bounds(&self, awake: &[ColliderRef]) -> SleepBounds {
        let max_awake_radius = awake
            .iter()
            .map(|collider| i64::from(collider.collision_radius()))
            .max()
            .unwrap_or(0);
        let max_awake_speed = awake
            .iter()
            .map(|collider| collider.max_speed())
            .max()
            .unwrap_or(0);
        // A new sleep must end no later than any current one.
        let cap = self
            .colliders
            .values()
            .map(|collider| collider.sleep_time())
            .filter(|sleep| *sleep > AWAKE)
            .fold(self.config.sleep_cap(), i32::min);

        SleepBounds {
            reach: self.grid.reach_for(2 * max_awake_radius),
            max_awake_radius,
            max_awake_speed,
            cap,
        }
    }

    fn closing_speed(&self, a: i32, b: i32) -> i64 {
        self.config.speed_bound.closing_speed(self.config.max_speed, a, b)
    }

    /// Gives every awake collider the longest sleep that colliders it will
    /// never be paired with this pass cannot cut short. Pair checks only
    /// lower it from here.
    fn seed_sleep_times(&self, awake: &[ColliderRef], bounds: &SleepBounds) {
        let min_extent = i64::from(self.grid.min_zone_extent());
        let refine_fringe = self.config.fringe_only && self.grid.zone_count() > 1;

        for collider in awake {
            let Some(zone) = collider.zone() else {
                continue;
            };
            let closing = self.closing_speed(collider.max_speed(), bounds.max_awake_speed);
            let radius = i64::from(collider.collision_radius());
            let mut sleep = bounds.cap;

            // Anything outside the searched ring starts more than
            // reach * min_extent away.
            if !self.grid.ring_covers_grid(zone, bounds.reach) {
                let horizon = bounds.reach as i64 * min_extent - radius - bounds.max_awake_radius;
                sleep = sleep.min(skip_ticks(horizon, closing));
            }
            if refine_fringe {
                sleep = sleep.min(self.fringe_margin_ticks(collider, zone, closing));
            }
            collider.set_sleep_time(sleep);
        }
    }

    /// Interior colliders are invisible to neighbouring zones under the
    /// fringe-only refinement, so they may only sleep while they cannot
    /// reach their own zone's edge.
    fn fringe_margin_ticks(&self, collider: &ColliderRef, zone: ZoneId, closing: i64) -> i32 {
        match self.grid.zone(zone) {
            Some(zone) if !zone.is_fringe(collider) => skip_ticks(zone.edge_margin(collider), closing),
            _ => i32::MAX,
        }
    }

    fn run_zone_tasks(&self, tracker: &PairTracker, counters: &PassCounters, reach: usize) -> Result<()> {
        let task = || {
            self.grid
                .zones()
                .par_iter()
                .filter(|zone| !zone.is_empty())
                .try_for_each(|zone| self.check_zone(zone.id(), reach, tracker, counters))
        };
        match &self.pool {
            Some(pool) => pool.install(task),
            None => task(),
        }
    }

    /// Broad and narrow phase over one zone's candidate list.
    fn check_zone(
        &self,
        zone: ZoneId,
        reach: usize,
        tracker: &PairTracker,
        counters: &PassCounters,
    ) -> Result<()> {
        let candidates = self.grid.candidates(zone, reach, self.config.fringe_only);

        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                // Boundary colliders show up in several zones' lists.
                if !tracker.record_checked(a.id(), b.id()) {
                    continue;
                }
                counters.pairs_checked.fetch_add(1, Ordering::Relaxed);

                let distance_squared = a.position().distance_squared(b.position());
                let radius_sum = i64::from(a.collision_radius()) + i64::from(b.collision_radius());

                if distance_squared <= radius_sum * radius_sum {
                    counters.broad_hits.fetch_add(1, Ordering::Relaxed);
                    a.state().lower_sleep_time(FORCE_WAKE);
                    b.state().lower_sleep_time(FORCE_WAKE);
                    if a.precise_collides(b.as_ref())? {
                        tracker.record_confirmed(a.id(), b.id());
                    }
                } else {
                    let closing = self.closing_speed(a.max_speed(), b.max_speed());
                    let skip = pair_skip(distance_squared, radius_sum, closing);
                    a.state().lower_sleep_time(skip);
                    b.state().lower_sleep_time(skip);
                }
            }
        }
        Ok(())
    }
}
