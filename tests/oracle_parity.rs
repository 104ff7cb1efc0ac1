// The spatial map must report exactly what the brute-force detector reports,
// tick after tick, no matter how much work sleep pruning skips.

use std::sync::Arc;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use collision_zones::collision::Aabb;
use collision_zones::{
    Collidable, Collider, ColliderRef, ReferenceDetector, SpatialMap, SpatialMapConfig, SpeedBound,
};

const WORLD: i32 = 200;
// Velocity components stay within +-2, so no collider moves farther than
// ceil(sqrt(8)) = 3 units per tick.
const MAX_COMPONENT: i32 = 2;
const GLOBAL_MAX_SPEED: i32 = 3;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_collider(rng: &mut StdRng) -> Arc<Collider> {
    let x = rng.random_range(0..=WORLD);
    let y = rng.random_range(0..=WORLD);
    let collider = match rng.random_range(0..20) {
        0 => Collider::square(x, y, rng.random_range(30..=60)),
        1..=9 => Collider::circle(x, y, rng.random_range(0..=7)),
        _ => Collider::square(x, y, rng.random_range(1..=14)),
    };
    Arc::new(collider.with_velocity(
        rng.random_range(-MAX_COMPONENT..=MAX_COMPONENT),
        rng.random_range(-MAX_COMPONENT..=MAX_COMPONENT),
    ))
}

/// Advances a random population for `ticks` ticks, comparing the map with
/// the reference detector before every move.
fn run_parity(config: SpatialMapConfig, seed: u64, population: usize, ticks: usize) {
    init_logger();
    let mut rng = StdRng::seed_from_u64(seed);
    let world = Aabb::from_bounds(0, WORLD, 0, WORLD);
    let mut map = SpatialMap::with_config(config).unwrap();
    let mut colliders: Vec<Arc<Collider>> = (0..population).map(|_| random_collider(&mut rng)).collect();
    map.add_colliders(colliders.iter().map(|c| c.clone() as ColliderRef));

    let mut skipped = 0;
    for tick in 0..ticks {
        // Churn the population now and then.
        if tick % 25 == 24 {
            for _ in 0..2 {
                let victim = colliders.swap_remove(rng.random_range(0..colliders.len()));
                assert!(map.remove_collider(victim.id()).is_some());
                let newcomer = random_collider(&mut rng);
                map.add_collider(newcomer.clone());
                colliders.push(newcomer);
            }
        }

        let found = map.detect_collisions().unwrap();
        let reference: ReferenceDetector = colliders.iter().map(|c| c.clone() as ColliderRef).collect();
        let expected = reference.detect_collisions().unwrap();
        assert_eq!(found, expected, "seed {seed:#x}, tick {tick}, config {:?}", map.config());
        skipped += map.last_stats().asleep;

        for collider in &colliders {
            collider.advance(Some(&world));
        }
    }
    assert_eq!(map.len(), population);
    log::debug!("seed {seed:#x}: {skipped} collider-passes skipped over {ticks} ticks");
}

fn base_config() -> SpatialMapConfig {
    SpatialMapConfig::new(WORLD, WORLD, GLOBAL_MAX_SPEED, 10, 10)
}

#[test]
fn test_parity_default_config() {
    for seed in [0x5EED_0001, 0x5EED_0002, 0x5EED_0003] {
        run_parity(base_config(), seed, 60, 150);
    }
}

#[test]
fn test_parity_fringe_only() {
    for seed in [0xF41E_0001, 0xF41E_0002] {
        run_parity(base_config().fringe_only(true), seed, 60, 150);
    }
}

#[test]
fn test_parity_per_object_speed_bound() {
    let config = SpatialMapConfig::new(WORLD, WORLD, 1, 10, 10).speed_bound(SpeedBound::PerObjectSum);
    for seed in [0xB0B0_0001, 0xB0B0_0002] {
        run_parity(config.clone(), seed, 60, 150);
    }
}

#[test]
fn test_parity_dedicated_pool() {
    run_parity(base_config().worker_threads(3), 0xC0DE_0001, 80, 120);
}

#[test]
fn test_parity_uneven_grid() {
    // 200 / 7 leaves a wider last column; rows are 40 tall.
    let config = SpatialMapConfig::new(WORLD, WORLD, GLOBAL_MAX_SPEED, 7, 5).fringe_only(true);
    run_parity(config, 0x0DD_0001, 60, 150);
}

#[test]
fn test_parity_single_zone_and_fine_grid() {
    run_parity(SpatialMapConfig::new(WORLD, WORLD, GLOBAL_MAX_SPEED, 1, 1), 0x1_0001, 40, 100);
    run_parity(SpatialMapConfig::new(WORLD, WORLD, GLOBAL_MAX_SPEED, 40, 40), 0x40_0001, 60, 100);
}

#[test]
fn test_parity_short_sleep_cap() {
    run_parity(base_config().max_sleep_ticks(2), 0x2_0001, 60, 100);
}

#[test]
fn test_parity_outside_world() {
    init_logger();
    // Colliders drift out of the world and keep going; they land in edge zones.
    let mut map = SpatialMap::new(100, 100, 2, 5, 5).unwrap();
    let colliders: Vec<Arc<Collider>> = (0..10)
        .map(|i| {
            let vx = if i % 2 == 0 { -1 } else { 1 };
            Arc::new(Collider::square(10 * i, 50 + i, 6).with_velocity(vx, 1))
        })
        .collect();
    map.add_colliders(colliders.iter().map(|c| c.clone() as ColliderRef));

    for tick in 0..120 {
        let found = map.detect_collisions().unwrap();
        let reference: ReferenceDetector = colliders.iter().map(|c| c.clone() as ColliderRef).collect();
        assert_eq!(found, reference.detect_collisions().unwrap(), "tick {tick}");
        for collider in &colliders {
            collider.advance(None);
        }
    }
}

#[test]
fn test_head_on_pair_at_full_speed() {
    init_logger();
    // Each square moves the full global bound per tick, so the pair closes at
    // twice it. They meet around tick 12.
    let mut map = SpatialMap::new(100, 100, 2, 2, 2).unwrap();
    let left = Arc::new(Collider::square(10, 50, 2).with_velocity(2, 0));
    let right = Arc::new(Collider::square(60, 50, 2).with_velocity(-2, 0));
    let colliders = [left, right];
    map.add_colliders(colliders.iter().map(|c| c.clone() as ColliderRef));

    let mut hits = 0;
    for tick in 0..30 {
        let found = map.detect_collisions().unwrap();
        let reference: ReferenceDetector = colliders.iter().map(|c| c.clone() as ColliderRef).collect();
        assert_eq!(found, reference.detect_collisions().unwrap(), "tick {tick}");
        hits += found.len();
        for collider in &colliders {
            collider.advance(None);
        }
    }
    assert!(hits > 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_matches_reference(
        bodies in prop::collection::vec(
            (0..=WORLD, 0..=WORLD, 1..20i32, -MAX_COMPONENT..=MAX_COMPONENT, -MAX_COMPONENT..=MAX_COMPONENT, any::<bool>()),
            0..30,
        ),
        ticks in 1usize..15,
        fringe_only in any::<bool>(),
        per_object in any::<bool>(),
    ) {
        let speed_bound = if per_object { SpeedBound::PerObjectSum } else { SpeedBound::Global };
        let config = SpatialMapConfig::new(WORLD, WORLD, GLOBAL_MAX_SPEED, 8, 5)
            .fringe_only(fringe_only)
            .speed_bound(speed_bound);
        let mut map = SpatialMap::with_config(config).unwrap();
        let world = Aabb::from_bounds(0, WORLD, 0, WORLD);

        let colliders: Vec<Arc<Collider>> = bodies
            .iter()
            .map(|&(x, y, size, vx, vy, round)| {
                let collider = if round { Collider::circle(x, y, size / 2) } else { Collider::square(x, y, size) };
                Arc::new(collider.with_velocity(vx, vy))
            })
            .collect();
        map.add_colliders(colliders.iter().map(|c| c.clone() as ColliderRef));

        for _ in 0..ticks {
            let found = map.detect_collisions().unwrap();
            let reference: ReferenceDetector = colliders.iter().map(|c| c.clone() as ColliderRef).collect();
            prop_assert_eq!(found, reference.detect_collisions().unwrap());
            for collider in &colliders {
                collider.advance(Some(&world));
            }
        }
    }
}
