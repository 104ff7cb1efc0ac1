// Sleep-timer arithmetic.
//
// A collider's sleep timer counts the detection passes it may skip. Values:
// - `AWAKE` (0): examined on the next pass.
// - `FORCE_WAKE` (-1): had a broad-phase hit; reset to `AWAKE` at the start
//   of the next pass, so it is examined regardless of other pruning.
// - `n > 0`: decremented once per pass; skipped while still positive.
//
// A timer of `s` written at pass `t` keeps the collider out of passes
// `t+1 ..= t+s-1`. `skip_ticks` is chosen so that two colliders separated by
// `gap` cannot close it in that many ticks.

use serde::{Deserialize, Serialize};

pub const AWAKE: i32 = 0;
pub const FORCE_WAKE: i32 = -1;

/// How the closing speed of a pair is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBound {
    /// The map's `max_speed` bounds how far any single object moves per
    /// tick, so a pair closes at most at twice that.
    #[default]
    Global,
    /// Each object's own `max_speed` bounds its movement; a pair closes at
    /// most at the sum of the two.
    PerObjectSum,
}

impl SpeedBound {
    /// Closing speed for a pair with the given per-object bounds.
    pub fn closing_speed(self, global: i32, a: i32, b: i32) -> i64 {
        let closing = match self {
            SpeedBound::Global => 2 * i64::from(global),
            SpeedBound::PerObjectSum => i64::from(a) + i64::from(b),
        };
        closing.max(1)
    }
}

/// Smallest `r >= 0` with `r * r >= value`.
pub fn ceil_sqrt(value: i64) -> i64 {
    if value <= 0 {
        return 0;
    }
    // Float estimate, then fix up the rounding in either direction.
    let mut root = (value as f64).sqrt() as i64;
    while root > 0 && (root - 1).saturating_mul(root - 1) >= value {
        root -= 1;
    }
    while root.saturating_mul(root) < value {
        root += 1;
    }
    root
}

/// Number of passes a pair separated by `gap` units may sleep when closing at
/// no more than `closing` units per tick. Never negative.
pub fn skip_ticks(gap: i64, closing: i64) -> i32 {
    if gap <= 0 {
        return AWAKE;
    }
    let ticks = gap / closing.max(1);
    i32::try_from(ticks).unwrap_or(i32::MAX)
}

/// Sleep allowed by the broad-phase miss of a pair at squared centre distance
/// `distance_squared` whose bounding radii sum to `radius_sum`.
pub fn pair_skip(distance_squared: i64, radius_sum: i64, closing: i64) -> i32 {
    let actual_distance = ceil_sqrt(distance_squared);
    skip_ticks(actual_distance - radius_sum, closing)
}
