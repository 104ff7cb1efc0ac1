use serde::{Deserialize, Serialize};

use crate::collision::SpeedBound;
use crate::error::{CollisionError, Result};

/// Construction parameters for a `SpatialMap`.
///
/// Missing fields take their defaults when deserialized, so a JSON document
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialMapConfig {
    /// World extent; the grid spans `[0, width] x [0, height]`.
    pub width: i32,
    pub height: i32,
    /// Farthest any object moves per tick under the global speed bound.
    /// Must be positive.
    pub max_speed: i32,
    /// Grid columns and rows.
    pub x_zones: i32,
    pub y_zones: i32,
    pub speed_bound: SpeedBound,
    /// Neighbouring zones only contribute objects whose bounding circle
    /// reaches their own zone's edge.
    pub fringe_only: bool,
    /// Longest sleep any object can be given in one pass.
    pub max_sleep_ticks: u32,
    /// Threads for a dedicated worker pool.
    /// `None` runs zone tasks on rayon's global pool.
    pub worker_threads: Option<usize>,
}

impl Default for SpatialMapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            max_speed: 1,
            x_zones: 10,
            y_zones: 10,
            speed_bound: SpeedBound::Global,
            fringe_only: false,
            max_sleep_ticks: 120,
            worker_threads: None,
        }
    }
}

impl SpatialMapConfig {
    pub fn new(width: i32, height: i32, max_speed: i32, x_zones: i32, y_zones: i32) -> Self {
        Self {
            width,
            height,
            max_speed,
            x_zones,
            y_zones,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON text and validates it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the parameters a grid and the sleep arithmetic depend on.
    pub fn validate(&self) -> Result<()> {
        if self.max_speed <= 0 {
            return Err(CollisionError::InvalidSpeedBound(self.max_speed));
        }
        if self.x_zones <= 0 || self.y_zones <= 0 {
            return Err(CollisionError::InvalidGridConfiguration(format!(
                "zone counts must be positive, got {}x{}",
                self.x_zones, self.y_zones
            )));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(CollisionError::InvalidGridConfiguration(format!(
                "world extent must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width / self.x_zones < 1 || self.height / self.y_zones < 1 {
            return Err(CollisionError::InvalidGridConfiguration(format!(
                "{}x{} world cannot be split into {}x{} zones",
                self.width, self.height, self.x_zones, self.y_zones
            )));
        }
        Ok(())
    }

    pub fn speed_bound(mut self, speed_bound: SpeedBound) -> Self {
        self.speed_bound = speed_bound;
        self
    }

    pub fn fringe_only(mut self, enabled: bool) -> Self {
        self.fringe_only = enabled;
        self
    }

    pub fn max_sleep_ticks(mut self, ticks: u32) -> Self {
        self.max_sleep_ticks = ticks;
        self
    }

    /// Run zone tasks on a dedicated pool of `n` threads.
    pub fn worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = Some(n.max(1));
        self
    }

    /// Longest sleep as a timer value.
    pub(crate) fn sleep_cap(&self) -> i32 {
        i32::try_from(self.max_sleep_ticks).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SpatialMapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_sleep_ticks, 120);
        assert_eq!(config.speed_bound, SpeedBound::Global);
    }

    #[test]
    fn test_validate_rejects_bad_speed() {
        let config = SpatialMapConfig::new(100, 100, 0, 10, 10);
        assert!(matches!(config.validate(), Err(CollisionError::InvalidSpeedBound(0))));
    }

    #[test]
    fn test_validate_rejects_bad_grid() {
        for config in [
            SpatialMapConfig::new(100, 100, 1, 0, 10),
            SpatialMapConfig::new(-1, 100, 1, 10, 10),
            SpatialMapConfig::new(100, 9, 1, 10, 10),
        ] {
            assert!(matches!(
                config.validate(),
                Err(CollisionError::InvalidGridConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_builder_setters() {
        let config = SpatialMapConfig::new(200, 100, 4, 20, 10)
            .speed_bound(SpeedBound::PerObjectSum)
            .fringe_only(true)
            .max_sleep_ticks(10)
            .worker_threads(0);
        assert_eq!(config.speed_bound, SpeedBound::PerObjectSum);
        assert!(config.fringe_only);
        assert_eq!(config.sleep_cap(), 10);
        assert_eq!(config.worker_threads, Some(1));
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = SpatialMapConfig::from_json_str(
            r#"{ "width": 400, "max_speed": 3, "speed_bound": "per_object_sum" }"#,
        )
        .unwrap();
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 100);
        assert_eq!(config.max_speed, 3);
        assert_eq!(config.speed_bound, SpeedBound::PerObjectSum);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            SpatialMapConfig::from_json_str("{ not json"),
            Err(CollisionError::Config(_))
        ));
        assert!(matches!(
            SpatialMapConfig::from_json_str(r#"{ "max_speed": -2 }"#),
            Err(CollisionError::InvalidSpeedBound(-2))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = SpatialMapConfig::default().fringe_only(true).worker_threads(2);
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(SpatialMapConfig::from_json_str(&text).unwrap(), config);
    }
}
