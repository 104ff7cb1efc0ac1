// Error type shared by the whole crate.

use thiserror::Error;

use crate::collision::ColliderId;

/// Errors raised while building a spatial map or running a detection pass.
#[derive(Debug, Error)]
pub enum CollisionError {
    /// The narrow phase cannot interpret the concrete shape of one of the two
    /// colliders it was asked to compare.
    #[error("cannot test collider {left} against collider {right}: unsupported shape combination")]
    ShapeMismatch { left: ColliderId, right: ColliderId },

    /// Zone counts or world extents that cannot form a non-degenerate grid.
    #[error("invalid grid configuration: {0}")]
    InvalidGridConfiguration(String),

    /// A speed bound of zero or less makes sleep arithmetic undefined.
    #[error("invalid speed bound {0}: max speed must be positive")]
    InvalidSpeedBound(i32),

    /// Configuration text that does not parse.
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The dedicated detection worker pool could not be created.
    #[error("failed to build detection thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = CollisionError> = std::result::Result<T, E>;
