pub mod config;
pub mod spatial_map;

pub use config::SpatialMapConfig;
pub use spatial_map::{PassStats, SpatialMap};
