pub mod vec2;

pub use vec2::{AtomicVec2, Vec2};
