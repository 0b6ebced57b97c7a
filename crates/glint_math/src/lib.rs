// Re-export glam for convenience
pub use glam::*;

// GLINT math types
mod aabb;
mod interval;
mod orbit;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use orbit::OrbitCamera;
pub use ray::Ray;
