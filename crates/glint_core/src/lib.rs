//! GLINT core - scene data model for the progressive path tracer.
//!
//! This crate owns everything the render backends consume:
//!
//! - **Quadric surfaces**: the general second-degree implicit surface
//!   with ray intersection and gradient normals
//! - **Materials**: the index-addressed PBR lookup table
//! - **Meshes**: flattened triangle lists with per-vertex normals
//! - **Scene**: the container tying it together, with the fixed
//!   quadric capacity and the revision counter that drives
//!   accumulation resets
//!
//! The CPU renderer in `glint_renderer` and the WGSL shaders in
//! `glint_viewport` both mirror the math defined here; this crate is
//! the tested reference for it.

pub mod material;
pub mod mesh;
pub mod quadric;
pub mod scene;

// Re-export commonly used types
pub use material::Material;
pub use mesh::{Triangle, TriangleMesh};
pub use quadric::{Quadric, QuadricCoefficients, QuadricHit, MAX_QUADRICS};
pub use scene::{PlaneData, Scene, SceneError, SceneMode, SphereData};
