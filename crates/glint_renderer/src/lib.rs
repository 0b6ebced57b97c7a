//! GLINT CPU renderer - progressive Monte Carlo path tracing.
//!
//! This is the reference implementation of the render math: the WGSL
//! shaders in `glint_viewport` mirror the intersection dispatch, BRDF
//! sampling, bounce loop and accumulation protocol implemented here,
//! branch for branch. Everything numeric that matters is unit-tested
//! on this side.

mod accumulation;
mod brdf;
mod camera;
mod hittable;
mod integrator;
mod plane;
mod renderer;
mod sampling;
mod sphere;
mod tonemap;
mod triangle;
mod world;

pub use accumulation::{AccumulationController, ImageBuffer};
pub use brdf::{sample_brdf, BrdfSample};
pub use camera::{Camera, CameraFrame};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{trace_path, MAX_BOUNCES_HARD, T_EPS};
pub use renderer::{ProgressiveRenderer, RenderConfig};
pub use sampling::gen_f32;
pub use tonemap::{tonemap_pixel, DisplaySettings, Tonemap};
pub use world::World;

/// Re-export common math types
pub use glint_math::{Interval, Ray, Vec3};
