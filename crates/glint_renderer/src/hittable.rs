//! Hittable trait and the shared hit record.

use glint_math::{Interval, Ray, Vec3};

/// Sentinel for "no hit found yet".
pub const T_FAR: f32 = 1e8;

/// Record of the nearest ray-primitive intersection found so far.
///
/// One record is threaded through an entire intersection sweep and
/// tightened as each primitive is tested - a fold over primitives
/// keyed on minimum t.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Intersection distance along the ray direction.
    pub t: f32,
    /// Point of intersection.
    pub point: Vec3,
    /// Surface normal, always facing against the ray.
    pub normal: Vec3,
    /// Index into the scene's material table.
    pub material_index: u32,
    /// Whether the ray hit the front face (approached from outside).
    pub front_face: bool,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            t: T_FAR,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            material_index: 0,
            front_face: false,
        }
    }
}

impl HitRecord {
    /// Store the normal facing against the ray and record which side
    /// was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for primitives the intersection dispatcher sweeps.
pub trait Hittable {
    /// Test the ray against this primitive within `ray_t`; on a closer
    /// hit, fill in the record and return true.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}
