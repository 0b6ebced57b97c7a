//! Infinite plane intersection (the procedural scene's boundary
//! geometry).

use glint_core::PlaneData;
use glint_math::{Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

impl Hittable for PlaneData {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let denom = self.normal.dot(ray.direction());
        // Parallel rays never hit; the epsilon also rejects grazing
        // directions whose t would explode
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.point = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.material_index = self.material_index;

        true
    }
}
