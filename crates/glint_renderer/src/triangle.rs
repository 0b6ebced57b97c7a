//! Moller-Trumbore triangle intersection with smooth normals.

use glint_core::Triangle;
use glint_math::{Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let [v0, v1, v2] = self.positions;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let pvec = ray.direction().cross(edge2);
        let det = edge1.dot(pvec);
        // Near-zero determinant means the ray lies in the triangle's
        // plane; both faces are kept so walls are visible from inside
        if det.abs() < 1e-8 {
            return false;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = edge2.dot(qvec) * inv_det;
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.point = ray.at(t);
        let w = 1.0 - u - v;
        let outward_normal =
            (self.normals[0] * w + self.normals[1] * u + self.normals[2] * v).normalize();
        rec.set_face_normal(ray, outward_normal);
        rec.material_index = self.material_index;

        true
    }
}
