//! Scene-wide intersection dispatch.

use glint_core::{Quadric, Scene, SceneMode};
use glint_math::{Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

impl Hittable for Quadric {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let Some(hit) = self.intersect(ray, ray_t.min, ray_t.max) else {
            return false;
        };
        rec.t = hit.t;
        rec.point = hit.point;
        rec.normal = hit.normal;
        rec.front_face = hit.front_face;
        rec.material_index = self.material_index;
        true
    }
}

/// Borrowed view over a scene that sweeps all primitives for the
/// closest hit.
///
/// In procedural mode the sweep order is quadrics, then spheres, then
/// planes; in mesh mode only the triangle list is traced. Each hit
/// tightens the search interval so the final record is the nearest
/// intersection regardless of order.
pub struct World<'a> {
    scene: &'a Scene,
}

impl<'a> World<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }
}

impl Hittable for World<'_> {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut closest = ray_t.max;
        let mut hit_anything = false;
        let mut sweep = |primitive: &dyn Hittable, closest: &mut f32, rec: &mut HitRecord| {
            let mut temp = HitRecord::default();
            if primitive.hit(ray, Interval::new(ray_t.min, *closest), &mut temp) {
                *closest = temp.t;
                *rec = temp;
                true
            } else {
                false
            }
        };

        match self.scene.mode {
            SceneMode::Procedural => {
                for quadric in self.scene.quadrics() {
                    hit_anything |= sweep(quadric, &mut closest, rec);
                }
                for sphere in &self.scene.spheres {
                    hit_anything |= sweep(sphere, &mut closest, rec);
                }
                for plane in &self.scene.planes {
                    hit_anything |= sweep(plane, &mut closest, rec);
                }
            }
            SceneMode::Mesh => {
                for triangle in &self.scene.mesh.triangles {
                    hit_anything |= sweep(triangle, &mut closest, rec);
                }
            }
        }

        hit_anything
    }
}
