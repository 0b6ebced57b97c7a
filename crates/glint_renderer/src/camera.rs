//! Pinhole / thin-lens camera.

use glint_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::{gen_f32, random_in_unit_disk};

/// Perspective camera with optional depth of field.
///
/// Primary ray directions are left at their natural (non-unit)
/// magnitude; every intersection routine works in that same parameter
/// space, so normalizing here would only burn a sqrt per ray.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees.
    pub vfov: f32,
    /// Lens cone angle in degrees; 0 disables depth of field.
    pub defocus_angle: f32,
    /// Distance to the plane of perfect focus.
    pub focus_dist: f32,

    // Derived per initialize()
    pixel00: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

/// Snapshot of the derived viewport frame, consumed by the GPU
/// uniform upload.
#[derive(Debug, Clone, Copy)]
pub struct CameraFrame {
    pub origin: Vec3,
    pub pixel00: Vec3,
    pub pixel_delta_u: Vec3,
    pub pixel_delta_v: Vec3,
    pub defocus_disk_u: Vec3,
    pub defocus_disk_v: Vec3,
    pub defocus_angle: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 45.0,
            defocus_angle: 0.0,
            focus_dist: 5.0,
            pixel00: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }
}

impl Camera {
    /// Recompute the viewport frame for the given image dimensions.
    /// Must be called after any field change and before `get_ray`.
    pub fn initialize(&mut self, image_width: u32, image_height: u32) {
        let aspect = image_width as f32 / image_height as f32;

        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * aspect;

        // Orthonormal camera frame
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = u * viewport_width;
        let viewport_v = -v * viewport_height;

        self.pixel_delta_u = viewport_u / image_width as f32;
        self.pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            self.look_from - w * self.focus_dist - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00 = viewport_upper_left + (self.pixel_delta_u + self.pixel_delta_v) * 0.5;

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;
    }

    /// Viewport frame for GPU upload: the same pixel grid the CPU
    /// rays are built from.
    pub fn frame_basis(&self) -> CameraFrame {
        CameraFrame {
            origin: self.look_from,
            pixel00: self.pixel00,
            pixel_delta_u: self.pixel_delta_u,
            pixel_delta_v: self.pixel_delta_v,
            defocus_disk_u: self.defocus_disk_u,
            defocus_disk_v: self.defocus_disk_v,
            defocus_angle: self.defocus_angle,
        }
    }

    /// Primary ray through pixel (x, y), jittered within the pixel for
    /// antialiasing, with lens sampling when defocus is enabled.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let jitter_x = gen_f32(rng) - 0.5;
        let jitter_y = gen_f32(rng) - 0.5;
        let pixel_sample = self.pixel00
            + self.pixel_delta_u * (x as f32 + jitter_x)
            + self.pixel_delta_v * (y as f32 + jitter_y);

        let origin = if self.defocus_angle <= 0.0 {
            self.look_from
        } else {
            let p = random_in_unit_disk(rng);
            self.look_from + self.defocus_disk_u * p.x + self.defocus_disk_v * p.y
        };

        Ray::new(origin, pixel_sample - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_center_pixel_looks_at_target() {
        let mut camera = Camera {
            look_from: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            ..Default::default()
        };
        camera.initialize(100, 100);
        let mut rng = StdRng::seed_from_u64(1);

        // Rays through the middle of the image point roughly at -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        let dir = ray.direction().normalize();
        assert!(dir.z < -0.99, "dir = {dir:?}");
    }

    #[test]
    fn test_pinhole_rays_share_origin() {
        let mut camera = Camera::default();
        camera.initialize(64, 64);
        let mut rng = StdRng::seed_from_u64(2);

        for (x, y) in [(0, 0), (63, 0), (31, 63)] {
            let ray = camera.get_ray(x, y, &mut rng);
            assert_eq!(ray.origin(), camera.look_from);
        }
    }

    #[test]
    fn test_defocus_spreads_origins() {
        let mut camera = Camera {
            defocus_angle: 2.0,
            ..Default::default()
        };
        camera.initialize(64, 64);
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen_offset = false;
        for _ in 0..32 {
            let ray = camera.get_ray(32, 32, &mut rng);
            if (ray.origin() - camera.look_from).length() > 1e-5 {
                seen_offset = true;
            }
            // Every lens ray still focuses on the focal plane target
            let focus_point = ray.at(1.0);
            assert!((focus_point.z).abs() < 0.3);
        }
        assert!(seen_offset);
    }

    #[test]
    fn test_corner_rays_span_the_fov() {
        let mut camera = Camera {
            vfov: 90.0,
            ..Default::default()
        };
        camera.initialize(100, 100);
        let mut rng = StdRng::seed_from_u64(4);

        let left = camera.get_ray(0, 50, &mut rng).direction().normalize();
        let right = camera.get_ray(99, 50, &mut rng).direction().normalize();
        // 90 degree vertical fov on a square image spans nearly 90
        // degrees horizontally as well
        let angle = left.dot(right).acos().to_degrees();
        assert!(angle > 80.0, "angle = {angle}");
    }
}
