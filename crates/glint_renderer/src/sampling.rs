//! RNG helpers shared by the camera, BRDF sampling and integrator.

use glint_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Uniform f32 in [0, 1).
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    // 24 mantissa bits of a u32, same construction rand uses
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform point in the unit disk (rejection sampling).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Orthonormal basis around a unit normal.
pub fn build_onb(n: Vec3) -> (Vec3, Vec3) {
    let a = if n.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
    let tangent = n.cross(a).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}

/// Cosine-weighted direction on the hemisphere around `normal`.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();
    let x = phi.cos() * r;
    let y = phi.sin() * r;
    let z = (1.0 - r2).max(0.0).sqrt();

    let (tangent, bitangent) = build_onb(normal);
    (tangent * x + bitangent * y + normal * z).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_disk_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_onb_is_orthonormal() {
        for n in [Vec3::Y, Vec3::X, Vec3::new(0.3, -0.8, 0.5).normalize()] {
            let (t, b) = build_onb(n);
            assert!(t.dot(n).abs() < 1e-5);
            assert!(b.dot(n).abs() < 1e-5);
            assert!(t.dot(b).abs() < 1e-5);
            assert!((t.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cosine_hemisphere_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = Vec3::new(0.2, 0.9, -0.1).normalize();
        for _ in 0..1_000 {
            let d = cosine_hemisphere(n, &mut rng);
            assert!(d.dot(n) >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_hemisphere_mean_matches_distribution() {
        // E[cos theta] = 2/3 for pdf = cos/pi
        let mut rng = StdRng::seed_from_u64(3);
        let n = Vec3::Y;
        let mut sum = 0.0;
        let count = 20_000;
        for _ in 0..count {
            sum += cosine_hemisphere(n, &mut rng).dot(n);
        }
        let mean = sum / count as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean = {mean}");
    }
}
