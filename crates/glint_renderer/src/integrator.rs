//! Iterative path tracing kernel.
//!
//! One call traces a full light path: intersect, add emission, decide
//! survival, pick the next direction, repeat. The per-bounce exit
//! order is fixed: miss (background), emission, Russian roulette,
//! then the transmission or BRDF branch. A non-finite throughput
//! terminates the path immediately so a single bad sample cannot
//! poison the accumulation buffer.

use glint_core::Material;
use glint_math::{Interval, Ray, Vec3};
use rand::RngCore;

use crate::brdf::sample_brdf;
use crate::hittable::{HitRecord, Hittable};
use crate::sampling::gen_f32;
use crate::world::World;

/// Absolute cap on bounces regardless of the configured depth.
pub const MAX_BOUNCES_HARD: u32 = 16;

/// Minimum ray parameter for secondary rays; skips self-intersection
/// with the surface the ray just left.
pub const T_EPS: f32 = 1e-3;

/// First bounce index at which Russian roulette may terminate a path.
const ROULETTE_START: u32 = 3;

/// Russian roulette survival decision.
///
/// Survival probability is the maximum throughput channel, clamped so
/// bright paths are never killed outright and dim paths still get a
/// chance. Surviving paths are scaled by 1/p, which keeps the
/// estimator unbiased: E[survive * throughput / p] = throughput.
fn roulette(throughput: Vec3, bounce: u32, rng: &mut dyn RngCore) -> Option<Vec3> {
    if bounce < ROULETTE_START {
        return Some(throughput);
    }
    let p = throughput.max_element().clamp(0.05, 0.95);
    if gen_f32(rng) >= p {
        return None;
    }
    Some(throughput / p)
}

/// Schlick's reflectance approximation for the transmission branch.
fn schlick_reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = (1.0 - refraction_ratio) / (1.0 + refraction_ratio);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

fn refract(unit_dir: Vec3, normal: Vec3, ratio: f32, cos_theta: f32) -> Vec3 {
    let r_out_perp = ratio * (unit_dir + cos_theta * normal);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * normal;
    r_out_perp + r_out_parallel
}

/// Next ray direction through a transmissive surface.
///
/// Refracts when Snell's law permits it, reflects on total internal
/// reflection or when the Fresnel lottery says so.
fn sample_transmission(material: &Material, rec: &HitRecord, ray: &Ray, rng: &mut dyn RngCore) -> Vec3 {
    let ratio = if rec.front_face {
        1.0 / material.ior
    } else {
        material.ior
    };
    let unit_dir = ray.direction().normalize();
    let cos_theta = (-unit_dir).dot(rec.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let cannot_refract = ratio * sin_theta > 1.0;
    if cannot_refract || schlick_reflectance(cos_theta, ratio) > gen_f32(rng) {
        unit_dir - 2.0 * unit_dir.dot(rec.normal) * rec.normal
    } else {
        refract(unit_dir, rec.normal, ratio, cos_theta)
    }
}

/// Trace a single light path and return its radiance estimate.
pub fn trace_path(world: &World, ray: Ray, max_bounces: u32, rng: &mut dyn RngCore) -> Vec3 {
    let mut ray = ray;
    let mut radiance = Vec3::ZERO;
    let mut throughput = Vec3::ONE;
    let depth = max_bounces.min(MAX_BOUNCES_HARD);

    for bounce in 0..depth {
        let mut rec = HitRecord::default();
        if !world.hit(&ray, Interval::new(T_EPS, f32::INFINITY), &mut rec) {
            radiance += throughput * world.scene().background;
            break;
        }

        let material = *world.scene().material(rec.material_index);
        radiance += throughput * material.emitted();

        throughput = match roulette(throughput, bounce, rng) {
            Some(t) => t,
            None => break,
        };

        if material.transmission > 0.0 && gen_f32(rng) < material.transmission {
            let direction = sample_transmission(&material, &rec, &ray, rng);
            throughput *= material.albedo;
            ray = Ray::new(rec.point, direction);
        } else {
            let view = -ray.direction().normalize();
            let Some(sample) = sample_brdf(&material, rec.normal, view, rng) else {
                break;
            };
            throughput *= sample.throughput;
            ray = Ray::new(rec.point, sample.direction);
        }

        if !throughput.is_finite() {
            break;
        }
    }

    radiance
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{PlaneData, Scene, SphereData};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_miss_returns_background() {
        let mut scene = Scene::new();
        scene.background = Vec3::new(0.2, 0.4, 0.6);
        let world = World::new(&scene);
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let radiance = trace_path(&world, ray, 8, &mut rng);
        assert!((radiance - Vec3::new(0.2, 0.4, 0.6)).length() < 1e-6);
    }

    #[test]
    fn test_direct_hit_on_emitter_returns_emission() {
        let mut scene = Scene::new();
        scene.background = Vec3::ZERO;
        let light = scene.add_material(glint_core::Material::emissive(Vec3::ONE, 5.0));
        scene.add_sphere(SphereData {
            center: Vec3::new(0.0, 0.0, -3.0),
            radius: 1.0,
            material_index: light,
        });
        let world = World::new(&scene);
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let radiance = trace_path(&world, ray, 8, &mut rng);
        // The emitter itself is diffuse-dark, so the path contributes
        // the emission term plus whatever the next bounces gather from
        // a black background (nothing)
        assert!((radiance - Vec3::splat(5.0)).length() < 1e-4);
    }

    #[test]
    fn test_enclosed_path_terminates() {
        // A sphere viewed from inside with no roulette escape below
        // the hard cap would loop forever without the depth limit
        let mut scene = Scene::new();
        scene.background = Vec3::ZERO;
        let mirror = scene.add_material(glint_core::Material::metal(Vec3::splat(0.99), 0.04));
        scene.add_sphere(SphereData {
            center: Vec3::ZERO,
            radius: 10.0,
            material_index: mirror,
        });
        let world = World::new(&scene);
        let mut rng = StdRng::seed_from_u64(3);

        for i in 0..100 {
            let ray = Ray::new(Vec3::ZERO, Vec3::new((i as f32).sin(), 0.3, 1.0));
            let radiance = trace_path(&world, ray, MAX_BOUNCES_HARD, &mut rng);
            assert!(radiance.is_finite());
            assert_eq!(radiance, Vec3::ZERO);
        }
    }

    #[test]
    fn test_roulette_is_unbiased() {
        // E[X] where X = throughput/p on survival and 0 on death must
        // equal the input throughput
        let mut rng = StdRng::seed_from_u64(4);
        let throughput = Vec3::splat(0.3);
        let trials = 200_000;
        let mut sum = Vec3::ZERO;
        for _ in 0..trials {
            if let Some(t) = roulette(throughput, ROULETTE_START, &mut rng) {
                sum += t;
            }
        }
        let mean = sum / trials as f32;
        assert!(
            (mean - throughput).length() < 0.01,
            "mean = {mean:?}, expected {throughput:?}"
        );
    }

    #[test]
    fn test_roulette_never_fires_early() {
        let mut rng = StdRng::seed_from_u64(5);
        let throughput = Vec3::splat(1e-6);
        for bounce in 0..ROULETTE_START {
            for _ in 0..100 {
                assert!(roulette(throughput, bounce, &mut rng).is_some());
            }
        }
    }

    #[test]
    fn test_refract_straight_through_at_normal_incidence() {
        let dir = Vec3::new(0.0, 0.0, -1.0);
        let out = refract(dir, Vec3::Z, 1.0 / 1.5, 1.0);
        assert!((out - dir).length() < 1e-5);
    }

    #[test]
    fn test_schlick_bounds() {
        for ratio in [1.0 / 1.5_f32, 1.5] {
            for i in 0..=10 {
                let cosine = i as f32 / 10.0;
                let r = schlick_reflectance(cosine, ratio);
                assert!((0.0..=1.0).contains(&r), "r = {r}");
            }
        }
        // Grazing angles reflect almost everything
        assert!(schlick_reflectance(0.0, 1.0 / 1.5) > 0.9);
    }

    #[test]
    fn test_glass_sphere_paths_stay_finite() {
        let mut scene = Scene::new();
        scene.background = Vec3::splat(1.0);
        let glass = scene.add_material(glint_core::Material::glass(1.5));
        scene.add_sphere(SphereData {
            center: Vec3::new(0.0, 0.0, -3.0),
            radius: 1.0,
            material_index: glass,
        });
        scene.add_plane(PlaneData {
            point: Vec3::new(0.0, -2.0, 0.0),
            normal: Vec3::Y,
            material_index: 0,
        });
        let world = World::new(&scene);
        let mut rng = StdRng::seed_from_u64(6);

        for i in 0..500 {
            let jitter = (i as f32 / 500.0 - 0.5) * 0.6;
            let ray = Ray::new(Vec3::ZERO, Vec3::new(jitter, jitter * 0.5, -1.0));
            let radiance = trace_path(&world, ray, MAX_BOUNCES_HARD, &mut rng);
            assert!(radiance.is_finite(), "sample {i} produced {radiance:?}");
            assert!(radiance.min_element() >= 0.0);
        }
    }
}
