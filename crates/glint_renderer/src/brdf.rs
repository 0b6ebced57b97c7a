//! Cook-Torrance BRDF sampling.
//!
//! Microfacet model with the GGX normal distribution, Smith geometry
//! term (Schlick-GGX per direction) and Schlick Fresnel. Importance
//! sampling mixes a cosine-weighted diffuse lobe with a GGX
//! half-vector specular lobe; the mixture probability of the diffuse
//! lobe is `(1 - metallic) * 0.5`, so fully metallic surfaces only
//! ever sample the specular lobe.

use glint_core::Material;
use glint_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

use crate::sampling::{build_onb, cosine_hemisphere, gen_f32};

/// Floor applied to the mixture pdf before dividing; keeps grazing
/// samples from blowing the throughput up to infinity.
const PDF_FLOOR: f32 = 1e-4;

/// One importance-sampled bounce direction with its weighted
/// contribution.
#[derive(Debug, Clone, Copy)]
pub struct BrdfSample {
    /// Unit direction of the next ray.
    pub direction: Vec3,
    /// `f * cos(theta) / pdf` for this sample; multiply into the path
    /// throughput.
    pub throughput: Vec3,
}

/// GGX / Trowbridge-Reitz normal distribution.
fn distribution_ggx(ndoth: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denom = ndoth * ndoth * (a2 - 1.0) + 1.0;
    a2 / (PI * denom * denom).max(1e-8)
}

fn geometry_schlick_ggx(ndotx: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = r * r / 8.0;
    ndotx / (ndotx * (1.0 - k) + k).max(1e-8)
}

/// Smith geometry term, separable masking and shadowing.
fn geometry_smith(ndotv: f32, ndotl: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(ndotv, roughness) * geometry_schlick_ggx(ndotl, roughness)
}

/// Schlick Fresnel approximation.
fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

/// Sample a GGX-distributed half vector around the normal.
fn sample_ggx_half_vector(normal: Vec3, roughness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let a = roughness * roughness;

    let phi = 2.0 * PI * r2;
    let cos_theta = ((1.0 - r1) / (1.0 + (a * a - 1.0) * r1)).max(0.0).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let (tangent, bitangent) = build_onb(normal);
    (tangent * (phi.cos() * sin_theta) + bitangent * (phi.sin() * sin_theta) + normal * cos_theta)
        .normalize()
}

/// Evaluate the full BRDF for a given pair of directions.
fn evaluate(material: &Material, normal: Vec3, view: Vec3, light: Vec3) -> Vec3 {
    let ndotv = normal.dot(view).max(1e-4);
    let ndotl = normal.dot(light).max(1e-4);
    let half = (view + light).normalize();
    let ndoth = normal.dot(half).max(0.0);
    let vdoth = view.dot(half).max(1e-4);

    let f0 = Vec3::splat(0.04).lerp(material.albedo, material.metallic);
    let d = distribution_ggx(ndoth, material.roughness);
    let g = geometry_smith(ndotv, ndotl, material.roughness);
    let f = fresnel_schlick(vdoth, f0);

    let specular = d * g * f / (4.0 * ndotv * ndotl);
    let kd = (Vec3::ONE - f) * (1.0 - material.metallic);
    let diffuse = kd * material.albedo / PI;

    diffuse + specular
}

/// Mixture pdf matching the sampling strategy.
fn pdf(material: &Material, normal: Vec3, view: Vec3, light: Vec3) -> f32 {
    let ndotl = normal.dot(light).max(0.0);
    let half = (view + light).normalize();
    let ndoth = normal.dot(half).max(0.0);
    let vdoth = view.dot(half).max(1e-4);

    let p_diffuse = (1.0 - material.metallic) * 0.5;
    let pdf_diffuse = ndotl / PI;
    let pdf_specular = distribution_ggx(ndoth, material.roughness) * ndoth / (4.0 * vdoth);

    p_diffuse * pdf_diffuse + (1.0 - p_diffuse) * pdf_specular
}

/// Draw one bounce direction from the BRDF's importance distribution.
///
/// `view` points from the surface toward the previous ray origin and
/// must be unit length, as must `normal`. Returns `None` when the
/// sampled direction fell below the horizon; the caller terminates the
/// path, counting the sample as absorbed.
pub fn sample_brdf(
    material: &Material,
    normal: Vec3,
    view: Vec3,
    rng: &mut dyn RngCore,
) -> Option<BrdfSample> {
    let p_diffuse = (1.0 - material.metallic) * 0.5;

    let light = if gen_f32(rng) < p_diffuse {
        cosine_hemisphere(normal, rng)
    } else {
        let half = sample_ggx_half_vector(normal, material.roughness, rng);
        // reflect view about the sampled microfacet normal
        (2.0 * view.dot(half) * half - view).normalize()
    };

    let ndotl = normal.dot(light);
    if ndotl <= 0.0 {
        return None;
    }

    let f = evaluate(material, normal, view, light);
    let pdf = pdf(material, normal, view, light).max(PDF_FLOOR);

    Some(BrdfSample {
        direction: light,
        throughput: f * ndotl / pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_directions_above_horizon() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Material::new(Vec3::splat(0.8), 0.5, 0.5);
        let normal = Vec3::Y;
        let view = Vec3::new(0.3, 0.8, 0.2).normalize();

        for _ in 0..2_000 {
            if let Some(sample) = sample_brdf(&material, normal, view, &mut rng) {
                assert!(sample.direction.dot(normal) > 0.0);
                assert!((sample.direction.length() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_throughput_finite_and_non_negative() {
        let mut rng = StdRng::seed_from_u64(9);
        let normal = Vec3::Y;
        let view = Vec3::new(0.1, 0.99, 0.0).normalize();

        for (roughness, metallic) in [(0.04, 0.0), (0.04, 1.0), (0.9, 0.0), (0.9, 1.0), (0.5, 0.5)]
        {
            let material = Material::new(Vec3::new(0.9, 0.6, 0.3), roughness, metallic);
            for _ in 0..1_000 {
                if let Some(sample) = sample_brdf(&material, normal, view, &mut rng) {
                    assert!(sample.throughput.is_finite());
                    assert!(sample.throughput.min_element() >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_smooth_metal_samples_near_mirror_direction() {
        let mut rng = StdRng::seed_from_u64(17);
        let material = Material::metal(Vec3::splat(0.9), 0.04);
        let normal = Vec3::Y;
        let view = Vec3::new(-0.5, 0.5, 0.0).normalize();
        let mirror = (2.0 * view.dot(normal) * normal - view).normalize();

        let mut accepted = 0;
        let mut aligned = 0;
        for _ in 0..2_000 {
            if let Some(sample) = sample_brdf(&material, normal, view, &mut rng) {
                accepted += 1;
                if sample.direction.dot(mirror) > 0.99 {
                    aligned += 1;
                }
            }
        }
        assert!(accepted > 0);
        // A near-smooth GGX lobe concentrates tightly around the
        // mirror direction
        assert!(aligned as f32 / accepted as f32 > 0.9);
    }

    #[test]
    fn test_metallic_kills_diffuse_lobe() {
        // Fully metallic: kd = 0, so evaluate() must equal the bare
        // specular term
        let material = Material::metal(Vec3::splat(0.9), 0.3);
        let normal = Vec3::Y;
        let view = Vec3::new(0.2, 0.9, 0.1).normalize();
        let light = Vec3::new(-0.2, 0.9, -0.1).normalize();

        let ndotv = normal.dot(view).max(1e-4);
        let ndotl = normal.dot(light).max(1e-4);
        let half = (view + light).normalize();
        let d = distribution_ggx(normal.dot(half).max(0.0), material.roughness);
        let g = geometry_smith(ndotv, ndotl, material.roughness);
        let f = fresnel_schlick(view.dot(half).max(1e-4), material.albedo);
        let specular = d * g * f / (4.0 * ndotv * ndotl);

        let full = evaluate(&material, normal, view, light);
        assert!((full - specular).length() < 1e-5);
    }

    #[test]
    fn test_ggx_distribution_normalizes_over_hemisphere() {
        // Numerically integrate D(h) * cos(theta) over the hemisphere;
        // a proper NDF integrates to 1
        for roughness in [0.2_f32, 0.5, 0.9] {
            let steps = 256;
            let mut total = 0.0;
            for i in 0..steps {
                let theta = (i as f32 + 0.5) / steps as f32 * (PI / 2.0);
                let d = distribution_ggx(theta.cos(), roughness);
                total += d * theta.cos() * theta.sin() * (PI / 2.0 / steps as f32) * 2.0 * PI;
            }
            assert!(
                (total - 1.0).abs() < 0.05,
                "roughness {roughness}: integral {total}"
            );
        }
    }

    #[test]
    fn test_fresnel_at_normal_incidence_is_f0() {
        let f0 = Vec3::new(0.9, 0.7, 0.4);
        let f = fresnel_schlick(1.0, f0);
        assert!((f - f0).length() < 1e-6);

        // Grazing incidence goes to white
        let grazing = fresnel_schlick(0.0, f0);
        assert!((grazing - Vec3::ONE).length() < 1e-6);
    }
}
