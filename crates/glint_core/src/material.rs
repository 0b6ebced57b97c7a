//! Index-addressed PBR material table.
//!
//! Materials are immutable for the duration of a frame; hit records
//! carry indices into the table rather than references, matching the
//! flattened layout the GPU stage consumes.

use glint_math::Vec3;

/// Roughness floor keeping the GGX microfacet terms away from their
/// singular limit at 0.
pub const MIN_ROUGHNESS: f32 = 0.04;

/// A PBR material record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base reflectance color.
    pub albedo: Vec3,
    /// Microfacet roughness, clamped to [MIN_ROUGHNESS, 1].
    pub roughness: f32,
    /// 0 = dielectric, 1 = metal.
    pub metallic: f32,
    /// Emission color (multiplied by strength when sampled).
    pub emission: Vec3,
    /// Emission multiplier; 0 disables emission.
    pub emission_strength: f32,
    /// Index of refraction for the transmission branch.
    pub ior: f32,
    /// 0 = opaque, 1 = fully transmissive.
    pub transmission: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::splat(0.8),
            roughness: 0.9,
            metallic: 0.0,
            emission: Vec3::ZERO,
            emission_strength: 0.0,
            ior: 1.5,
            transmission: 0.0,
        }
    }
}

impl Material {
    /// Create a material, clamping parameters into their valid ranges.
    pub fn new(albedo: Vec3, roughness: f32, metallic: f32) -> Self {
        Self {
            albedo,
            roughness: roughness.clamp(MIN_ROUGHNESS, 1.0),
            metallic: metallic.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Matte diffuse surface.
    pub fn diffuse(albedo: Vec3) -> Self {
        Self::new(albedo, 1.0, 0.0)
    }

    /// Metallic surface.
    pub fn metal(albedo: Vec3, roughness: f32) -> Self {
        Self::new(albedo, roughness, 1.0)
    }

    /// Light-emitting surface.
    pub fn emissive(color: Vec3, strength: f32) -> Self {
        Self {
            emission: color,
            emission_strength: strength.max(0.0),
            ..Default::default()
        }
    }

    /// Transmissive glass-like surface.
    pub fn glass(ior: f32) -> Self {
        Self {
            albedo: Vec3::ONE,
            roughness: MIN_ROUGHNESS,
            ior,
            transmission: 1.0,
            ..Default::default()
        }
    }

    /// Builder: set emission.
    pub fn with_emission(mut self, color: Vec3, strength: f32) -> Self {
        self.emission = color;
        self.emission_strength = strength.max(0.0);
        self
    }

    /// Builder: set transmission and IOR.
    pub fn with_transmission(mut self, transmission: f32, ior: f32) -> Self {
        self.transmission = transmission.clamp(0.0, 1.0);
        self.ior = ior;
        self
    }

    /// Radiance emitted by this material.
    pub fn emitted(&self) -> Vec3 {
        self.emission * self.emission_strength
    }

    pub fn is_emissive(&self) -> bool {
        self.emission_strength > 0.0 && self.emission.length_squared() > 0.0
    }
}
