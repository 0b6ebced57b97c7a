//! GPU-side mirrors of the scene types.
//!
//! Layouts follow WGSL storage buffer rules (vec3 aligns to 16
//! bytes), so every struct pads explicitly and asserts its size. The
//! conversion functions are the single place CPU scene data crosses
//! over to the shaders.

use glint_core::{Material, PlaneData, Quadric, Scene, SceneMode, SphereData, Triangle};
use glint_math::Vec3;
use glint_renderer::CameraFrame;

fn vec3_to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// One quadric slot as the path tracing shader sees it.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuQuadric {
    /// A, B, C, D
    pub coeffs0: [f32; 4],
    /// E, F, G, H
    pub coeffs1: [f32; 4],
    /// I, J
    pub coeffs2: [f32; 2],
    pub material_index: u32,
    pub use_bounds: u32,
    pub bounds_min: [f32; 3],
    pub _pad0: f32,
    pub bounds_max: [f32; 3],
    pub _pad1: f32,
}

impl From<&Quadric> for GpuQuadric {
    fn from(q: &Quadric) -> Self {
        let c = &q.coefficients;
        Self {
            coeffs0: [c.a, c.b, c.c, c.d],
            coeffs1: [c.e, c.f, c.g, c.h],
            coeffs2: [c.i, c.j],
            material_index: q.material_index,
            use_bounds: q.use_bounds as u32,
            bounds_min: vec3_to_array(q.bounds.min),
            _pad0: 0.0,
            bounds_max: vec3_to_array(q.bounds.max),
            _pad1: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuMaterial {
    pub albedo: [f32; 3],
    pub roughness: f32,
    pub emission: [f32; 3],
    pub emission_strength: f32,
    pub metallic: f32,
    pub ior: f32,
    pub transmission: f32,
    pub _pad: f32,
}

impl From<&Material> for GpuMaterial {
    fn from(m: &Material) -> Self {
        Self {
            albedo: vec3_to_array(m.albedo),
            roughness: m.roughness,
            emission: vec3_to_array(m.emission),
            emission_strength: m.emission_strength,
            metallic: m.metallic,
            ior: m.ior,
            transmission: m.transmission,
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSphere {
    pub center: [f32; 3],
    pub radius: f32,
    pub material_index: u32,
    pub _pad: [u32; 3],
}

impl From<&SphereData> for GpuSphere {
    fn from(s: &SphereData) -> Self {
        Self {
            center: vec3_to_array(s.center),
            radius: s.radius,
            material_index: s.material_index,
            _pad: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPlane {
    pub point: [f32; 3],
    pub _pad0: f32,
    pub normal: [f32; 3],
    pub material_index: u32,
}

impl From<&PlaneData> for GpuPlane {
    fn from(p: &PlaneData) -> Self {
        Self {
            point: vec3_to_array(p.point),
            _pad0: 0.0,
            normal: vec3_to_array(p.normal),
            material_index: p.material_index,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuTriangle {
    pub p0: [f32; 3],
    pub _pad0: f32,
    pub p1: [f32; 3],
    pub _pad1: f32,
    pub p2: [f32; 3],
    pub _pad2: f32,
    pub n0: [f32; 3],
    pub _pad3: f32,
    pub n1: [f32; 3],
    pub _pad4: f32,
    pub n2: [f32; 3],
    pub material_index: u32,
}

impl From<&Triangle> for GpuTriangle {
    fn from(t: &Triangle) -> Self {
        Self {
            p0: vec3_to_array(t.positions[0]),
            _pad0: 0.0,
            p1: vec3_to_array(t.positions[1]),
            _pad1: 0.0,
            p2: vec3_to_array(t.positions[2]),
            _pad2: 0.0,
            n0: vec3_to_array(t.normals[0]),
            _pad3: 0.0,
            n1: vec3_to_array(t.normals[1]),
            _pad4: 0.0,
            n2: vec3_to_array(t.normals[2]),
            material_index: t.material_index,
        }
    }
}

/// Per-frame uniform for the path tracing pass: camera frame, scene
/// counts and accumulation state.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    pub camera_origin: [f32; 3],
    pub frame_index: u32,
    pub pixel00: [f32; 3],
    pub quadric_count: u32,
    pub pixel_delta_u: [f32; 3],
    pub sphere_count: u32,
    pub pixel_delta_v: [f32; 3],
    pub plane_count: u32,
    pub defocus_disk_u: [f32; 3],
    pub triangle_count: u32,
    pub defocus_disk_v: [f32; 3],
    pub max_bounces: u32,
    pub background: [f32; 3],
    pub scene_mode: u32,
    pub width: u32,
    pub height: u32,
    pub defocus_angle: f32,
    /// Materials actually uploaded; indices at or past this fall back
    /// to slot 0, matching the CPU table lookup.
    pub material_count: u32,
}

impl RenderParams {
    pub fn build(
        scene: &Scene,
        frame: &CameraFrame,
        width: u32,
        height: u32,
        frame_index: u32,
        max_bounces: u32,
    ) -> Self {
        Self {
            camera_origin: vec3_to_array(frame.origin),
            frame_index,
            pixel00: vec3_to_array(frame.pixel00),
            quadric_count: scene.quadric_count() as u32,
            pixel_delta_u: vec3_to_array(frame.pixel_delta_u),
            sphere_count: scene.spheres.len() as u32,
            pixel_delta_v: vec3_to_array(frame.pixel_delta_v),
            plane_count: scene.planes.len() as u32,
            defocus_disk_u: vec3_to_array(frame.defocus_disk_u),
            triangle_count: scene.mesh.len() as u32,
            defocus_disk_v: vec3_to_array(frame.defocus_disk_v),
            max_bounces,
            background: vec3_to_array(scene.background),
            scene_mode: match scene.mode {
                SceneMode::Procedural => 0,
                SceneMode::Mesh => 1,
            },
            width,
            height,
            defocus_angle: frame.defocus_angle,
            material_count: scene.materials.len().min(crate::MAX_MATERIALS) as u32,
        }
    }
}

/// Uniform for the accumulation blend pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AccumParams {
    /// Frames already accumulated; 0 means copy the fresh frame.
    pub frame_index: u32,
    pub _pad: [u32; 3],
}

/// Uniform for the display pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DisplayParams {
    pub exposure: f32,
    /// 0 = clamp, 1 = Reinhard, 2 = ACES.
    pub tonemap: u32,
    pub _pad: [u32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    // WGSL array strides must match the Rust layout exactly
    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(size_of::<GpuQuadric>(), 80);
        assert_eq!(size_of::<GpuMaterial>(), 48);
        assert_eq!(size_of::<GpuSphere>(), 32);
        assert_eq!(size_of::<GpuPlane>(), 32);
        assert_eq!(size_of::<GpuTriangle>(), 96);
        assert_eq!(size_of::<RenderParams>(), 128);
        assert_eq!(size_of::<AccumParams>(), 16);
        assert_eq!(size_of::<DisplayParams>(), 16);
    }

    #[test]
    fn test_quadric_conversion_preserves_coefficients() {
        let q = Quadric::cylinder(2.0, 6.0, 3);
        let gpu = GpuQuadric::from(&q);

        assert_eq!(gpu.coeffs0, [1.0, 1.0, 0.0, 0.0]);
        assert_eq!(gpu.coeffs2[1], -4.0);
        assert_eq!(gpu.material_index, 3);
        assert_eq!(gpu.use_bounds, 1);
        assert_eq!(gpu.bounds_min[2], -3.0);
        assert_eq!(gpu.bounds_max[2], 3.0);
    }

    #[test]
    fn test_render_params_counts_follow_scene() {
        let scene = Scene::demo();
        let mut camera = glint_renderer::Camera::default();
        camera.initialize(64, 48);
        let params = RenderParams::build(&scene, &camera.frame_basis(), 64, 48, 7, 8);

        assert_eq!(params.quadric_count, scene.quadric_count() as u32);
        assert_eq!(params.sphere_count, scene.spheres.len() as u32);
        assert_eq!(params.material_count, scene.materials.len() as u32);
        assert_eq!(params.frame_index, 7);
        assert_eq!(params.scene_mode, 0);
        assert_eq!(params.width, 64);
    }

    #[test]
    fn test_material_count_clamps_to_buffer_capacity() {
        // The upload truncates the table; the shader's fallback bound
        // must match what was actually uploaded
        let mut scene = Scene::new();
        for _ in 0..40 {
            scene.add_material(Material::default());
        }
        let mut camera = glint_renderer::Camera::default();
        camera.initialize(8, 8);
        let params = RenderParams::build(&scene, &camera.frame_basis(), 8, 8, 0, 8);

        assert!(scene.materials.len() > crate::MAX_MATERIALS);
        assert_eq!(params.material_count, crate::MAX_MATERIALS as u32);
    }
}
