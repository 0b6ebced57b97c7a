//! Flattened triangle meshes.
//!
//! The render core never parses model files; whatever loads a scene
//! hands over triangles already flattened to three positions, three
//! vertex normals and a material index each. A Cornell-style demo
//! builder stands in for the external loader so the mesh path can be
//! exercised without one.

use glint_math::{Aabb, Vec3};

use crate::material::Material;

/// One triangle with per-vertex normals for smooth shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub material_index: u32,
}

impl Triangle {
    /// Build a triangle with a flat face normal derived from the
    /// winding (counter-clockwise front face).
    pub fn flat(v0: Vec3, v1: Vec3, v2: Vec3, material_index: u32) -> Self {
        let n = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            positions: [v0, v1, v2],
            normals: [n; 3],
            material_index,
        }
    }

    /// Geometric (face) normal from the winding.
    pub fn face_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.positions;
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }
}

/// A flattened triangle list plus its world-space bounds.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append a quad as two triangles (counter-clockwise winding).
    pub fn push_quad(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, v3: Vec3, material_index: u32) {
        self.push(Triangle::flat(v0, v1, v2, material_index));
        self.push(Triangle::flat(v0, v2, v3, material_index));
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// World-space bounds of the whole list.
    pub fn bounds(&self) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for tri in &self.triangles {
            for p in tri.positions {
                min = min.min(p);
                max = max.max(p);
            }
        }
        Aabb::new(min, max)
    }

    /// Cornell-style box: five walls and an area light, centered on
    /// the origin with half-extent `half`. Returns the mesh and its
    /// material table (white/red/green walls, emissive light).
    pub fn cornell_box(half: f32) -> (Self, Vec<Material>) {
        let materials = vec![
            Material::diffuse(Vec3::splat(0.73)),                 // 0 white
            Material::diffuse(Vec3::new(0.65, 0.05, 0.05)),       // 1 red
            Material::diffuse(Vec3::new(0.12, 0.45, 0.15)),       // 2 green
            Material::emissive(Vec3::new(1.0, 0.9, 0.7), 15.0),   // 3 light
        ];

        let h = half;
        let mut mesh = Self::new();

        // Floor (y = -h, normal up)
        mesh.push_quad(
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, -h, -h),
            Vec3::new(-h, -h, -h),
            0,
        );
        // Ceiling (y = +h, normal down)
        mesh.push_quad(
            Vec3::new(-h, h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
            0,
        );
        // Back wall (z = -h, normal toward camera)
        mesh.push_quad(
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            0,
        );
        // Left wall (x = -h, red)
        mesh.push_quad(
            Vec3::new(-h, -h, h),
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, h, h),
            1,
        );
        // Right wall (x = +h, green)
        mesh.push_quad(
            Vec3::new(h, -h, -h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(h, h, -h),
            2,
        );
        // Area light just under the ceiling, facing down
        let l = h * 0.3;
        let y = h - h * 0.01;
        mesh.push_quad(
            Vec3::new(-l, y, -l),
            Vec3::new(l, y, -l),
            Vec3::new(l, y, l),
            Vec3::new(-l, y, l),
            3,
        );

        (mesh, materials)
    }
}
