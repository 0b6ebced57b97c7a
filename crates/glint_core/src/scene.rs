//! Scene container for the progressive renderer.
//!
//! Holds the quadric slots (hard capacity, reused in place), the
//! procedural primitives, the mesh, and the material table. Every
//! mutation bumps a revision counter; render hosts compare revisions
//! between frames to decide when accumulated samples are stale and
//! the running average must restart.

use glam::Vec3;
use thiserror::Error;

use crate::material::Material;
use crate::mesh::TriangleMesh;
use crate::quadric::{Quadric, MAX_QUADRICS};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("quadric capacity exceeded ({MAX_QUADRICS} slots)")]
    QuadricCapacity,
    #[error("quadric index {0} out of range")]
    QuadricIndex(usize),
}

/// Which primitive set the intersection dispatcher sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    /// Quadrics, spheres, then planes.
    #[default]
    Procedural,
    /// Triangle mesh only.
    Mesh,
}

/// Analytic sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereData {
    pub center: Vec3,
    pub radius: f32,
    pub material_index: u32,
}

/// Infinite plane through `point` with unit `normal` (the boundary
/// geometry of the procedural scene).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneData {
    pub point: Vec3,
    pub normal: Vec3,
    pub material_index: u32,
}

/// The complete per-frame scene description.
///
/// Backends read this; only the host edits it, and only between
/// frames. Quadric slots live in a fixed array - the editor reuses
/// them rather than allocating.
#[derive(Debug, Clone)]
pub struct Scene {
    quadrics: [Quadric; MAX_QUADRICS],
    quadric_count: usize,
    pub spheres: Vec<SphereData>,
    pub planes: Vec<PlaneData>,
    pub mesh: TriangleMesh,
    pub materials: Vec<Material>,
    pub mode: SceneMode,
    /// Radiance returned on ray miss.
    pub background: Vec3,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            quadrics: [Quadric::default(); MAX_QUADRICS],
            quadric_count: 0,
            spheres: Vec::new(),
            planes: Vec::new(),
            mesh: TriangleMesh::new(),
            materials: vec![Material::default()],
            mode: SceneMode::Procedural,
            background: Vec3::new(0.05, 0.06, 0.08),
            revision: 0,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active quadric slots.
    pub fn quadrics(&self) -> &[Quadric] {
        &self.quadrics[..self.quadric_count]
    }

    pub fn quadric_count(&self) -> usize {
        self.quadric_count
    }

    /// Add a quadric, failing when all slots are taken.
    pub fn add_quadric(&mut self, quadric: Quadric) -> Result<usize, SceneError> {
        if self.quadric_count >= MAX_QUADRICS {
            return Err(SceneError::QuadricCapacity);
        }
        let index = self.quadric_count;
        self.quadrics[index] = quadric;
        self.quadric_count += 1;
        self.revision += 1;
        Ok(index)
    }

    /// Overwrite a quadric slot in place. Writing one past the active
    /// count grows the active range (editor semantics: selecting a new
    /// slot activates it).
    pub fn set_quadric(&mut self, index: usize, quadric: Quadric) -> Result<(), SceneError> {
        if index >= MAX_QUADRICS {
            return Err(SceneError::QuadricIndex(index));
        }
        self.quadrics[index] = quadric;
        if index >= self.quadric_count {
            self.quadric_count = index + 1;
        }
        self.revision += 1;
        Ok(())
    }

    pub fn quadric(&self, index: usize) -> Option<&Quadric> {
        self.quadrics().get(index)
    }

    pub fn add_sphere(&mut self, sphere: SphereData) {
        self.spheres.push(sphere);
        self.revision += 1;
    }

    pub fn add_plane(&mut self, plane: PlaneData) {
        self.planes.push(plane);
        self.revision += 1;
    }

    /// Add a material, returning its table index.
    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        self.revision += 1;
        (self.materials.len() - 1) as u32
    }

    /// Material lookup with a clamped index - an out-of-range index
    /// renders with the default material instead of panicking (the
    /// burden of validity is on the editing side).
    pub fn material(&self, index: u32) -> &Material {
        self.materials
            .get(index as usize)
            .unwrap_or(&self.materials[0])
    }

    pub fn set_mode(&mut self, mode: SceneMode) {
        if self.mode != mode {
            self.mode = mode;
            self.revision += 1;
        }
    }

    /// Monotonic edit counter; render hosts reset accumulation when it
    /// changes between frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record an external edit (the egui editor mutates coefficient
    /// fields directly through `quadric_slots_mut`).
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    /// Raw slot access for the editor. Callers must `touch()` after
    /// mutating, and activate slots via `set_active_count`.
    pub fn quadric_slots_mut(&mut self) -> &mut [Quadric; MAX_QUADRICS] {
        &mut self.quadrics
    }

    pub fn set_active_count(&mut self, count: usize) {
        let count = count.min(MAX_QUADRICS);
        if count != self.quadric_count {
            self.quadric_count = count;
            self.revision += 1;
        }
    }

    /// The default interactive scene: two quadrics (gold sphere, white
    /// ellipsoid) over a diffuse floor plane, plus a sphere light.
    pub fn demo() -> Self {
        let mut scene = Self::new();

        let floor = scene.add_material(Material::diffuse(Vec3::splat(0.6)));
        let gold = scene.add_material(Material::metal(Vec3::new(1.0, 0.78, 0.34), 0.25));
        let white = scene.add_material(Material::new(Vec3::splat(0.9), 0.4, 0.0));
        let lamp = scene.add_material(Material::emissive(Vec3::new(1.0, 0.95, 0.85), 20.0));

        // Gold sphere on the right: (x-2)² + (y+2)² + z² = 0.36
        scene
            .add_quadric(Quadric::bounded(
                crate::quadric::QuadricCoefficients::new(
                    1.0, 1.0, 1.0, 0.0, 0.0, 0.0, -4.0, 4.0, 0.0, 7.64,
                ),
                glint_math::Aabb::new(Vec3::new(1.4, -2.6, -0.6), Vec3::new(2.6, -1.4, 0.6)),
                gold,
            ))
            .expect("empty scene has free slots");

        // White ellipsoid back left:
        // 0.64x² + 0.25y² + z² + 2.56x + y + 4z + 7.4 = 0
        scene
            .add_quadric(Quadric::bounded(
                crate::quadric::QuadricCoefficients::new(
                    0.64, 0.25, 1.0, 0.0, 0.0, 0.0, 2.56, 1.0, 4.0, 7.4,
                ),
                glint_math::Aabb::new(Vec3::new(-2.5, -2.8, -2.4), Vec3::new(-1.5, -1.2, -1.6)),
                white,
            ))
            .expect("empty scene has free slots");

        scene.add_plane(PlaneData {
            point: Vec3::new(0.0, -3.0, 0.0),
            normal: Vec3::Y,
            material_index: floor,
        });

        scene.add_sphere(SphereData {
            center: Vec3::new(0.0, 6.0, 2.0),
            radius: 1.5,
            material_index: lamp,
        });

        log::debug!(
            "built demo scene: {} quadrics, {} materials",
            scene.quadric_count(),
            scene.materials.len()
        );
        scene
    }

    /// The mesh demo scene (Cornell-style box).
    pub fn demo_mesh() -> Self {
        let mut scene = Self::new();
        let (mesh, materials) = TriangleMesh::cornell_box(2.5);
        scene.mesh = mesh;
        scene.materials = materials;
        scene.mode = SceneMode::Mesh;
        scene.background = Vec3::ZERO;
        scene.revision += 1;
        log::debug!("built mesh demo scene: {} triangles", scene.mesh.len());
        scene
    }
}
