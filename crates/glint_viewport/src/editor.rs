//! egui panel for live scene editing.
//!
//! Any edit returns `true` so the caller can bump the scene revision
//! and restart accumulation.

use glint_core::{Material, Quadric, Scene, SceneMode, MAX_QUADRICS};
use glint_renderer::Tonemap;

/// Display-side settings the panel edits alongside the scene.
pub struct ViewSettings {
    pub exposure: f32,
    pub tonemap: Tonemap,
    pub max_bounces: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            tonemap: Tonemap::Aces,
            max_bounces: 8,
        }
    }
}

/// Read-only stats the panel displays.
pub struct FrameStats {
    pub fps: f32,
    pub frames_accumulated: u32,
}

fn drag_f32(ui: &mut egui::Ui, label: &str, value: &mut f32, speed: f32) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).speed(speed)).changed()
    })
    .inner
}

fn vec3_edit(ui: &mut egui::Ui, label: &str, v: &mut glint_math::Vec3) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        changed |= ui.add(egui::DragValue::new(&mut v.x).speed(0.1)).changed();
        changed |= ui.add(egui::DragValue::new(&mut v.y).speed(0.1)).changed();
        changed |= ui.add(egui::DragValue::new(&mut v.z).speed(0.1)).changed();
    });
    changed
}

fn quadric_slot_ui(ui: &mut egui::Ui, index: usize, quadric: &mut Quadric, material_count: usize) -> bool {
    let mut changed = false;

    ui.collapsing(format!("Slot {}: {}", index, quadric.type_name()), |ui| {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Sphere").clicked() {
                *quadric = Quadric::sphere(1.5, quadric.material_index);
                changed = true;
            }
            if ui.button("Ellipsoid").clicked() {
                *quadric = Quadric::ellipsoid(2.0, 1.0, 1.5, quadric.material_index);
                changed = true;
            }
            if ui.button("Cylinder").clicked() {
                *quadric = Quadric::cylinder(1.0, 4.0, quadric.material_index);
                changed = true;
            }
            if ui.button("Cone").clicked() {
                *quadric = Quadric::cone(0.5, 3.0, quadric.material_index);
                changed = true;
            }
            if ui.button("Hyperboloid").clicked() {
                *quadric = Quadric::hyperboloid_one_sheet(1.0, 1.0, 1.0, 4.0, quadric.material_index);
                changed = true;
            }
            if ui.button("Paraboloid").clicked() {
                *quadric = Quadric::elliptic_paraboloid(1.0, 1.0, 3.0, quadric.material_index);
                changed = true;
            }
            if ui.button("Saddle").clicked() {
                *quadric = Quadric::hyperbolic_paraboloid(1.0, 1.0, 2.0, quadric.material_index);
                changed = true;
            }
        });

        ui.separator();

        let c = &mut quadric.coefficients;
        egui::Grid::new(format!("coeffs_{index}")).num_columns(4).show(ui, |ui| {
            changed |= drag_f32(ui, "A x²", &mut c.a, 0.05);
            changed |= drag_f32(ui, "B y²", &mut c.b, 0.05);
            changed |= drag_f32(ui, "C z²", &mut c.c, 0.05);
            ui.end_row();
            changed |= drag_f32(ui, "D xy", &mut c.d, 0.05);
            changed |= drag_f32(ui, "E xz", &mut c.e, 0.05);
            changed |= drag_f32(ui, "F yz", &mut c.f, 0.05);
            ui.end_row();
            changed |= drag_f32(ui, "G x", &mut c.g, 0.05);
            changed |= drag_f32(ui, "H y", &mut c.h, 0.05);
            changed |= drag_f32(ui, "I z", &mut c.i, 0.05);
            ui.end_row();
            changed |= drag_f32(ui, "J", &mut c.j, 0.05);
            ui.end_row();
        });

        changed |= ui
            .checkbox(&mut quadric.use_bounds, "Bounding box")
            .changed();
        if quadric.use_bounds {
            changed |= vec3_edit(ui, "Min", &mut quadric.bounds.min);
            changed |= vec3_edit(ui, "Max", &mut quadric.bounds.max);
        }

        let mut material = quadric.material_index as usize;
        let response = egui::Slider::new(&mut material, 0..=material_count.saturating_sub(1))
            .text("Material");
        if ui.add(response).changed() {
            quadric.material_index = material as u32;
            changed = true;
        }
    });

    changed
}

fn material_ui(ui: &mut egui::Ui, index: usize, material: &mut Material) -> bool {
    let mut changed = false;
    ui.collapsing(format!("Material {index}"), |ui| {
        let mut albedo = [material.albedo.x, material.albedo.y, material.albedo.z];
        if ui.color_edit_button_rgb(&mut albedo).changed() {
            material.albedo = glint_math::Vec3::from_array(albedo);
            changed = true;
        }
        changed |= ui
            .add(egui::Slider::new(&mut material.roughness, 0.04..=1.0).text("Roughness"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut material.metallic, 0.0..=1.0).text("Metallic"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut material.transmission, 0.0..=1.0).text("Transmission"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut material.ior, 1.0..=2.5).text("IOR"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut material.emission_strength, 0.0..=30.0).text("Emission"))
            .changed();
        let mut emission = [material.emission.x, material.emission.y, material.emission.z];
        if ui.color_edit_button_rgb(&mut emission).changed() {
            material.emission = glint_math::Vec3::from_array(emission);
            changed = true;
        }
    });
    changed
}

/// Build the side panel. Returns true when the scene was edited and
/// accumulation must restart.
pub fn scene_panel(
    ctx: &egui::Context,
    scene: &mut Scene,
    settings: &mut ViewSettings,
    stats: &FrameStats,
) -> bool {
    let mut changed = false;

    egui::SidePanel::left("scene_panel")
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("GLINT");
            ui.label(format!("FPS: {:.1}", stats.fps));
            ui.label(format!("Accumulated: {} frames", stats.frames_accumulated));
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Scene:");
                if ui
                    .selectable_label(scene.mode == SceneMode::Procedural, "Quadrics")
                    .clicked()
                    && scene.mode != SceneMode::Procedural
                {
                    scene.set_mode(SceneMode::Procedural);
                    changed = true;
                }
                if ui
                    .selectable_label(scene.mode == SceneMode::Mesh, "Cornell box")
                    .clicked()
                    && scene.mode != SceneMode::Mesh
                {
                    scene.set_mode(SceneMode::Mesh);
                    changed = true;
                }
            });

            ui.separator();

            if scene.mode == SceneMode::Procedural {
                ui.label(format!(
                    "Quadrics: {} / {}",
                    scene.quadric_count(),
                    MAX_QUADRICS
                ));
                if scene.quadric_count() < MAX_QUADRICS && ui.button("Add quadric").clicked() {
                    let slot = scene.quadric_count();
                    scene.quadric_slots_mut()[slot] = Quadric::sphere(1.5, 0);
                    scene.set_active_count(slot + 1);
                    changed = true;
                }

                let material_count = scene.materials.len();
                let active = scene.quadric_count();
                for (i, quadric) in scene.quadric_slots_mut()[..active].iter_mut().enumerate() {
                    changed |= quadric_slot_ui(ui, i, quadric, material_count);
                }

                ui.separator();
                for (i, material) in scene.materials.iter_mut().enumerate() {
                    changed |= material_ui(ui, i, material);
                }
            }

            ui.separator();
            ui.label("Display");
            ui.add(egui::Slider::new(&mut settings.exposure, 0.1..=8.0).text("Exposure"));
            egui::ComboBox::from_label("Tonemap")
                .selected_text(format!("{:?}", settings.tonemap))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut settings.tonemap, Tonemap::None, "None");
                    ui.selectable_value(&mut settings.tonemap, Tonemap::Reinhard, "Reinhard");
                    ui.selectable_value(&mut settings.tonemap, Tonemap::Aces, "ACES");
                });
            let mut bounces = settings.max_bounces;
            if ui
                .add(egui::Slider::new(&mut bounces, 1..=16).text("Max bounces"))
                .changed()
            {
                settings.max_bounces = bounces;
                changed = true;
            }
        });

    changed
}
