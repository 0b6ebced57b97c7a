//! Progressive CPU renderer.
//!
//! Renders one sample per pixel per frame, rows in parallel via
//! rayon, and folds the frame into the accumulation buffers. Each row
//! seeds its RNG from (frame index, row), so a given frame is fully
//! deterministic and successive frames decorrelate.

use glint_core::Scene;
use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::accumulation::{AccumulationController, ImageBuffer};
use crate::camera::Camera;
use crate::integrator::{trace_path, MAX_BOUNCES_HARD};
use crate::tonemap::{tonemap_pixel, DisplaySettings};
use crate::world::World;

/// Render parameters that stay fixed across frames.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub max_bounces: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            max_bounces: 8,
        }
    }
}

/// Owns the camera, the accumulation state and the scratch frame, and
/// watches the scene revision to restart accumulation on edits.
pub struct ProgressiveRenderer {
    pub camera: Camera,
    config: RenderConfig,
    accumulation: AccumulationController,
    scratch: ImageBuffer,
    last_revision: Option<u64>,
}

impl ProgressiveRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let mut camera = Camera::default();
        camera.initialize(config.width, config.height);
        Self {
            camera,
            config,
            accumulation: AccumulationController::new(config.width, config.height),
            scratch: ImageBuffer::new(config.width, config.height),
            last_revision: None,
        }
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    pub fn frame_index(&self) -> u32 {
        self.accumulation.frame_index()
    }

    /// Restart accumulation from the next frame. Camera moves and
    /// display-size changes call this through `set_camera`/`resize`.
    pub fn reset(&mut self) {
        self.accumulation.request_reset();
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.camera.initialize(self.config.width, self.config.height);
        self.reset();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.camera.initialize(width, height);
        self.accumulation.resize(width, height);
        self.scratch = ImageBuffer::new(width, height);
    }

    /// Render one sample per pixel and fold it into the average.
    /// Returns the updated accumulated image.
    pub fn render_frame(&mut self, scene: &Scene) -> &ImageBuffer {
        if self.last_revision != Some(scene.revision()) {
            self.last_revision = Some(scene.revision());
            self.accumulation.request_reset();
        }
        self.accumulation.begin_frame();

        let frame_index = self.accumulation.frame_index();
        let width = self.config.width;
        let max_bounces = self.config.max_bounces.min(MAX_BOUNCES_HARD);
        let world = World::new(scene);
        let camera = self.camera;

        self.scratch
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(row, pixels)| {
                let seed = ((frame_index as u64) << 32) ^ row as u64;
                let mut rng = StdRng::seed_from_u64(seed);
                for (col, pixel) in pixels.iter_mut().enumerate() {
                    let ray = camera.get_ray(col as u32, row as u32, &mut rng);
                    let mut radiance = trace_path(&world, ray, max_bounces, &mut rng);
                    if !radiance.is_finite() {
                        radiance = Vec3::ZERO;
                    }
                    *pixel = radiance;
                }
            });

        self.accumulation.accumulate(&self.scratch);
        self.accumulation.current()
    }

    /// The current accumulated image without rendering a new frame.
    pub fn current(&self) -> &ImageBuffer {
        self.accumulation.current()
    }

    /// Export the accumulated image through the display transform.
    pub fn save_png(
        &self,
        path: &std::path::Path,
        settings: &DisplaySettings,
    ) -> image::ImageResult<()> {
        let src = self.accumulation.current();
        let mut out = image::RgbaImage::new(src.width, src.height);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let mapped = tonemap_pixel(src.get(x, y), settings) * 255.0;
            *pixel = image::Rgba([
                mapped.x.round() as u8,
                mapped.y.round() as u8,
                mapped.z.round() as u8,
                255,
            ]);
        }
        log::info!(
            "saving {}x{} render ({} frames accumulated) to {}",
            src.width,
            src.height,
            self.accumulation.frame_index(),
            path.display()
        );
        out.save(path)
    }
}
