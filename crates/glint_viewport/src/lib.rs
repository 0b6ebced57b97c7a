//! GPU viewport: wgpu path tracing passes, accumulation ping-pong and
//! the egui scene editor.
//!
//! Three passes per frame:
//! 1. `pathtrace` (compute): one sample per pixel into the fresh frame
//!    texture.
//! 2. `accumulate` (compute): blend fresh into the running average,
//!    reading one ping-pong texture and writing the other.
//! 3. `display` (render): fullscreen triangle, exposure + tonemap +
//!    gamma, then the egui overlay.

use anyhow::Result;
use wgpu::util::DeviceExt;
use wgpu::{Device, Instance, Queue, Surface, SurfaceConfiguration};

use glint_core::Scene;
use glint_math::OrbitCamera;
use glint_renderer::{Camera, Tonemap, MAX_BOUNCES_HARD};

pub mod editor;
mod gpu_types;

pub use editor::{FrameStats, ViewSettings};
use gpu_types::{
    AccumParams, DisplayParams, GpuMaterial, GpuPlane, GpuQuadric, GpuSphere, GpuTriangle,
    RenderParams,
};

/// Storage buffer capacities. Scene uploads are clamped to these.
const MAX_MATERIALS: usize = 32;
const MAX_SPHERES: usize = 64;
const MAX_PLANES: usize = 16;
const MAX_TRIANGLES: usize = 4096;

const ACCUM_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// GPU viewport state: device, passes, scene buffers and UI.
pub struct Viewport {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub size: (u32, u32),

    // Scene data on the GPU
    params_buffer: wgpu::Buffer,
    quadric_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    sphere_buffer: wgpu::Buffer,
    plane_buffer: wgpu::Buffer,
    triangle_buffer: wgpu::Buffer,

    // Pass pipelines
    pathtrace_pipeline: wgpu::ComputePipeline,
    pathtrace_layout: wgpu::BindGroupLayout,
    pathtrace_bind_group: wgpu::BindGroup,
    accumulate_pipeline: wgpu::ComputePipeline,
    accumulate_layout: wgpu::BindGroupLayout,
    accum_params_buffer: wgpu::Buffer,
    accumulate_bind_groups: [wgpu::BindGroup; 2],
    display_pipeline: wgpu::RenderPipeline,
    display_layout: wgpu::BindGroupLayout,
    display_params_buffer: wgpu::Buffer,
    display_bind_groups: [wgpu::BindGroup; 2],

    // Ping-pong accumulation textures plus the fresh sample target
    fresh_texture: wgpu::Texture,
    accum_textures: [wgpu::Texture; 2],

    // Camera rig driving the render camera
    pub rig: OrbitCamera,
    camera: Camera,

    // Accumulation protocol state
    frame_index: u32,
    reset_pending: bool,
    last_revision: Option<u64>,

    // egui state
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // UI state
    pub settings: ViewSettings,
    pub show_ui: bool,
    pub fps: f32,
    frame_count: u32,
    fps_update_timer: f32,
}

impl Viewport {
    fn create_accum_texture(device: &Device, size: (u32, u32), label: &str) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.0.max(1),
                height: size.1.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ACCUM_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    }

    /// Create a new viewport for the given window.
    pub async fn new(window: std::sync::Arc<winit::window::Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("GLINT Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        // Scene storage buffers at fixed capacity; uploads rewrite them
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Render Params"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quadric_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Quadric Buffer"),
            size: (glint_core::MAX_QUADRICS * std::mem::size_of::<GpuQuadric>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Material Buffer"),
            size: (MAX_MATERIALS * std::mem::size_of::<GpuMaterial>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sphere_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sphere Buffer"),
            size: (MAX_SPHERES * std::mem::size_of::<GpuSphere>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let plane_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Plane Buffer"),
            size: (MAX_PLANES * std::mem::size_of::<GpuPlane>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let triangle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Triangle Buffer"),
            size: (MAX_TRIANGLES * std::mem::size_of::<GpuTriangle>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Path trace pass
        let pathtrace_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Pathtrace Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pathtrace.wgsl").into()),
        });

        let storage_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let pathtrace_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Pathtrace Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1),
                storage_entry(2),
                storage_entry(3),
                storage_entry(4),
                storage_entry(5),
                wgpu::BindGroupLayoutEntry {
                    binding: 6,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: ACCUM_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let pathtrace_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Pathtrace Pipeline Layout"),
                bind_group_layouts: &[&pathtrace_layout],
                push_constant_ranges: &[],
            });

        let pathtrace_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Pathtrace Pipeline"),
            layout: Some(&pathtrace_pipeline_layout),
            module: &pathtrace_shader,
            entry_point: "cs_main",
            compilation_options: Default::default(),
            cache: None,
        });

        // Accumulate pass
        let accumulate_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Accumulate Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/accumulate.wgsl").into()),
        });

        let accumulate_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Accumulate Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: ACCUM_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let accumulate_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Accumulate Pipeline Layout"),
                bind_group_layouts: &[&accumulate_layout],
                push_constant_ranges: &[],
            });

        let accumulate_pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Accumulate Pipeline"),
                layout: Some(&accumulate_pipeline_layout),
                module: &accumulate_shader,
                entry_point: "cs_main",
                compilation_options: Default::default(),
                cache: None,
            });

        let accum_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Accum Params"),
            size: std::mem::size_of::<AccumParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Display pass
        let display_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Display Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/display.wgsl").into()),
        });

        let display_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Display Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let display_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Display Pipeline Layout"),
                bind_group_layouts: &[&display_layout],
                push_constant_ranges: &[],
            });

        let display_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Display Pipeline"),
            layout: Some(&display_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &display_shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &display_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let display_params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Display Params"),
            contents: bytemuck::cast_slice(&[DisplayParams {
                exposure: 1.0,
                tonemap: 2,
                _pad: [0; 2],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Render target textures
        let fresh_texture =
            Self::create_accum_texture(&device, (size.width, size.height), "Fresh Frame");
        let accum_textures = [
            Self::create_accum_texture(&device, (size.width, size.height), "Accum A"),
            Self::create_accum_texture(&device, (size.width, size.height), "Accum B"),
        ];

        let (pathtrace_bind_group, accumulate_bind_groups, display_bind_groups) =
            Self::create_frame_bind_groups(
                &device,
                &pathtrace_layout,
                &accumulate_layout,
                &display_layout,
                &params_buffer,
                &quadric_buffer,
                &material_buffer,
                &sphere_buffer,
                &plane_buffer,
                &triangle_buffer,
                &accum_params_buffer,
                &display_params_buffer,
                &fresh_texture,
                &accum_textures,
            );

        // Camera: orbit rig feeding the render camera
        let rig = OrbitCamera::new(glint_math::Vec3::ZERO, 12.0);
        let mut camera = Camera::default();
        camera.look_from = rig.position();
        camera.look_at = rig.target;
        camera.initialize(size.width.max(1), size.height.max(1));

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1, false);

        log::info!(
            "viewport initialized: {}x{}, surface {:?}",
            size.width,
            size.height,
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size: (size.width, size.height),
            params_buffer,
            quadric_buffer,
            material_buffer,
            sphere_buffer,
            plane_buffer,
            triangle_buffer,
            pathtrace_pipeline,
            pathtrace_layout,
            pathtrace_bind_group,
            accumulate_pipeline,
            accumulate_layout,
            accum_params_buffer,
            accumulate_bind_groups,
            display_pipeline,
            display_layout,
            display_params_buffer,
            display_bind_groups,
            fresh_texture,
            accum_textures,
            rig,
            camera,
            frame_index: 0,
            reset_pending: true,
            last_revision: None,
            egui_ctx,
            egui_state,
            egui_renderer,
            settings: ViewSettings::default(),
            show_ui: true,
            fps: 0.0,
            frame_count: 0,
            fps_update_timer: 0.0,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn create_frame_bind_groups(
        device: &Device,
        pathtrace_layout: &wgpu::BindGroupLayout,
        accumulate_layout: &wgpu::BindGroupLayout,
        display_layout: &wgpu::BindGroupLayout,
        params_buffer: &wgpu::Buffer,
        quadric_buffer: &wgpu::Buffer,
        material_buffer: &wgpu::Buffer,
        sphere_buffer: &wgpu::Buffer,
        plane_buffer: &wgpu::Buffer,
        triangle_buffer: &wgpu::Buffer,
        accum_params_buffer: &wgpu::Buffer,
        display_params_buffer: &wgpu::Buffer,
        fresh_texture: &wgpu::Texture,
        accum_textures: &[wgpu::Texture; 2],
    ) -> (wgpu::BindGroup, [wgpu::BindGroup; 2], [wgpu::BindGroup; 2]) {
        let fresh_view = fresh_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let accum_views = [
            accum_textures[0].create_view(&wgpu::TextureViewDescriptor::default()),
            accum_textures[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];

        let pathtrace_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Pathtrace Bind Group"),
            layout: pathtrace_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: quadric_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: sphere_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: plane_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: triangle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::TextureView(&fresh_view),
                },
            ],
        });

        // Variant w writes accum[w] while reading accum[1 - w]
        let accumulate_bind_groups = [0usize, 1].map(|w| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Accumulate Bind Group"),
                layout: accumulate_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: accum_params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&fresh_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&accum_views[1 - w]),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(&accum_views[w]),
                    },
                ],
            })
        });

        let display_bind_groups = [0usize, 1].map(|w| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Display Bind Group"),
                layout: display_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: display_params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&accum_views[w]),
                    },
                ],
            })
        });

        (pathtrace_bind_group, accumulate_bind_groups, display_bind_groups)
    }

    /// Handle window resize: surface, render targets and camera.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.0;
        self.config.height = new_size.1;
        self.surface.configure(&self.device, &self.config);

        self.fresh_texture = Self::create_accum_texture(&self.device, new_size, "Fresh Frame");
        self.accum_textures = [
            Self::create_accum_texture(&self.device, new_size, "Accum A"),
            Self::create_accum_texture(&self.device, new_size, "Accum B"),
        ];

        let (pathtrace_bind_group, accumulate_bind_groups, display_bind_groups) =
            Self::create_frame_bind_groups(
                &self.device,
                &self.pathtrace_layout,
                &self.accumulate_layout,
                &self.display_layout,
                &self.params_buffer,
                &self.quadric_buffer,
                &self.material_buffer,
                &self.sphere_buffer,
                &self.plane_buffer,
                &self.triangle_buffer,
                &self.accum_params_buffer,
                &self.display_params_buffer,
                &self.fresh_texture,
                &self.accum_textures,
            );
        self.pathtrace_bind_group = pathtrace_bind_group;
        self.accumulate_bind_groups = accumulate_bind_groups;
        self.display_bind_groups = display_bind_groups;

        self.camera.initialize(new_size.0, new_size.1);
        self.reset_pending = true;
    }

    /// Restart accumulation from the next frame.
    pub fn reset_accumulation(&mut self) {
        self.reset_pending = true;
    }

    /// Frames accumulated so far.
    pub fn frames_accumulated(&self) -> u32 {
        self.frame_index
    }

    /// Sync the render camera from the orbit rig. Call after any rig
    /// change; restarts accumulation.
    pub fn update_camera(&mut self) {
        self.camera.look_from = self.rig.position();
        self.camera.look_at = self.rig.target;
        self.camera.vup = self.rig.up();
        self.camera.initialize(self.size.0, self.size.1);
        self.reset_pending = true;
    }

    /// Handle egui window event. Returns true if egui consumed it.
    pub fn handle_egui_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// Update FPS counter (call each frame with delta_time).
    pub fn update_fps(&mut self, delta_time: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta_time;
        if self.fps_update_timer >= 0.5 {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    fn upload_scene(&mut self, scene: &Scene) {
        let quadrics: Vec<GpuQuadric> = scene.quadrics().iter().map(GpuQuadric::from).collect();
        if !quadrics.is_empty() {
            self.queue
                .write_buffer(&self.quadric_buffer, 0, bytemuck::cast_slice(&quadrics));
        }

        let materials: Vec<GpuMaterial> = scene
            .materials
            .iter()
            .take(MAX_MATERIALS)
            .map(GpuMaterial::from)
            .collect();
        if scene.materials.len() > MAX_MATERIALS {
            log::warn!(
                "material table truncated to {} of {}",
                MAX_MATERIALS,
                scene.materials.len()
            );
        }
        self.queue
            .write_buffer(&self.material_buffer, 0, bytemuck::cast_slice(&materials));

        let spheres: Vec<GpuSphere> = scene
            .spheres
            .iter()
            .take(MAX_SPHERES)
            .map(GpuSphere::from)
            .collect();
        if !spheres.is_empty() {
            self.queue
                .write_buffer(&self.sphere_buffer, 0, bytemuck::cast_slice(&spheres));
        }

        let planes: Vec<GpuPlane> = scene
            .planes
            .iter()
            .take(MAX_PLANES)
            .map(GpuPlane::from)
            .collect();
        if !planes.is_empty() {
            self.queue
                .write_buffer(&self.plane_buffer, 0, bytemuck::cast_slice(&planes));
        }

        let triangles: Vec<GpuTriangle> = scene
            .mesh
            .triangles
            .iter()
            .take(MAX_TRIANGLES)
            .map(GpuTriangle::from)
            .collect();
        if !triangles.is_empty() {
            self.queue
                .write_buffer(&self.triangle_buffer, 0, bytemuck::cast_slice(&triangles));
        }

        log::debug!(
            "scene upload: {} quadrics, {} spheres, {} planes, {} triangles",
            quadrics.len(),
            spheres.len(),
            planes.len(),
            triangles.len()
        );
    }

    /// Render one progressive frame plus the UI.
    pub fn render(&mut self, scene: &mut Scene, window: &winit::window::Window) -> Result<()> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Build UI first so scene edits land in this frame's upload
        let raw_input = self.egui_state.take_egui_input(window);
        let show_ui = self.show_ui;
        let stats = FrameStats {
            fps: self.fps,
            frames_accumulated: self.frame_index,
        };
        let mut ui_changed = false;
        let settings = &mut self.settings;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show_ui {
                ui_changed = editor::scene_panel(ctx, scene, settings, &stats);
            }
        });
        if ui_changed {
            scene.touch();
        }

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        // Accumulation protocol: latch resets, track scene revision
        if self.last_revision != Some(scene.revision()) {
            self.last_revision = Some(scene.revision());
            self.upload_scene(scene);
            self.reset_pending = true;
        }
        if self.reset_pending {
            self.frame_index = 0;
            self.reset_pending = false;
        }

        let max_bounces = self.settings.max_bounces.min(MAX_BOUNCES_HARD);
        let params = RenderParams::build(
            scene,
            &self.camera.frame_basis(),
            self.size.0,
            self.size.1,
            self.frame_index,
            max_bounces,
        );
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::cast_slice(&[params]));
        self.queue.write_buffer(
            &self.accum_params_buffer,
            0,
            bytemuck::cast_slice(&[AccumParams {
                frame_index: self.frame_index,
                _pad: [0; 3],
            }]),
        );
        self.queue.write_buffer(
            &self.display_params_buffer,
            0,
            bytemuck::cast_slice(&[DisplayParams {
                exposure: self.settings.exposure,
                tonemap: match self.settings.tonemap {
                    Tonemap::None => 0,
                    Tonemap::Reinhard => 1,
                    Tonemap::Aces => 2,
                },
                _pad: [0; 2],
            }]),
        );

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.0, self.size.1],
            pixels_per_point: window.scale_factor() as f32,
        };
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let groups_x = self.size.0.div_ceil(8);
        let groups_y = self.size.1.div_ceil(8);
        let write = (self.frame_index % 2) as usize;

        // Pass 1: trace one sample per pixel
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Pathtrace Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pathtrace_pipeline);
            pass.set_bind_group(0, &self.pathtrace_bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }

        // Pass 2: blend into the running average
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Accumulate Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.accumulate_pipeline);
            pass.set_bind_group(0, &self.accumulate_bind_groups[write], &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }

        // Pass 3: display the average
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Display Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.display_pipeline);
            pass.set_bind_group(0, &self.display_bind_groups[write], &[]);
            pass.draw(0..3, 0..1);
        }

        // egui overlay
        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut egui_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame_index += 1;
        Ok(())
    }
}
