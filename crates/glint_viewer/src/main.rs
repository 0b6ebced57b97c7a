use anyhow::Result;
use glint_core::{Scene, SceneMode};
use glint_viewport::Viewport;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Application state
struct App {
    window: Option<std::sync::Arc<Window>>,
    viewport: Option<Viewport>,
    scene: Scene,

    // Input state
    left_mouse_pressed: bool,
    middle_mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    last_frame_time: Instant,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            viewport: None,
            scene: Scene::demo(),
            left_mouse_pressed: false,
            middle_mouse_pressed: false,
            last_mouse_pos: None,
            last_frame_time: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("GLINT")
                .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));

            let window = std::sync::Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("Failed to create window"),
            );

            let viewport = pollster::block_on(Viewport::new(window.clone()))
                .expect("Failed to initialize viewport");

            self.window = Some(window);
            self.viewport = Some(viewport);

            log::info!("Window and viewport initialized");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(viewport) = &mut self.viewport {
            if let Some(window) = &self.window {
                if viewport.handle_egui_event(window, &event) {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(viewport) = &mut self.viewport {
                    viewport.resize((physical_size.width, physical_size.height));
                    log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => match button {
                MouseButton::Left => {
                    self.left_mouse_pressed = state == ElementState::Pressed;
                    if !self.left_mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
                MouseButton::Middle => {
                    self.middle_mouse_pressed = state == ElementState::Pressed;
                    if !self.middle_mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                if self.left_mouse_pressed || self.middle_mouse_pressed {
                    if let Some(last_pos) = self.last_mouse_pos {
                        let delta_x = position.x - last_pos.0;
                        let delta_y = position.y - last_pos.1;

                        if let Some(viewport) = &mut self.viewport {
                            if self.left_mouse_pressed {
                                let sensitivity = 0.005;
                                viewport.rig.orbit(
                                    -delta_x as f32 * sensitivity,
                                    -delta_y as f32 * sensitivity,
                                );
                            } else if self.middle_mouse_pressed {
                                viewport.rig.pan(delta_x as f32, delta_y as f32);
                            }
                            viewport.update_camera();
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(viewport) = &mut self.viewport {
                    let scroll_amount = match delta {
                        winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                        winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                    };

                    viewport.rig.zoom(scroll_amount);
                    viewport.update_camera();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(keycode) = physical_key {
                    match keycode {
                        KeyCode::KeyU => {
                            if let Some(viewport) = &mut self.viewport {
                                viewport.show_ui = !viewport.show_ui;
                            }
                        }
                        KeyCode::KeyR => {
                            if let Some(viewport) = &mut self.viewport {
                                viewport.reset_accumulation();
                            }
                        }
                        KeyCode::KeyM => {
                            // Toggle between the quadric demo and the
                            // Cornell box mesh scene
                            let next = match self.scene.mode {
                                SceneMode::Procedural => Scene::demo_mesh(),
                                SceneMode::Mesh => Scene::demo(),
                            };
                            self.scene = next;
                        }
                        KeyCode::Escape => {
                            event_loop.exit();
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = (now - self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                if let Some(viewport) = &mut self.viewport {
                    viewport.update_fps(delta_time);
                }

                if let (Some(viewport), Some(window)) = (&mut self.viewport, &self.window) {
                    if let Err(e) = viewport.render(&mut self.scene, window) {
                        if let Some(surface_err) = e.downcast_ref::<wgpu::SurfaceError>() {
                            match surface_err {
                                wgpu::SurfaceError::Lost => {
                                    if let Some(viewport) = &mut self.viewport {
                                        viewport.resize(viewport.size);
                                    }
                                }
                                wgpu::SurfaceError::OutOfMemory => {
                                    log::error!("Out of memory!");
                                    event_loop.exit();
                                }
                                _ => {
                                    log::error!("Surface error: {:?}", surface_err);
                                }
                            }
                        } else {
                            log::error!("Render error: {:?}", e);
                        }
                    }
                }

                // Progressive rendering wants a frame every tick
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting GLINT viewer");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    Ok(())
}
