use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use egui_wgpu::ScreenDescriptor;
use tracing::{error, info, warn};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Fullscreen, Window};

use crate::camera::{Camera, CameraController};
use crate::gpu_types::{CameraUniform, MarchUniform};
use crate::overlay::{Overlay, Settings};
use crate::pipeline;
use crate::shader::SceneShader;

pub struct State {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    march_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    camera: Camera,
    controller: CameraController,
    shader: SceneShader,
    overlay: Overlay,
    pub settings: Settings,
    last_frame: Instant,
    frame_ms: f32,
    screenshot_requested: bool,
}

impl State {
    pub async fn new(window: Arc<Window>, shader_path: &Path) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to get adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Marcher Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to request device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        // COPY_SRC lets F12 read the frame back for screenshots; not every
        // backend offers it on the swapchain.
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC) {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }
        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let camera = Camera::new(config.width, config.height);
        let controller = CameraController::new(12.5, 1.0);
        let settings = Settings::default();

        let camera_uniform = CameraUniform::from_camera(&camera);
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));

        let march_uniform = MarchUniform::new(&settings, config.width, config.height);
        let march_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("March Params Buffer"),
            size: std::mem::size_of::<MarchUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&march_buffer, 0, bytemuck::bytes_of(&march_uniform));

        let bind_group_layout = pipeline::create_bind_group_layout(&device);
        let bind_group =
            pipeline::create_bind_group(&device, &bind_group_layout, &camera_buffer, &march_buffer);

        let shader = SceneShader::load(shader_path);
        let render_pipeline =
            pipeline::create_render_pipeline(&device, &bind_group_layout, format, shader.source());
        let vertex_buffer = pipeline::create_fullscreen_quad(&device);

        let overlay = Overlay::new(&window, &device, format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            bind_group_layout,
            pipeline: render_pipeline,
            vertex_buffer,
            camera_buffer,
            march_buffer,
            bind_group,
            camera,
            controller,
            shader,
            overlay,
            settings,
            last_frame: Instant::now(),
            frame_ms: 16.7,
            screenshot_requested: false,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.camera.resize(new_size.width, new_size.height);
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Offer a window event to the overlay. Returns `true` when the UI
    /// consumed it.
    pub fn overlay_event(&mut self, event: &WindowEvent) -> bool {
        self.overlay.on_window_event(&self.window, event)
    }

    /// Handle camera and hotkey input. Returns `true` when the event was
    /// acted on.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match code {
                KeyCode::F11 if *state == ElementState::Pressed && !repeat => {
                    self.settings.fullscreen = !self.settings.fullscreen;
                    true
                }
                KeyCode::F12 if *state == ElementState::Pressed && !repeat => {
                    self.screenshot_requested = true;
                    true
                }
                _ => self.controller.process_keyboard(*code, *state),
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.set_look_active(*state == ElementState::Pressed);
                true
            }
            _ => false,
        }
    }

    /// Apply a raw mouse delta while the look button is held.
    pub fn mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.controller.look_active {
            self.controller
                .process_mouse(&mut self.camera, delta_x, delta_y);
        }
    }

    fn set_look_active(&mut self, active: bool) {
        if active == self.controller.look_active {
            return;
        }
        self.controller.look_active = active;
        if active {
            if let Err(e) = self
                .window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked))
            {
                warn!("Could not grab cursor: {e}");
            }
            self.window.set_cursor_visible(false);
        } else {
            if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Could not release cursor: {e}");
            }
            self.window.set_cursor_visible(true);
        }
    }

    /// Swap the running pipeline for one built from the freshly saved shader.
    ///
    /// A file that no longer validates leaves the current pipeline in place.
    pub fn reload_scene_shader(&mut self) {
        match self.shader.reload() {
            Ok(()) => {
                self.pipeline = pipeline::create_render_pipeline(
                    &self.device,
                    &self.bind_group_layout,
                    self.config.format,
                    self.shader.source(),
                );
                info!("Scene shader reloaded from {}", self.shader.path().display());
            }
            Err(e) => {
                error!("Scene shader reload failed, keeping previous pipeline: {e:#}");
            }
        }
    }

    /// Advance the camera and apply overlay-driven window state.
    pub fn update(&mut self) {
        let dt = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();
        self.frame_ms = 0.9 * self.frame_ms + 0.1 * dt * 1000.0;

        self.controller.speed = self.settings.camera_speed;
        self.controller.update_camera(&mut self.camera, dt);

        let is_fullscreen = self.window.fullscreen().is_some();
        if self.settings.fullscreen != is_fullscreen {
            self.window.set_fullscreen(
                self.settings
                    .fullscreen
                    .then(|| Fullscreen::Borderless(None)),
            );
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let camera_uniform = CameraUniform::from_camera(&self.camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));
        let march_uniform =
            MarchUniform::new(&self.settings, self.config.width, self.config.height);
        self.queue
            .write_buffer(&self.march_buffer, 0, bytemuck::bytes_of(&march_uniform));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("enc") });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
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
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.draw(0..6, 0..1);
        }

        let screen = ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let window = self.window.clone();
        let frame_ms = self.frame_ms;
        self.overlay.draw(
            &window,
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &screen,
            &mut self.settings,
            frame_ms,
        );

        let readback = if self.screenshot_requested {
            self.screenshot_requested = false;
            self.queue_screenshot_copy(&mut encoder, &output.texture)
        } else {
            None
        };

        self.queue.submit(Some(encoder.finish()));

        if let Some(buffer) = readback {
            self.save_screenshot(&buffer);
        }

        output.present();
        Ok(())
    }

    /// Queue a copy of the frame into a row-padded readback buffer.
    fn queue_screenshot_copy(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        texture: &wgpu::Texture,
    ) -> Option<wgpu::Buffer> {
        if !self.config.usage.contains(wgpu::TextureUsages::COPY_SRC) {
            warn!("Surface does not support readback on this backend, no screenshot taken");
            return None;
        }

        let width = self.config.width;
        let height = self.config.height;
        // Buffer-to-texture copies require 256-byte row alignment.
        let bytes_per_row = (width * 4 + 255) / 256 * 256;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screenshot Readback"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Some(buffer)
    }

    /// Map the readback buffer and write a timestamped PNG next to the
    /// executable.
    fn save_screenshot(&self, buffer: &wgpu::Buffer) {
        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        match rx.recv() {
            Ok(Ok(())) => {}
            other => {
                error!("Screenshot readback mapping failed: {other:?}");
                return;
            }
        }

        let width = self.config.width;
        let height = self.config.height;
        let bytes_per_row = ((width * 4 + 255) / 256 * 256) as usize;
        let padded = slice.get_mapped_range();

        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for row in padded.chunks(bytes_per_row) {
            pixels.extend_from_slice(&row[..(width * 4) as usize]);
        }
        drop(padded);
        buffer.unmap();

        if matches!(
            self.config.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }

        let name = format!(
            "screenshot_{}.png",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        match image::save_buffer(&name, &pixels, width, height, image::ColorType::Rgba8) {
            Ok(()) => info!("Saved {name}"),
            Err(e) => error!("Could not save screenshot: {e}"),
        }
    }
}
