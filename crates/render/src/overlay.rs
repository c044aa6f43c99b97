//! Immediate-mode settings panel drawn over the scene
//!
//! The overlay owns the egui context plus the winit and wgpu integration
//! state, and paints in its own load pass after the scene so the marcher's
//! output stays untouched underneath it.

use egui_wgpu::ScreenDescriptor;
use winit::event::WindowEvent;
use winit::window::Window;

/// Parameters tuned live from the panel
pub struct Settings {
    pub fullscreen: bool,
    pub max_steps: u32,
    pub max_dist: f32,
    pub surf_dist: f32,
    pub sliders: [f32; 4],
    pub camera_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fullscreen: false,
            max_steps: 500,
            max_dist: 5000.0,
            surf_dist: 0.001,
            sliders: [0.5; 4],
            camera_speed: 12.5,
        }
    }
}

pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(ctx.clone(), egui::ViewportId::ROOT, window, None, None);
        let renderer = egui_wgpu::Renderer::new(device, format, None, 1);
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Feed a window event to the UI. Returns `true` when egui consumed it
    /// and it should not reach the camera.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Build the settings window and paint it on top of `view`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        screen: &ScreenDescriptor,
        settings: &mut Settings,
        frame_ms: f32,
    ) {
        let input = self.state.take_egui_input(window);
        let output = self.ctx.run(input, |ctx| {
            egui::Window::new("Settings")
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.checkbox(&mut settings.fullscreen, "Fullscreen");
                    ui.separator();

                    ui.add(
                        egui::Slider::new(&mut settings.max_steps, 1..=2000).text("max steps"),
                    );
                    ui.add(
                        egui::Slider::new(&mut settings.max_dist, 1.0..=10_000.0)
                            .logarithmic(true)
                            .text("max distance"),
                    );
                    ui.add(
                        egui::Slider::new(&mut settings.surf_dist, 0.000_1..=1.0)
                            .logarithmic(true)
                            .text("surface distance"),
                    );
                    ui.separator();

                    for (i, value) in settings.sliders.iter_mut().enumerate() {
                        ui.add(
                            egui::Slider::new(value, -10.0..=10.0).text(format!("slider {i}")),
                        );
                    }
                    ui.separator();

                    ui.add(
                        egui::Slider::new(&mut settings.camera_speed, 0.1..=100.0)
                            .logarithmic(true)
                            .text("camera speed"),
                    );
                    ui.label(format!(
                        "{:.3} ms/frame ({:.1} FPS)",
                        frame_ms,
                        1000.0 / frame_ms.max(0.001)
                    ));
                });
        });

        self.state
            .handle_platform_output(window, output.platform_output);

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &primitives, screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut pass, &primitives, screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
