use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, WindowBuilder};

use crate::state::State;

/// Startup options handed over from the command line.
pub struct ViewerOptions {
    /// WGSL scene shader to render and watch
    pub shader: PathBuf,
    /// Initial window width in logical pixels
    pub width: u32,
    /// Initial window height in logical pixels
    pub height: u32,
    /// Start in borderless fullscreen
    pub fullscreen: bool,
}

/// Open the viewer window and run its event loop until the user quits.
///
/// Shader paths arriving on `reloads` are drained once per frame; each batch
/// triggers a single pipeline rebuild.
pub fn run(opts: ViewerOptions, reloads: Receiver<PathBuf>) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut builder = WindowBuilder::new()
        .with_title("marcher")
        .with_inner_size(LogicalSize::new(opts.width, opts.height));
    if opts.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = Arc::new(builder.build(&event_loop).context("failed to create window")?);

    let mut state = pollster::block_on(State::new(window.clone(), &opts.shader))?;
    state.settings.fullscreen = opts.fullscreen;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == state.window.id() => {
            let ui_consumed = state.overlay_event(event);
            if !ui_consumed && state.input(event) {
                return;
            }
            match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    state.resize(*physical_size);
                }
                WindowEvent::RedrawRequested => {
                    let mut dirty = false;
                    while reloads.try_recv().is_ok() {
                        dirty = true;
                    }
                    if dirty {
                        state.reload_scene_shader();
                    }

                    state.update();
                    match state.render() {
                        Ok(()) => {}
                        // Reconfigure the surface if lost
                        Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                        // The system is out of memory, we should probably quit
                        Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                        // All other errors (Outdated, Timeout) should be resolved by the next frame
                        Err(e) => tracing::warn!("surface error: {e:?}"),
                    }
                }
                _ => {}
            }
        }
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => {
            state.mouse_motion(delta.0, delta.1);
        }
        Event::AboutToWait => {
            state.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
