//! Camera and controller for first-person navigation
//!
//! This module provides a simple fly camera with keyboard and mouse controls
//! for moving through the ray-marched scene.

use glam::{Mat4, Quat, Vec3};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Pitch is kept just short of straight up/down so the view matrix never
/// degenerates.
const PITCH_LIMIT: f32 = 1.54;

/// First person camera feeding the ray marcher
pub struct Camera {
    /// Camera position in world space
    pub eye: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Render target aspect ratio
    pub aspect: f32,
    /// Field of view in radians
    pub fovy: f32,
    /// Near clipping plane distance
    pub znear: f32,
    /// Far clipping plane distance
    pub zfar: f32,
    /// Horizontal rotation of the camera
    pub yaw: f32,
    /// Vertical rotation of the camera
    pub pitch: f32,
}

impl Camera {
    /// Create a new camera with default settings, looking down -Z from just
    /// above the floor plane.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::Y,
            aspect: width as f32 / height as f32,
            fovy: 45.0f32.to_radians(),
            znear: 0.1,
            zfar: 5000.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Update aspect ratio when the window is resized
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn orientation(&self) -> Quat {
        let yaw_quat = Quat::from_axis_angle(Vec3::Y, self.yaw);
        let pitch_quat = Quat::from_axis_angle(Vec3::X, self.pitch);
        yaw_quat * pitch_quat
    }

    /// Get the camera's forward direction vector
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// Get the camera's right direction vector
    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    /// Computes a view projection matrix from the camera parameters
    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let target = self.eye + self.forward();
        let view = Mat4::look_at_rh(self.eye, target, self.up);
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

/// First person camera controller for handling input
pub struct CameraController {
    /// Movement speed in world units per second, tunable from the overlay
    pub speed: f32,
    /// Mouse look sensitivity
    pub sensitivity: f32,
    /// True while the look button is held and the cursor is grabbed
    pub look_active: bool,
    is_forward_pressed: bool,
    is_backward_pressed: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
    is_up_pressed: bool,
    is_down_pressed: bool,
}

impl CameraController {
    /// Create a new camera controller
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            look_active: false,
            is_forward_pressed: false,
            is_backward_pressed: false,
            is_left_pressed: false,
            is_right_pressed: false,
            is_up_pressed: false,
            is_down_pressed: false,
        }
    }

    /// Process keyboard events to update movement state.
    ///
    /// Returns `true` when the key is one of the movement bindings.
    pub fn process_keyboard(&mut self, keycode: KeyCode, state: ElementState) -> bool {
        let is_pressed = state == ElementState::Pressed;
        match keycode {
            KeyCode::KeyW => {
                self.is_forward_pressed = is_pressed;
                true
            }
            KeyCode::KeyA => {
                self.is_left_pressed = is_pressed;
                true
            }
            KeyCode::KeyS => {
                self.is_backward_pressed = is_pressed;
                true
            }
            KeyCode::KeyD => {
                self.is_right_pressed = is_pressed;
                true
            }
            KeyCode::Space => {
                self.is_up_pressed = is_pressed;
                true
            }
            KeyCode::ShiftLeft => {
                self.is_down_pressed = is_pressed;
                true
            }
            _ => false,
        }
    }

    /// Process mouse motion deltas to update the camera look direction
    pub fn process_mouse(&self, camera: &mut Camera, delta_x: f64, delta_y: f64) {
        camera.yaw -= delta_x as f32 * self.sensitivity * 0.001;
        camera.pitch -= delta_y as f32 * self.sensitivity * 0.001;
        camera.pitch = camera.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Update camera position based on current input state
    pub fn update_camera(&self, camera: &mut Camera, dt: f32) {
        let forward_dir = camera.forward();
        let right_dir = camera.right();

        let mut velocity = Vec3::ZERO;
        if self.is_forward_pressed {
            velocity += forward_dir;
        }
        if self.is_backward_pressed {
            velocity -= forward_dir;
        }
        if self.is_right_pressed {
            velocity += right_dir;
        }
        if self.is_left_pressed {
            velocity -= right_dir;
        }

        // Normalize to prevent faster diagonal movement
        if velocity.length_squared() > 0.0 {
            camera.eye += velocity.normalize() * self.speed * dt;
        }

        // Vertical movement (global axis)
        if self.is_up_pressed {
            camera.eye.y += self.speed * dt;
        }
        if self.is_down_pressed {
            camera.eye.y -= self.speed * dt;
        }
    }
}
