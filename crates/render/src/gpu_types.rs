//! GPU-compatible type definitions for rendering
//!
//! This module contains the uniform structures passed to the WGSL scene
//! shader. All types must be Pod and match the shader's struct layout.

use bytemuck::{Pod, Zeroable};

use crate::camera::Camera;
use crate::overlay::Settings;

/// Uniform buffer that stores camera matrices for the ray marcher
///
/// The buffer contains both the view projection matrix and its inverse as well
/// as the current eye position which are required to reconstruct world-space
/// rays in the fragment shader.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Inverse of view_proj used to transform rays into world space
    pub view_proj_inv: [[f32; 4]; 4],
    /// Camera position in world coordinates
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        let view_proj = camera.build_view_projection_matrix();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view_proj_inv: view_proj.inverse().to_cols_array_2d(),
            eye: [camera.eye.x, camera.eye.y, camera.eye.z, 1.0],
        }
    }
}

/// Ray-marching parameters tuned live from the settings overlay
///
/// Field order and padding mirror the `MarchParams` struct in the scene
/// shader; `sliders` must start at offset 32.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct MarchUniform {
    /// Drawable size in pixels
    pub resolution: [f32; 2],
    /// Maximum sphere-tracing iterations per ray
    pub max_steps: u32,
    /// Rays farther than this are treated as misses
    pub max_dist: f32,
    /// Distance at which a ray is considered to have hit a surface
    pub surf_dist: f32,
    pub _pad: [f32; 3],
    /// Free-form scene parameters wired to the overlay sliders
    pub sliders: [f32; 4],
}

impl MarchUniform {
    pub fn new(settings: &Settings, width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            max_steps: settings.max_steps,
            max_dist: settings.max_dist,
            surf_dist: settings.surf_dist,
            _pad: [0.0; 3],
            sliders: settings.sliders,
        }
    }
}
