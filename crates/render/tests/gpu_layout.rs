use std::mem::{offset_of, size_of};

use glam::{Mat4, Vec4};
use render::camera::Camera;
use render::gpu_types::{CameraUniform, MarchUniform};
use render::overlay::Settings;

#[test]
fn march_uniform_matches_wgsl_layout() {
    assert_eq!(size_of::<MarchUniform>(), 48);
    assert_eq!(offset_of!(MarchUniform, resolution), 0);
    assert_eq!(offset_of!(MarchUniform, max_steps), 8);
    assert_eq!(offset_of!(MarchUniform, max_dist), 12);
    assert_eq!(offset_of!(MarchUniform, surf_dist), 16);
    // sliders is a vec4 in the shader and must sit on a 16-byte boundary.
    assert_eq!(offset_of!(MarchUniform, sliders), 32);
}

#[test]
fn camera_uniform_matches_wgsl_layout() {
    assert_eq!(size_of::<CameraUniform>(), 144);
    assert_eq!(offset_of!(CameraUniform, view_proj_inv), 64);
    assert_eq!(offset_of!(CameraUniform, eye), 128);
}

#[test]
fn march_uniform_carries_default_settings() {
    let uniform = MarchUniform::new(&Settings::default(), 800, 600);
    assert_eq!(uniform.resolution, [800.0, 600.0]);
    assert_eq!(uniform.max_steps, 500);
    assert_eq!(uniform.max_dist, 5000.0);
    assert_eq!(uniform.surf_dist, 0.001);
    assert_eq!(uniform.sliders, [0.5; 4]);
}

#[test]
fn camera_uniform_inverse_is_consistent() {
    let camera = Camera::new(800, 600);
    let uniform = CameraUniform::from_camera(&camera);
    let view_proj = Mat4::from_cols_array_2d(&uniform.view_proj);
    let inverse = Mat4::from_cols_array_2d(&uniform.view_proj_inv);
    // f32 inverse of a 5000-unit far plane projection is only so exact.
    assert!((view_proj * inverse).abs_diff_eq(Mat4::IDENTITY, 5e-3));
}

#[test]
fn unprojecting_screen_center_recovers_forward() {
    // Mirrors the ray setup in the fragment shader: unproject the far plane
    // at ndc (0, 0) and the direction from the eye must be the camera
    // forward vector.
    let mut camera = Camera::new(800, 600);
    camera.yaw = 0.7;
    camera.pitch = -0.3;
    let uniform = CameraUniform::from_camera(&camera);
    let inverse = Mat4::from_cols_array_2d(&uniform.view_proj_inv);
    let far = inverse * Vec4::new(0.0, 0.0, 1.0, 1.0);
    let dir = (far.truncate() / far.w - camera.eye).normalize();
    assert!(dir.abs_diff_eq(camera.forward(), 1e-3));
}
