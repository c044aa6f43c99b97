use std::fs;
use std::path::Path;

fn validate_shader(path: &Path) {
    let src = fs::read_to_string(path).expect("read shader");
    let module = naga::front::wgsl::parse_str(&src).expect("wgsl parse");
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).expect("wgsl validate");
}

#[test]
fn compile_scene_shader() {
    let shader = Path::new("../../shaders/scene.wgsl");
    validate_shader(shader);
}

#[test]
fn embedded_scene_matches_disk_copy() {
    let disk = fs::read_to_string("../../shaders/scene.wgsl").expect("read shader");
    assert_eq!(render::shader::DEFAULT_SCENE, disk);
}

#[test]
fn scene_shader_declares_both_entry_points() {
    let src = fs::read_to_string("../../shaders/scene.wgsl").expect("read shader");
    let module = naga::front::wgsl::parse_str(&src).expect("wgsl parse");
    let names: Vec<&str> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}
