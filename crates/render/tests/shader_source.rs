use std::fs;
use std::path::PathBuf;

use render::shader::{self, SceneShader, DEFAULT_SCENE};

const MINIMAL: &str =
    "@vertex\nfn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }\n";
const MINIMAL_EDITED: &str =
    "@vertex\nfn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0, 0.0, 0.0, 1.0); }\n";

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("marcher-shader-tests");
    fs::create_dir_all(&dir).expect("create temp dir");
    dir.join(name)
}

#[test]
fn validate_accepts_minimal_module() {
    shader::validate(MINIMAL).expect("minimal module validates");
}

#[test]
fn validate_rejects_garbage() {
    assert!(shader::validate("this is not wgsl").is_err());
}

#[test]
fn validate_rejects_well_formed_but_invalid_module() {
    // Parses, but a vertex entry point must return a position.
    let src = "@vertex\nfn vs_main() -> @location(0) f32 { return 0.0; }\n";
    assert!(shader::validate(src).is_err());
}

#[test]
fn missing_file_falls_back_to_embedded_scene() {
    let loaded = SceneShader::load(temp_file("does-not-exist.wgsl"));
    assert_eq!(loaded.source(), DEFAULT_SCENE);
}

#[test]
fn valid_file_is_loaded() {
    let path = temp_file("valid.wgsl");
    fs::write(&path, MINIMAL).expect("write shader");
    let loaded = SceneShader::load(&path);
    assert_eq!(loaded.source(), MINIMAL);
}

#[test]
fn broken_file_falls_back_to_embedded_scene_at_startup() {
    let path = temp_file("broken.wgsl");
    fs::write(&path, "fn nope(").expect("write shader");
    let loaded = SceneShader::load(&path);
    assert_eq!(loaded.source(), DEFAULT_SCENE);
}

#[test]
fn reload_picks_up_saved_edits() {
    let path = temp_file("reload.wgsl");
    fs::write(&path, MINIMAL).expect("write shader");
    let mut loaded = SceneShader::load(&path);
    fs::write(&path, MINIMAL_EDITED).expect("overwrite shader");
    loaded.reload().expect("edited shader reloads");
    assert_eq!(loaded.source(), MINIMAL_EDITED);
}

#[test]
fn failed_reload_keeps_previous_source() {
    let path = temp_file("reload-broken.wgsl");
    fs::write(&path, MINIMAL).expect("write shader");
    let mut loaded = SceneShader::load(&path);
    fs::write(&path, "struct {").expect("overwrite shader");
    assert!(loaded.reload().is_err());
    assert_eq!(loaded.source(), MINIMAL);
}

#[test]
fn reload_of_deleted_file_keeps_previous_source() {
    let path = temp_file("reload-deleted.wgsl");
    fs::write(&path, MINIMAL).expect("write shader");
    let mut loaded = SceneShader::load(&path);
    fs::remove_file(&path).expect("remove shader");
    assert!(loaded.reload().is_err());
    assert_eq!(loaded.source(), MINIMAL);
}
