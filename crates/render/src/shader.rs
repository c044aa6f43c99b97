//! Scene shader source management
//!
//! The scene lives in a single WGSL file on disk so it can be edited while
//! the viewer is running. Sources are parsed and validated with naga before
//! they reach wgpu; a file that fails validation never replaces the source
//! that is currently rendering.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::warn;

/// Embedded copy of the stock scene, used when the on-disk file is missing
/// or broken at startup.
pub const DEFAULT_SCENE: &str = include_str!("../../../shaders/scene.wgsl");

/// The WGSL source currently driving the render pipeline
pub struct SceneShader {
    path: PathBuf,
    source: String,
}

impl SceneShader {
    /// Load the shader from `path`, falling back to the embedded scene if the
    /// file cannot be read or does not validate.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = match fs::read_to_string(&path) {
            Ok(source) => match validate(&source) {
                Ok(()) => source,
                Err(e) => {
                    warn!(
                        "Shader {} failed validation, using built-in scene: {e:#}",
                        path.display()
                    );
                    DEFAULT_SCENE.to_owned()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read shader {}, using built-in scene: {e}",
                    path.display()
                );
                DEFAULT_SCENE.to_owned()
            }
        };
        Self { path, source }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Re-read the file from disk and validate it.
    ///
    /// On any failure the previous source is kept so the pipeline built from
    /// it stays usable.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or the new source fails
    /// WGSL parsing or validation.
    pub fn reload(&mut self) -> Result<()> {
        let source = fs::read_to_string(&self.path)
            .with_context(|| format!("could not read shader `{}`", self.path.display()))?;
        validate(&source)?;
        self.source = source;
        Ok(())
    }
}

/// Parse and validate a WGSL module without touching the GPU
///
/// # Errors
///
/// Returns the naga parse or validation diagnostics rendered against the
/// offending source.
pub fn validate(source: &str) -> Result<()> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!(e.emit_to_string(source)))?;
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| anyhow!(e.emit_to_string(source)))?;
    Ok(())
}
