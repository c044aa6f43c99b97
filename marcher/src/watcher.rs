//! # Shader Hot-Reloading
//!
//! Watches the directory containing the scene shader and forwards
//! modification events to the render loop, which revalidates the file and
//! rebuilds the pipeline at the next frame boundary.
//!
//! The watcher is implemented with the [`notify`](https://crates.io/crates/notify)
//! crate, which delivers cross-platform file system notifications on its own
//! thread, so the render loop is never blocked.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use anyhow::{bail, Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tracing::{error, info};

const SHADER_EXTENSION: &str = "wgsl";

/// Check if a path represents a shader file we should react to
fn is_shader_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SHADER_EXTENSION)
}

/// Sets up and starts the file watcher for the scene shader.
///
/// The directory containing `shader` is watched (editors commonly replace
/// the file on save, so watching the file itself would go stale); paths of
/// modified or created `.wgsl` files are sent over `reloads`.
///
/// The caller is responsible for keeping the returned watcher alive. If it
/// is dropped, change notifications stop.
///
/// # Errors
///
/// Returns an error if the shader's directory does not exist or the watcher
/// cannot be initialized.
pub fn start(shader: &Path, reloads: Sender<PathBuf>) -> Result<RecommendedWatcher> {
    info!("Initializing shader hot-reload watcher...");

    let dir = match shader.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        bail!("shader directory `{}` not found", dir.display());
    }

    let mut watcher =
        notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !event.kind.is_modify() && !event.kind.is_create() {
                    return;
                }
                for path in &event.paths {
                    if is_shader_file(path) {
                        // A closed receiver just means the window is gone.
                        let _ = reloads.send(path.clone());
                    }
                }
            }
            Err(e) => error!("Error watching shader files: {e:?}"),
        })
        .context("failed to create file watcher")?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch `{}`", dir.display()))?;

    info!("Shader watcher active - monitoring `{}`", dir.display());
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn shader_file_filter() {
        assert!(is_shader_file(Path::new("shaders/scene.wgsl")));
        assert!(is_shader_file(Path::new("deep/nested/dir/x.wgsl")));
        assert!(!is_shader_file(Path::new("shaders/scene.glsl")));
        assert!(!is_shader_file(Path::new("shaders/wgsl")));
        assert!(!is_shader_file(Path::new("src/main.rs")));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let (tx, _rx) = mpsc::channel();
        let result = start(Path::new("definitely/not/a/real/dir/scene.wgsl"), tx);
        assert!(result.is_err());
    }
}
