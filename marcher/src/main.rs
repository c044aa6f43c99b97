//! # Marcher
//!
//! Entry point for the marcher viewer binary.
//!
//! This executable opens a window that ray-marches the WGSL scene shader on
//! a fullscreen quad, with a first-person fly camera and a live settings
//! overlay. A lightweight file watcher revalidates and reloads the scene
//! shader whenever the file is saved.

mod watcher;

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Result;
use clap::Parser;
use render::ViewerOptions;

/// Interactive SDF ray-marching viewer with a hot-reloading scene shader.
#[derive(Parser, Debug)]
#[command(name = "marcher", version, about)]
struct Args {
    /// WGSL scene shader, watched for live edits
    #[arg(long, default_value = "shaders/scene.wgsl")]
    shader: PathBuf,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Start in borderless fullscreen
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let (reload_tx, reload_rx) = mpsc::channel();
    let _shader_watcher = match watcher::start(&args.shader, reload_tx) {
        Ok(watcher_instance) => {
            tracing::info!("Shader watcher started successfully.");
            Some(watcher_instance)
        }
        Err(e) => {
            tracing::error!("Failed to start shader watcher: {e:?}");
            None
        }
    };

    render::run(
        ViewerOptions {
            shader: args.shader,
            width: args.width,
            height: args.height,
            fullscreen: args.fullscreen,
        },
        reload_rx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args() {
        let args = Args::try_parse_from(["marcher"]).expect("defaults parse");
        assert_eq!(args.shader, PathBuf::from("shaders/scene.wgsl"));
        assert_eq!(args.width, 800);
        assert_eq!(args.height, 600);
        assert!(!args.fullscreen);
    }

    #[test]
    fn explicit_args() {
        let args = Args::try_parse_from([
            "marcher",
            "--shader",
            "demo/other.wgsl",
            "--width",
            "1920",
            "--height",
            "1080",
            "--fullscreen",
        ])
        .expect("explicit args parse");
        assert_eq!(args.shader, PathBuf::from("demo/other.wgsl"));
        assert_eq!(args.width, 1920);
        assert_eq!(args.height, 1080);
        assert!(args.fullscreen);
    }
}
