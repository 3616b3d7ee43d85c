//! Platform layer: window, event loop, input, parameter panel.
//!
//! Frames are driven by `RedrawRequested`; each one runs the panel, drains
//! the command queue into the scene state, records the scene walk and
//! submits it. Presentation uses vsync, so this is one frame per refresh.

mod app;
mod gui;
mod input;
mod meshes;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use corelib::config::SceneConfig;
use winit::event_loop::{ControlFlow, EventLoop};

pub use app::App;

/// Everything the app crate decides before the window opens.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub scene: SceneConfig,
    /// OBJ for the bunny; a sphere stands in when missing.
    pub bunny: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            show_fps: false,
            width: 1280,
            height: 720,
            scene: SceneConfig::default(),
            bunny: None,
        }
    }
}

/// Open the window and render until it is closed or a frame fails.
pub fn run_with_renderer(config: RunConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("Event loop error: {e:?}"))?;
    app.finish()
}
