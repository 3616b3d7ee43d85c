//! Entry point for Armature.
//! Logging + CLI flags -> `platform::RunConfig`.

use std::path::PathBuf;

use anyhow::Result;
use corelib::config::{CameraControl, SceneConfig, Variant};

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{other}', falling back to auto.");
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_show_fps_arg() -> bool {
    // --show-fps[=on|off], off by default
    for arg in std::env::args() {
        if arg == "--show-fps" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--show-fps=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

/// --variant=basic|lit|orbit|robot, then --lights=N and --camera=presets|orbit on top.
fn parse_scene_args() -> SceneConfig {
    let mut variant = Variant::Robot;
    let mut lights: Option<usize> = None;
    let mut camera: Option<CameraControl> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--variant=") {
            match Variant::parse(v) {
                Some(parsed) => variant = parsed,
                None => log::warn!("Unknown variant '{v}', keeping {variant:?}."),
            }
        } else if let Some(v) = arg.strip_prefix("--lights=") {
            match v.parse::<usize>() {
                Ok(n) => lights = Some(n),
                Err(_) => log::warn!("Invalid light count '{v}', ignoring."),
            }
        } else if let Some(v) = arg.strip_prefix("--camera=") {
            match CameraControl::parse(v) {
                Some(parsed) => camera = Some(parsed),
                None => log::warn!("Unknown camera control '{v}', ignoring."),
            }
        }
    }

    let mut scene = SceneConfig::for_variant(variant);
    if let Some(n) = lights {
        match scene.with_light_count(n) {
            Ok(with_lights) => scene = with_lights,
            Err(err) => log::warn!("{err}; keeping {} lights.", scene.light_count),
        }
    }
    if let Some(control) = camera {
        scene = scene.with_camera_control(control);
    }
    scene
}

fn parse_bunny_arg() -> Option<PathBuf> {
    std::env::args()
        .filter_map(|arg| arg.strip_prefix("--bunny=").map(PathBuf::from))
        .last()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (width, height) = parse_size_args();
    let config = platform::RunConfig {
        backends: parse_backend_arg(),
        show_fps: parse_show_fps_arg(),
        width,
        height,
        scene: parse_scene_args(),
        bunny: parse_bunny_arg(),
    };
    log::info!(
        "Starting Armature. Backend: {:?}, show_fps={}, window_size={}x{}, scene={:?}",
        config.backends,
        config.show_fps,
        config.width,
        config.height,
        config.scene
    );

    platform::run_with_renderer(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
