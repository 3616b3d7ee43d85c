//! All mutable scene parameters in one place.

use crate::arm::RobotArm;
use crate::camera::{Camera, Orbit, ViewPreset};
use crate::config::{CameraControl, SceneConfig};
use crate::input::{Command, CommandQueue, ZOOM_STEP};
use crate::lighting::{Lights, Material};
use crate::program::{DrawMode, RenderOptions};
use crate::vec3;

pub const CLEAR_COLOR: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

#[derive(Clone, Debug)]
pub struct SceneState {
    pub config: SceneConfig,
    pub camera: Camera,
    pub lights: Lights,
    pub material: Material,
    pub options: RenderOptions,
    pub arm: RobotArm,
    pub mode: DrawMode,
    pub zoom: f32,
    pub orbit: Orbit,
    pub aspect: f32,
    pub clear_color: [f32; 4],
}

impl SceneState {
    pub fn new(config: SceneConfig) -> Self {
        let mut camera = Camera::default();
        if config.camera_control == CameraControl::Orbit {
            // Orbit pivots on `at`, so start framed on the scene.
            camera.apply_preset(ViewPreset::Front, config.world_offset);
        }
        Self {
            config,
            camera,
            lights: config.initial_lights(),
            material: Material::default(),
            options: RenderOptions::default(),
            // Foot of the arm on top of the ground slab.
            arm: RobotArm::new(config.world_offset + vec3(0.0, 0.25, 0.0)),
            mode: DrawMode::default(),
            zoom: 1.0,
            orbit: Orbit::default(),
            aspect: 16.0 / 9.0,
            clear_color: CLEAR_COLOR,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ViewPreset(preset) => {
                self.camera.apply_preset(preset, self.config.world_offset);
                self.orbit = Orbit::default();
                log::debug!("view preset {preset:?}");
            }
            Command::DrawMode(mode) => {
                self.mode = mode;
                log::debug!("draw mode {mode:?}");
            }
            Command::Joint { joint, increase } => {
                let before = self.arm.angles.get(joint);
                self.arm.angles.step(joint, increase);
                let after = self.arm.angles.get(joint);
                if before == after {
                    log::trace!("{joint:?} held at limit {after}");
                } else {
                    log::debug!("{joint:?} = {after}");
                }
            }
            Command::ZoomIn => self.zoom = self.camera.clamp_zoom(self.zoom / ZOOM_STEP),
            Command::ZoomOut => self.zoom = self.camera.clamp_zoom(self.zoom * ZOOM_STEP),
            Command::OrbitDrag { dx, dy, height } => {
                if self.config.camera_control == CameraControl::Orbit {
                    self.orbit.drag(dx, dy, height);
                }
            }
            Command::Resize { width, height } => {
                self.aspect = width.max(1) as f32 / height.max(1) as f32;
            }
            Command::SetCamera(camera) => self.camera = camera,
            Command::SetLight { index, light } => {
                if !self.lights.set(index, light) {
                    log::warn!("ignoring edit of inactive light slot {index}");
                }
            }
            Command::SetMaterial(material) => self.material = material,
            Command::SetOptions(options) => self.options = options,
        }
    }

    /// Apply everything queued since the previous frame.
    pub fn drain(&mut self, queue: &mut CommandQueue) -> usize {
        let mut applied = 0;
        for command in queue.drain() {
            self.apply(command);
            applied += 1;
        }
        applied
    }
}
