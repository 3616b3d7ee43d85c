//! Input commands. Handlers enqueue; the frame drains the queue once at
//! its start, so every frame sees a consistent snapshot of the parameters.

use std::collections::VecDeque;

use crate::arm::Joint;
use crate::camera::{Camera, ViewPreset};
use crate::lighting::{Light, Material};
use crate::program::{DrawMode, RenderOptions};

pub const ZOOM_STEP: f32 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    ViewPreset(ViewPreset),
    DrawMode(DrawMode),
    Joint { joint: Joint, increase: bool },
    ZoomIn,
    ZoomOut,
    /// Mouse drag in pixels on a canvas `height` pixels tall.
    OrbitDrag { dx: f32, dy: f32, height: f32 },
    Resize { width: u32, height: u32 },
    SetCamera(Camera),
    SetLight { index: usize, light: Light },
    SetMaterial(Material),
    SetOptions(RenderOptions),
}

/// Keyboard binding for a typed character.
pub fn command_for_key(key: &str) -> Option<Command> {
    let joint = |joint, increase| Some(Command::Joint { joint, increase });
    match key {
        "1" => Some(Command::ViewPreset(ViewPreset::Front)),
        "2" => Some(Command::ViewPreset(ViewPreset::Top)),
        "3" => Some(Command::ViewPreset(ViewPreset::Right)),
        "4" => Some(Command::ViewPreset(ViewPreset::Isometric)),
        "9" => Some(Command::DrawMode(DrawMode::Wireframe)),
        "0" => Some(Command::DrawMode(DrawMode::Filled)),
        "p" => joint(Joint::ClawSpread, true),
        "o" => joint(Joint::ClawSpread, false),
        "q" => joint(Joint::WristYaw, true),
        "e" => joint(Joint::WristYaw, false),
        "w" => joint(Joint::ElbowPitch, true),
        "s" => joint(Joint::ElbowPitch, false),
        "a" => joint(Joint::ShoulderYaw, false),
        "d" => joint(Joint::ShoulderYaw, true),
        "+" => Some(Command::ZoomIn),
        "-" => Some(Command::ZoomOut),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending command in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings() {
        let joint = |joint, increase| Some(Command::Joint { joint, increase });
        let table = [
            ("1", Some(Command::ViewPreset(ViewPreset::Front))),
            ("2", Some(Command::ViewPreset(ViewPreset::Top))),
            ("3", Some(Command::ViewPreset(ViewPreset::Right))),
            ("4", Some(Command::ViewPreset(ViewPreset::Isometric))),
            ("9", Some(Command::DrawMode(DrawMode::Wireframe))),
            ("0", Some(Command::DrawMode(DrawMode::Filled))),
            ("p", joint(Joint::ClawSpread, true)),
            ("o", joint(Joint::ClawSpread, false)),
            ("q", joint(Joint::WristYaw, true)),
            ("e", joint(Joint::WristYaw, false)),
            ("w", joint(Joint::ElbowPitch, true)),
            ("s", joint(Joint::ElbowPitch, false)),
            ("a", joint(Joint::ShoulderYaw, false)),
            ("d", joint(Joint::ShoulderYaw, true)),
            ("+", Some(Command::ZoomIn)),
            ("-", Some(Command::ZoomOut)),
            ("x", None),
            ("5", None),
            ("P", None),
        ];
        for (key, expected) in table {
            assert_eq!(command_for_key(key), expected, "key {key:?}");
        }
    }

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = CommandQueue::new();
        queue.push(Command::ZoomIn);
        queue.push(Command::ZoomOut);
        let drained: Vec<Command> = queue.drain().collect();
        assert_eq!(drained, vec![Command::ZoomIn, Command::ZoomOut]);
        assert!(queue.is_empty());
    }
}
