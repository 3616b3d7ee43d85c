//! Core types: math re-exports, matrix stack, scene walk, robot arm and
//! the frame driver. Nothing in here touches the GPU.

pub use glam::{Mat3, Mat4, Vec3, Vec4, vec3};

pub mod arm;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod lighting;
pub mod program;
pub mod scene;
pub mod stack;
pub mod state;
pub mod transform;

#[cfg(test)]
mod testing;

pub use error::{CoreError, CoreResult};
