//! Interface to the shader program: named uniforms and draw calls.

use crate::error::CoreResult;
use crate::{Mat3, Mat4, Vec3, Vec4};

pub const PROJECTION: &str = "mProjection";
pub const VIEW: &str = "mView";
pub const MODEL_VIEW: &str = "mModelView";
pub const NORMALS: &str = "mNormals";
pub const COLOR: &str = "uColor";
pub const LIGHT_COUNT: &str = "uNLights";

/// Name of a field of light slot `index`, e.g. `uLights[1].diffuse`.
pub fn light_uniform(index: usize, field: &str) -> String {
    format!("uLights[{index}].{field}")
}

/// Name of a material field, e.g. `uMaterial.Kd`.
pub fn material_uniform(field: &str) -> String {
    format!("uMaterial.{field}")
}

/// Primitive topology of a draw: `gl.LINES` vs `gl.TRIANGLES`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Wireframe,
    #[default]
    Filled,
}

/// Handle of a mesh uploaded once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Geometry {
    Cube,
    Cylinder,
    Torus,
    Bunny,
}

impl Geometry {
    pub const ALL: [Geometry; 4] = [Self::Cube, Self::Cylinder, Self::Torus, Self::Bunny];
}

/// Fixed-function state re-applied every frame from the options panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub backface_culling: bool,
    pub depth_test: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            backface_culling: true,
            depth_test: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Count(u32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self {
        Self::Mat3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

/// A linked shader program plus the context it draws into.
///
/// Uniform writes stay bound until overwritten; `draw` uses whatever is
/// bound at the time of the call. An unknown uniform name is an error, not
/// a silent no-op.
pub trait Program {
    fn begin_frame(&mut self, clear_color: [f32; 4]);

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> CoreResult<()>;

    fn draw(&mut self, geometry: Geometry, mode: DrawMode) -> CoreResult<()>;

    fn apply_options(&mut self, options: RenderOptions);
}
