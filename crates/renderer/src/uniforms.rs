//! GPU uniform layouts and the [`Program`] implementation that fills them.
//!
//! The scene walk talks to the program by uniform name. [`FrameRecorder`]
//! resolves each name to a field of a std140-compatible struct and snapshots
//! the per-object block at every draw; the renderer uploads the result once
//! per frame.

use bytemuck::{Pod, Zeroable};
use corelib::lighting::MAX_LIGHTS;
use corelib::program::{
    COLOR, DrawMode, Geometry, LIGHT_COUNT, MODEL_VIEW, NORMALS, PROJECTION, Program,
    RenderOptions, UniformValue, VIEW,
};
use corelib::{CoreError, CoreResult, Mat4};

/// Upper bound on draws per frame; sizes the per-object uniform buffer.
pub const MAX_DRAWS: usize = 64;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub position: [f32; 4],
    pub axis: [f32; 4],
    /// x = aperture (degrees), y = cutoff.
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ka: [f32; 4],
    pub kd: [f32; 4],
    pub ks: [f32; 4],
    /// x = shininess.
    pub params: [f32; 4],
}

/// Group 0: written once per frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
    pub light_count: u32,
    pub _pad: [u32; 3],
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            lights: [LightUniform::default(); MAX_LIGHTS],
            light_count: 0,
            _pad: [0; 3],
        }
    }
}

/// Group 1: one block per draw, bound at a dynamic offset.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model_view: [[f32; 4]; 4],
    /// Normal matrix widened to 4x4 to keep the block std140-aligned.
    pub normals: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub material: MaterialUniform,
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY.to_cols_array_2d(),
            normals: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
            material: MaterialUniform::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightField {
    Ambient,
    Diffuse,
    Specular,
    Position,
    Axis,
    Aperture,
    Cutoff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialField {
    Ka,
    Kd,
    Ks,
    Shininess,
}

/// A uniform name resolved to its place in the GPU layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformSlot {
    Projection,
    View,
    ModelView,
    Normals,
    Color,
    LightCount,
    Light(usize, LightField),
    Material(MaterialField),
}

impl UniformSlot {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            PROJECTION => return Some(Self::Projection),
            VIEW => return Some(Self::View),
            MODEL_VIEW => return Some(Self::ModelView),
            NORMALS => return Some(Self::Normals),
            COLOR => return Some(Self::Color),
            LIGHT_COUNT => return Some(Self::LightCount),
            _ => {}
        }

        if let Some(field) = name.strip_prefix("uMaterial.") {
            let field = match field {
                "Ka" => MaterialField::Ka,
                "Kd" => MaterialField::Kd,
                "Ks" => MaterialField::Ks,
                "shininess" => MaterialField::Shininess,
                _ => return None,
            };
            return Some(Self::Material(field));
        }

        let rest = name.strip_prefix("uLights[")?;
        let (index, field) = rest.split_once("].")?;
        let index: usize = index.parse().ok()?;
        if index >= MAX_LIGHTS {
            return None;
        }
        let field = match field {
            "ambient" => LightField::Ambient,
            "diffuse" => LightField::Diffuse,
            "specular" => LightField::Specular,
            "position" => LightField::Position,
            "axis" => LightField::Axis,
            "aperture" => LightField::Aperture,
            "cutoff" => LightField::Cutoff,
            _ => return None,
        };
        Some(Self::Light(index, field))
    }
}

/// One recorded draw: which mesh, which topology, which object block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub geometry: Geometry,
    pub mode: DrawMode,
    pub object: u32,
}

/// Collects one frame of uniform writes and draws for the GPU.
///
/// Bound values persist across frames like GL program state; only the
/// draw list is reset by `begin_frame`.
#[derive(Clone, Debug)]
pub struct FrameRecorder {
    frame: FrameUniform,
    bound: ObjectUniform,
    objects: Vec<ObjectUniform>,
    draws: Vec<DrawCall>,
    clear_color: [f32; 4],
    options: RenderOptions,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self {
            frame: FrameUniform::default(),
            bound: ObjectUniform::default(),
            objects: Vec::with_capacity(MAX_DRAWS),
            draws: Vec::with_capacity(MAX_DRAWS),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            options: RenderOptions::default(),
        }
    }
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_uniform(&self) -> &FrameUniform {
        &self.frame
    }

    pub fn objects(&self) -> &[ObjectUniform] {
        &self.objects
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }
}

fn mismatch(name: &str, expected: &'static str) -> CoreError {
    CoreError::UniformType {
        name: name.to_owned(),
        expected,
    }
}

fn vec3_to_4(v: corelib::Vec3) -> [f32; 4] {
    v.extend(0.0).to_array()
}

impl Program for FrameRecorder {
    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.clear_color = clear_color;
        self.objects.clear();
        self.draws.clear();
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> CoreResult<()> {
        let slot = UniformSlot::parse(name)
            .ok_or_else(|| CoreError::MissingUniform(name.to_owned()))?;

        match (slot, value) {
            (UniformSlot::Projection, UniformValue::Mat4(m)) => {
                self.frame.projection = m.to_cols_array_2d();
            }
            (UniformSlot::View, UniformValue::Mat4(m)) => self.frame.view = m.to_cols_array_2d(),
            (UniformSlot::ModelView, UniformValue::Mat4(m)) => {
                self.bound.model_view = m.to_cols_array_2d();
            }
            (UniformSlot::Normals, UniformValue::Mat3(m)) => {
                self.bound.normals = Mat4::from_mat3(m).to_cols_array_2d();
            }
            (UniformSlot::Color, UniformValue::Vec3(c)) => {
                self.bound.color = c.extend(1.0).to_array();
            }
            (UniformSlot::Color, UniformValue::Vec4(c)) => self.bound.color = c.to_array(),
            (UniformSlot::LightCount, UniformValue::Count(n)) => {
                self.frame.light_count = n.min(MAX_LIGHTS as u32);
            }
            (UniformSlot::LightCount, UniformValue::Float(n)) => {
                self.frame.light_count = (n.max(0.0) as u32).min(MAX_LIGHTS as u32);
            }
            (UniformSlot::Light(i, field), value) => {
                let light = &mut self.frame.lights[i];
                match (field, value) {
                    (LightField::Ambient, UniformValue::Vec3(v)) => light.ambient = vec3_to_4(v),
                    (LightField::Diffuse, UniformValue::Vec3(v)) => light.diffuse = vec3_to_4(v),
                    (LightField::Specular, UniformValue::Vec3(v)) => {
                        light.specular = vec3_to_4(v);
                    }
                    (LightField::Position, UniformValue::Vec4(v)) => light.position = v.to_array(),
                    (LightField::Axis, UniformValue::Vec3(v)) => light.axis = vec3_to_4(v),
                    (LightField::Aperture, UniformValue::Float(v)) => light.params[0] = v,
                    (LightField::Cutoff, UniformValue::Float(v)) => light.params[1] = v,
                    (LightField::Position, _) => return Err(mismatch(name, "vec4")),
                    (LightField::Aperture | LightField::Cutoff, _) => {
                        return Err(mismatch(name, "float"));
                    }
                    _ => return Err(mismatch(name, "vec3")),
                }
            }
            (UniformSlot::Material(field), value) => {
                let material = &mut self.bound.material;
                match (field, value) {
                    (MaterialField::Ka, UniformValue::Vec3(v)) => material.ka = vec3_to_4(v),
                    (MaterialField::Kd, UniformValue::Vec3(v)) => material.kd = vec3_to_4(v),
                    (MaterialField::Ks, UniformValue::Vec3(v)) => material.ks = vec3_to_4(v),
                    (MaterialField::Shininess, UniformValue::Float(v)) => material.params[0] = v,
                    (MaterialField::Shininess, _) => return Err(mismatch(name, "float")),
                    _ => return Err(mismatch(name, "vec3")),
                }
            }
            (UniformSlot::Projection | UniformSlot::View | UniformSlot::ModelView, _) => {
                return Err(mismatch(name, "mat4"));
            }
            (UniformSlot::Normals, _) => return Err(mismatch(name, "mat3")),
            (UniformSlot::Color, _) => return Err(mismatch(name, "vec3")),
            (UniformSlot::LightCount, _) => return Err(mismatch(name, "count")),
        }
        Ok(())
    }

    fn draw(&mut self, geometry: Geometry, mode: DrawMode) -> CoreResult<()> {
        if self.objects.len() >= MAX_DRAWS {
            return Err(CoreError::TooManyDraws(MAX_DRAWS));
        }
        let object = self.objects.len() as u32;
        self.objects.push(self.bound);
        self.draws.push(DrawCall {
            geometry,
            mode,
            object,
        });
        Ok(())
    }

    fn apply_options(&mut self, options: RenderOptions) {
        self.options = options;
    }
}

/// Colour as the `wgpu` clear value.
pub fn clear_value(color: [f32; 4]) -> wgpu::Color {
    let [r, g, b, a] = color.map(f64::from);
    wgpu::Color { r, g, b, a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::config::{SceneConfig, Variant};
    use corelib::frame::FrameDriver;
    use corelib::state::SceneState;
    use corelib::{Mat3, Vec3, Vec4};

    #[test]
    fn layouts_match_the_shader() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 96);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 64);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 432);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 208);
    }

    #[test]
    fn uniform_names_resolve() {
        assert_eq!(UniformSlot::parse("mModelView"), Some(UniformSlot::ModelView));
        assert_eq!(
            UniformSlot::parse("uLights[2].cutoff"),
            Some(UniformSlot::Light(2, LightField::Cutoff))
        );
        assert_eq!(
            UniformSlot::parse("uMaterial.shininess"),
            Some(UniformSlot::Material(MaterialField::Shininess))
        );
        assert_eq!(UniformSlot::parse("uLights[3].ambient"), None);
        assert_eq!(UniformSlot::parse("uLights[0].colour"), None);
        assert_eq!(UniformSlot::parse("mModel"), None);
    }

    #[test]
    fn unknown_uniform_is_an_error() {
        let mut rec = FrameRecorder::new();
        let err = rec
            .set_uniform("uShadowMap", UniformValue::Float(1.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingUniform(name) if name == "uShadowMap"));
    }

    #[test]
    fn wrong_value_kind_is_an_error() {
        let mut rec = FrameRecorder::new();
        let err = rec
            .set_uniform("mNormals", UniformValue::Mat4(Mat4::IDENTITY))
            .unwrap_err();
        assert!(matches!(err, CoreError::UniformType { expected: "mat3", .. }));
        assert!(rec
            .set_uniform("uLights[0].position", Vec3::ONE.into())
            .is_err());
    }

    #[test]
    fn draw_snapshots_bound_object_state() {
        let mut rec = FrameRecorder::new();
        rec.begin_frame([0.0; 4]);
        rec.set_uniform(COLOR, Vec3::X.into()).unwrap();
        rec.draw(Geometry::Cube, DrawMode::Filled).unwrap();
        rec.set_uniform(COLOR, Vec3::Y.into()).unwrap();
        rec.set_uniform(NORMALS, Mat3::from_diagonal(Vec3::splat(2.0)).into())
            .unwrap();
        rec.draw(Geometry::Torus, DrawMode::Wireframe).unwrap();

        assert_eq!(rec.objects()[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rec.objects()[1].color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(rec.objects()[1].normals[0], [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(rec.objects()[1].normals[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(rec.draws()[1].object, 1);
        assert_eq!(rec.draws()[1].mode, DrawMode::Wireframe);
    }

    #[test]
    fn draw_budget_is_enforced() {
        let mut rec = FrameRecorder::new();
        rec.begin_frame([0.0; 4]);
        for _ in 0..MAX_DRAWS {
            rec.draw(Geometry::Cube, DrawMode::Filled).unwrap();
        }
        assert!(matches!(
            rec.draw(Geometry::Cube, DrawMode::Filled),
            Err(CoreError::TooManyDraws(MAX_DRAWS))
        ));
        rec.begin_frame([0.0; 4]);
        assert!(rec.draws().is_empty());
    }

    #[test]
    fn every_variant_renders_through_the_gpu_layout() {
        for variant in [Variant::Basic, Variant::Lit, Variant::Orbit, Variant::Robot] {
            let state = SceneState::new(SceneConfig::for_variant(variant));
            let mut driver = FrameDriver::new(&state.config);
            let mut rec = FrameRecorder::new();
            driver.render(&state, &mut rec).unwrap();

            assert_eq!(rec.frame_uniform().light_count as usize, state.lights.count());
            assert_eq!(rec.clear_color(), state.clear_color);
            let expected = if state.config.robot_arm { 10 } else { 5 };
            assert_eq!(rec.draws().len(), expected, "{variant:?}");
            assert_eq!(
                Vec4::from_array(rec.frame_uniform().lights[0].position),
                state.lights.active()[0].position
            );
        }
    }

    #[test]
    fn clear_value_widens_channels() {
        let c = clear_value([0.3, 0.3, 0.3, 1.0]);
        assert!((c.r - 0.3).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }
}
