//! Recording `Program` used by the unit tests.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::program::{DrawMode, Geometry, MODEL_VIEW, Program, RenderOptions, UniformValue};
use crate::{Mat4, Vec3};

#[derive(Clone, Debug)]
pub struct DrawRecord {
    pub geometry: Geometry,
    pub mode: DrawMode,
    pub uniforms: HashMap<String, UniformValue>,
}

impl DrawRecord {
    pub fn model_view(&self) -> Mat4 {
        match self.uniforms.get(MODEL_VIEW) {
            Some(UniformValue::Mat4(m)) => *m,
            other => panic!("draw without mModelView: {other:?}"),
        }
    }

    /// Where the local origin lands after the model-view transform.
    pub fn origin(&self) -> Vec3 {
        self.model_view().transform_point3(Vec3::ZERO)
    }
}

#[derive(Default)]
pub struct RecordingProgram {
    bound: HashMap<String, UniformValue>,
    missing: Vec<String>,
    pub writes: Vec<(String, UniformValue)>,
    pub draws: Vec<DrawRecord>,
    pub frames: usize,
    pub clear_color: Option<[f32; 4]>,
    pub options: Option<RenderOptions>,
}

impl RecordingProgram {
    /// Pretend the program has no uniform called `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.missing.push(name.to_string());
        self
    }

    pub fn value(&self, name: &str) -> Option<UniformValue> {
        self.bound.get(name).copied()
    }

    pub fn writes_matching(&self, prefix: &str) -> usize {
        self.writes.iter().filter(|(n, _)| n.starts_with(prefix)).count()
    }

    /// Distinct `uLights[i]` indices written since the last `begin_frame`.
    pub fn light_slots_written(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .writes
            .iter()
            .filter_map(|(name, _)| {
                let rest = name.strip_prefix("uLights[")?;
                let (index, _) = rest.split_once(']')?;
                index.parse().ok()
            })
            .collect();
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    pub fn draws_of(&self, geometry: Geometry) -> Vec<&DrawRecord> {
        self.draws.iter().filter(|d| d.geometry == geometry).collect()
    }
}

impl Program for RecordingProgram {
    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.frames += 1;
        self.clear_color = Some(clear_color);
        self.writes.clear();
        self.draws.clear();
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> CoreResult<()> {
        if self.missing.iter().any(|m| m == name) {
            return Err(CoreError::MissingUniform(name.to_string()));
        }
        self.bound.insert(name.to_string(), value);
        self.writes.push((name.to_string(), value));
        Ok(())
    }

    fn draw(&mut self, geometry: Geometry, mode: DrawMode) -> CoreResult<()> {
        self.draws.push(DrawRecord {
            geometry,
            mode,
            uniforms: self.bound.clone(),
        });
        Ok(())
    }

    fn apply_options(&mut self, options: RenderOptions) {
        self.options = Some(options);
    }
}
