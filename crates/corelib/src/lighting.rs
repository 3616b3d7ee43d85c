//! Lights and surface materials, and their uniform upload.
//!
//! Intensities and reflectance coefficients are RGB triples on a 0..255
//! scale, the way the parameter panel edits them.

use crate::error::CoreResult;
use crate::program::{LIGHT_COUNT, Program, UniformValue, light_uniform, material_uniform};
use crate::{Vec3, Vec4, vec3};

pub const MAX_LIGHTS: usize = 3;

/// Cutoff sentinel: no cone, the light shines in every direction.
pub const NO_CUTOFF: f32 = -1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intensities {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    /// `w = 0` directional, `w = 1` positional.
    pub position: Vec4,
    pub intensities: Intensities,
    /// Cone axis.
    pub axis: Vec3,
    /// Cone half-angle in degrees.
    pub aperture: f32,
    /// Falloff exponent, or [`NO_CUTOFF`].
    pub cutoff: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 10.0, 0.0),
            intensities: Intensities {
                ambient: Vec3::splat(50.0),
                diffuse: Vec3::splat(60.0),
                specular: Vec3::splat(200.0),
            },
            axis: vec3(0.0, 0.0, -1.0),
            aperture: 10.0,
            cutoff: 10.0,
        }
    }
}

impl Light {
    /// Positional light without a cone.
    pub fn omnidirectional(position: Vec3, intensities: Intensities) -> Self {
        Self {
            position: position.extend(1.0),
            intensities,
            cutoff: NO_CUTOFF,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    #[inline]
    pub fn has_cutoff(&self) -> bool {
        self.cutoff >= 0.0
    }

    pub fn upload(&self, index: usize, program: &mut impl Program) -> CoreResult<()> {
        program.set_uniform(&light_uniform(index, "ambient"), self.intensities.ambient.into())?;
        program.set_uniform(&light_uniform(index, "diffuse"), self.intensities.diffuse.into())?;
        program.set_uniform(&light_uniform(index, "specular"), self.intensities.specular.into())?;
        program.set_uniform(&light_uniform(index, "position"), self.position.into())?;
        program.set_uniform(&light_uniform(index, "axis"), self.axis.into())?;
        program.set_uniform(&light_uniform(index, "aperture"), self.aperture.into())?;
        program.set_uniform(&light_uniform(index, "cutoff"), self.cutoff.into())
    }
}

/// Fixed array of light slots; the first `count` are active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lights {
    slots: [Light; MAX_LIGHTS],
    count: usize,
}

impl Default for Lights {
    fn default() -> Self {
        Self::new([Light::default(); MAX_LIGHTS], MAX_LIGHTS)
    }
}

impl Lights {
    /// `count` is clamped to `1..=MAX_LIGHTS`.
    pub fn new(slots: [Light; MAX_LIGHTS], count: usize) -> Self {
        Self {
            slots,
            count: count.clamp(1, MAX_LIGHTS),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn active(&self) -> &[Light] {
        &self.slots[..self.count]
    }

    pub fn get(&self, index: usize) -> Option<&Light> {
        self.active().get(index)
    }

    /// Overwrite an active slot. Returns `false` for an inactive index.
    pub fn set(&mut self, index: usize, light: Light) -> bool {
        match self.slots[..self.count].get_mut(index) {
            Some(slot) => {
                *slot = light;
                true
            }
            None => false,
        }
    }

    /// `uNLights` plus one group of `uLights[i].*` writes per active slot.
    pub fn upload(&self, program: &mut impl Program) -> CoreResult<()> {
        program.set_uniform(LIGHT_COUNT, UniformValue::Count(self.count as u32))?;
        for (i, light) in self.active().iter().enumerate() {
            light.upload(i, program)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: Vec3::splat(150.0),
            kd: Vec3::splat(150.0),
            ks: Vec3::splat(200.0),
            shininess: 100.0,
        }
    }
}

impl Material {
    /// Lets the flat colour through unshaded by specular highlights.
    pub fn flat() -> Self {
        Self {
            ka: Vec3::splat(255.0),
            kd: Vec3::splat(255.0),
            ks: Vec3::ZERO,
            shininess: 1.0,
        }
    }

    pub fn upload(&self, program: &mut impl Program) -> CoreResult<()> {
        program.set_uniform(&material_uniform("Ka"), self.ka.into())?;
        program.set_uniform(&material_uniform("Kd"), self.kd.into())?;
        program.set_uniform(&material_uniform("Ks"), self.ks.into())?;
        program.set_uniform(&material_uniform("shininess"), self.shininess.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingProgram;

    fn distinct_lights() -> [Light; MAX_LIGHTS] {
        let mut slots = [Light::default(); MAX_LIGHTS];
        for (i, slot) in slots.iter_mut().enumerate() {
            let base = 10.0 * (i as f32 + 1.0);
            slot.intensities = Intensities {
                ambient: Vec3::splat(base),
                diffuse: Vec3::splat(base + 1.0),
                specular: Vec3::splat(base + 2.0),
            };
        }
        slots
    }

    #[test]
    fn three_lights_write_three_separate_slots() {
        let lights = Lights::new(distinct_lights(), 3);
        let mut program = RecordingProgram::default();
        lights.upload(&mut program).unwrap();

        assert_eq!(program.value(LIGHT_COUNT), Some(UniformValue::Count(3)));
        for i in 0..3 {
            let base = 10.0 * (i as f32 + 1.0);
            assert_eq!(
                program.value(&light_uniform(i, "ambient")),
                Some(UniformValue::Vec3(Vec3::splat(base)))
            );
            assert_eq!(
                program.value(&light_uniform(i, "diffuse")),
                Some(UniformValue::Vec3(Vec3::splat(base + 1.0)))
            );
            assert_eq!(
                program.value(&light_uniform(i, "specular")),
                Some(UniformValue::Vec3(Vec3::splat(base + 2.0)))
            );
        }
        assert_eq!(program.light_slots_written(), vec![0, 1, 2]);
        // Seven fields per slot, each written exactly once.
        assert_eq!(program.writes_matching("uLights["), 21);
    }

    #[test]
    fn inactive_slots_are_not_uploaded() {
        let lights = Lights::new(distinct_lights(), 1);
        let mut program = RecordingProgram::default();
        lights.upload(&mut program).unwrap();
        assert_eq!(program.light_slots_written(), vec![0]);
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(Lights::new(distinct_lights(), 0).count(), 1);
        assert_eq!(Lights::new(distinct_lights(), 7).count(), MAX_LIGHTS);
    }

    #[test]
    fn set_ignores_inactive_slot() {
        let mut lights = Lights::new(distinct_lights(), 2);
        assert!(lights.set(1, Light::default()));
        assert!(!lights.set(2, Light::default()));
    }

    #[test]
    fn omnidirectional_light_uses_sentinel() {
        let light = Light::omnidirectional(vec3(1.0, 2.0, 3.0), Light::default().intensities);
        assert!(!light.has_cutoff());
        assert!(!light.is_directional());
        assert!(Light::default().has_cutoff());
        assert!(Light::default().is_directional());
    }

    #[test]
    fn missing_material_uniform_is_an_error() {
        let mut program = RecordingProgram::default().without("uMaterial.Ks");
        let err = Material::default().upload(&mut program).unwrap_err();
        assert!(matches!(err, crate::CoreError::MissingUniform(name) if name == "uMaterial.Ks"));
    }
}
