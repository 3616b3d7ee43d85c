//! Scene configuration: one renderer parameterised by light count,
//! material set, camera control and whether the robot arm is present.

use crate::error::{CoreError, CoreResult};
use crate::lighting::{Intensities, Light, Lights, MAX_LIGHTS};
use crate::{Vec3, Vec4, vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraControl {
    /// Keys `1`..`4` jump between fixed views.
    #[default]
    Presets,
    /// Mouse drag orbits around the look-at point; presets still work.
    Orbit,
}

impl CameraControl {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "presets" | "keys" | "keyboard" => Some(Self::Presets),
            "orbit" | "mouse" => Some(Self::Orbit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialSet {
    /// Flat colours; reflectance is neutral.
    Flat,
    /// Every object uses the panel material.
    #[default]
    Shared,
    /// Each static object has its own material; the bunny uses the panel's.
    PerObject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Basic,
    Lit,
    Orbit,
    Robot,
}

impl Variant {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "lit" => Some(Self::Lit),
            "orbit" => Some(Self::Orbit),
            "robot" | "arm" => Some(Self::Robot),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub light_count: usize,
    pub materials: MaterialSet,
    pub camera_control: CameraControl,
    pub robot_arm: bool,
    /// Translation applied to every static object.
    pub world_offset: Vec3,
    /// Light slots before the count is applied.
    pub lights: [Light; MAX_LIGHTS],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Robot)
    }
}

impl SceneConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self {
            light_count: MAX_LIGHTS,
            materials: MaterialSet::Shared,
            camera_control: CameraControl::Presets,
            robot_arm: false,
            world_offset: vec3(0.0, -0.5, -20.0),
            lights: [Light::default(); MAX_LIGHTS],
        };
        match variant {
            Variant::Basic => Self {
                light_count: 1,
                materials: MaterialSet::Flat,
                ..base
            },
            Variant::Lit => Self {
                materials: MaterialSet::PerObject,
                lights: colored_lights(),
                ..base
            },
            Variant::Orbit => Self {
                materials: MaterialSet::PerObject,
                camera_control: CameraControl::Orbit,
                lights: colored_lights(),
                ..base
            },
            Variant::Robot => Self {
                robot_arm: true,
                ..base
            },
        }
    }

    pub fn with_light_count(mut self, count: usize) -> CoreResult<Self> {
        if !(1..=MAX_LIGHTS).contains(&count) {
            return Err(CoreError::InvalidConfig(format!(
                "light count must be 1..={MAX_LIGHTS}, got {count}"
            )));
        }
        self.light_count = count;
        Ok(self)
    }

    pub fn with_camera_control(mut self, control: CameraControl) -> Self {
        self.camera_control = control;
        self
    }

    /// Whether any node draws with the panel-edited material.
    pub fn uses_panel_material(&self) -> bool {
        self.materials != MaterialSet::Flat || self.robot_arm
    }

    pub fn initial_lights(&self) -> Lights {
        Lights::new(self.lights, self.light_count)
    }
}

/// A warm key light, a cool spot from the side and an omnidirectional fill.
fn colored_lights() -> [Light; MAX_LIGHTS] {
    let key = Light {
        intensities: Intensities {
            ambient: vec3(60.0, 50.0, 40.0),
            diffuse: vec3(200.0, 180.0, 150.0),
            specular: Vec3::splat(220.0),
        },
        ..Light::default()
    };
    let spot = Light {
        position: Vec4::new(8.0, 6.0, -20.0, 1.0),
        intensities: Intensities {
            ambient: Vec3::ZERO,
            diffuse: vec3(80.0, 120.0, 220.0),
            specular: vec3(120.0, 160.0, 255.0),
        },
        axis: vec3(-1.0, -0.75, 0.0),
        aperture: 30.0,
        cutoff: 4.0,
    };
    let fill = Light::omnidirectional(
        vec3(-6.0, 4.0, -14.0),
        Intensities {
            ambient: Vec3::splat(10.0),
            diffuse: Vec3::splat(70.0),
            specular: Vec3::splat(40.0),
        },
    );
    [key, spot, fill]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_parse_case_insensitively() {
        assert_eq!(Variant::parse("ROBOT"), Some(Variant::Robot));
        assert_eq!(Variant::parse("arm"), Some(Variant::Robot));
        assert_eq!(Variant::parse("lit"), Some(Variant::Lit));
        assert_eq!(Variant::parse("nope"), None);
        assert_eq!(CameraControl::parse("Orbit"), Some(CameraControl::Orbit));
    }

    #[test]
    fn light_count_outside_range_is_rejected() {
        let cfg = SceneConfig::default();
        assert!(cfg.with_light_count(0).is_err());
        assert!(cfg.with_light_count(4).is_err());
        assert_eq!(cfg.with_light_count(2).unwrap().initial_lights().count(), 2);
    }

    #[test]
    fn lit_variant_keeps_one_light_without_cutoff() {
        let cfg = SceneConfig::for_variant(Variant::Lit);
        let lights = cfg.initial_lights();
        assert_eq!(lights.count(), 3);
        assert_eq!(lights.active().iter().filter(|l| !l.has_cutoff()).count(), 1);
        // The plain default keeps cutoff 10 on every slot.
        let plain = SceneConfig::for_variant(Variant::Robot).initial_lights();
        assert!(plain.active().iter().all(|l| l.cutoff == 10.0));
    }

    #[test]
    fn only_robot_variant_has_the_arm() {
        assert!(SceneConfig::for_variant(Variant::Robot).robot_arm);
        assert!(!SceneConfig::for_variant(Variant::Orbit).robot_arm);
        assert_eq!(
            SceneConfig::for_variant(Variant::Orbit).camera_control,
            CameraControl::Orbit
        );
    }

    #[test]
    fn flat_variant_has_no_panel_material() {
        assert!(!SceneConfig::for_variant(Variant::Basic).uses_panel_material());
        assert!(SceneConfig::for_variant(Variant::Lit).uses_panel_material());
        assert!(SceneConfig::for_variant(Variant::Robot).uses_panel_material());
        let flat_with_arm = SceneConfig {
            robot_arm: true,
            ..SceneConfig::for_variant(Variant::Basic)
        };
        assert!(flat_with_arm.uses_panel_material());
    }
}
