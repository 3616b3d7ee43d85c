use crate::{Mat4, Vec3, vec3};

/// Distance from the focus point used by the keyboard view presets.
pub const PRESET_DISTANCE: f32 = 20.0;

/// Degrees of orbit per canvas height of mouse drag.
pub const ORBIT_DEGREES_PER_HEIGHT: f32 = 180.0;

/// Bounds on the zoomed field of view, in degrees.
pub const MIN_FOVY: f32 = 1.0;
pub const MAX_FOVY: f32 = 179.0;

/// Perspective camera parameters as edited in the panel (right-handed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            near: 0.1,
            far: 40.0,
            eye: vec3(0.0, 0.0, 1.0),
            at: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Projection for the current parameters. `zoom` scales the field of
    /// view; the result is clamped to a usable range.
    pub fn projection(&self, aspect: f32, zoom: f32) -> Mat4 {
        let fovy = (self.fovy * zoom).clamp(MIN_FOVY, MAX_FOVY);
        let near = self.near.max(1e-3);
        let far = self.far.max(near + 1e-3);
        Mat4::perspective_rh(fovy.to_radians(), aspect.max(1e-6), near, far)
    }

    /// Limit a zoom factor so `fovy * zoom` stays within the fovy bounds.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        let fovy = self.fovy.max(MIN_FOVY);
        zoom.clamp(MIN_FOVY / fovy, MAX_FOVY / fovy)
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    /// View combined with an orbit rotation about `at`.
    pub fn orbit_view(&self, orbit: Orbit) -> Mat4 {
        self.view()
            * Mat4::from_translation(self.at)
            * Mat4::from_rotation_x(orbit.pitch.to_radians())
            * Mat4::from_rotation_y(orbit.yaw.to_radians())
            * Mat4::from_translation(-self.at)
    }

    /// Point the camera at `focus` from one of the fixed presets.
    pub fn apply_preset(&mut self, preset: ViewPreset, focus: Vec3) {
        let (dir, up) = preset.direction_and_up();
        self.at = focus;
        self.eye = focus + dir.normalize() * PRESET_DISTANCE;
        self.up = up;
    }
}

/// Keyboard view presets `1`..`4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPreset {
    Front,
    Top,
    Right,
    Isometric,
}

impl ViewPreset {
    fn direction_and_up(self) -> (Vec3, Vec3) {
        match self {
            Self::Front => (Vec3::Z, Vec3::Y),
            Self::Top => (Vec3::Y, vec3(0.0, 0.0, -1.0)),
            Self::Right => (Vec3::X, Vec3::Y),
            Self::Isometric => (vec3(2.0, 1.0, 1.0), Vec3::Y),
        }
    }
}

/// Accumulated mouse-drag rotation, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orbit {
    pub pitch: f32,
    pub yaw: f32,
}

impl Orbit {
    /// Accumulate a drag of `(dx, dy)` pixels on a canvas `height` pixels tall.
    pub fn drag(&mut self, dx: f32, dy: f32, height: f32) {
        let h = height.max(1.0);
        self.yaw += dx / h * ORBIT_DEGREES_PER_HEIGHT;
        self.pitch += dy / h * ORBIT_DEGREES_PER_HEIGHT;
    }
}
