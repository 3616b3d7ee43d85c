//! Robot arm: upper arm -> lower arm -> claw, driven by four joint values.
//!
//! The walk is depth-first. Each joint rotates its frame *before* the
//! segment is drawn so the rotation pivots on the joint, not on the
//! segment's own centre.

use crate::error::CoreResult;
use crate::lighting::Material;
use crate::program::{DrawMode, Geometry, Program};
use crate::scene::Drawable;
use crate::stack::MatrixStack;
use crate::transform::LocalOp;
use crate::{Vec3, vec3};

pub const CLAW_SPREAD_MAX: f32 = 0.050;
pub const CLAW_SPREAD_STEP: f32 = 0.005;
pub const ELBOW_LIMIT: f32 = 120.0;
pub const ANGLE_STEP: f32 = 1.0;

pub const UPPER_ARM_LENGTH: f32 = 0.5;
pub const UPPER_ARM_RADIUS: f32 = 0.05;
pub const LOWER_ARM_LENGTH: f32 = 0.4;
pub const LOWER_ARM_WIDTH: f32 = 0.06;
pub const FIST_SIZE: Vec3 = vec3(0.12, 0.04, 0.12);
pub const MAXILLA_SIZE: Vec3 = vec3(0.02, 0.1, 0.06);

const UPPER_ARM_COLOR: Vec3 = vec3(0.35, 0.38, 0.45);
const LOWER_ARM_COLOR: Vec3 = vec3(0.55, 0.58, 0.65);
const CLAW_COLOR: Vec3 = vec3(0.90, 0.75, 0.10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Joint {
    /// `ag`: jaw half-opening, clamped to `[0, CLAW_SPREAD_MAX]`.
    ClawSpread,
    /// `rg`: wrist yaw in degrees, unclamped.
    WristYaw,
    /// `rb`: shoulder yaw in degrees, unclamped.
    ShoulderYaw,
    /// `rc`: elbow pitch in degrees, clamped to `±ELBOW_LIMIT`.
    ElbowPitch,
}

/// Joint values. Persist across frames; written only by input commands.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointAngles {
    pub claw_spread: f32,
    pub wrist_yaw: f32,
    pub shoulder_yaw: f32,
    pub elbow_pitch: f32,
}

impl JointAngles {
    /// Move one joint a single input step up or down.
    pub fn step(&mut self, joint: Joint, increase: bool) {
        let sign = if increase { 1.0 } else { -1.0 };
        match joint {
            Joint::ClawSpread => {
                self.claw_spread =
                    (self.claw_spread + sign * CLAW_SPREAD_STEP).clamp(0.0, CLAW_SPREAD_MAX);
            }
            Joint::WristYaw => self.wrist_yaw += sign * ANGLE_STEP,
            Joint::ShoulderYaw => self.shoulder_yaw += sign * ANGLE_STEP,
            Joint::ElbowPitch => {
                self.elbow_pitch =
                    (self.elbow_pitch + sign * ANGLE_STEP).clamp(-ELBOW_LIMIT, ELBOW_LIMIT);
            }
        }
    }

    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::ClawSpread => self.claw_spread,
            Joint::WristYaw => self.wrist_yaw,
            Joint::ShoulderYaw => self.shoulder_yaw,
            Joint::ElbowPitch => self.elbow_pitch,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotArm {
    pub angles: JointAngles,
    /// Foot of the arm in the parent frame.
    pub base: Vec3,
    /// Uniform scale from arm units to scene units.
    pub scale: f32,
}

impl Default for RobotArm {
    fn default() -> Self {
        Self {
            angles: JointAngles::default(),
            base: Vec3::ZERO,
            scale: 4.0,
        }
    }
}

impl RobotArm {
    pub fn new(base: Vec3) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn draw(
        &self,
        stack: &mut MatrixStack,
        program: &mut impl Program,
        material: &Material,
        mode: DrawMode,
    ) -> CoreResult<()> {
        let mut arm = stack.scope();
        arm.translate(self.base);
        arm.scale(Vec3::splat(self.scale));
        arm.rotate_y(self.angles.shoulder_yaw);

        Drawable::new("upper arm", Geometry::Cylinder, UPPER_ARM_COLOR)
            .with(LocalOp::translate(0.0, UPPER_ARM_LENGTH / 2.0, 0.0))
            .with(LocalOp::scale(
                2.0 * UPPER_ARM_RADIUS,
                UPPER_ARM_LENGTH,
                2.0 * UPPER_ARM_RADIUS,
            ))
            .draw(&mut arm, program, material, mode)?;

        arm.translate(vec3(0.0, UPPER_ARM_LENGTH, 0.0));
        self.draw_lower_arm_and_claw(&mut arm, program, material, mode)
    }

    fn draw_lower_arm_and_claw(
        &self,
        stack: &mut MatrixStack,
        program: &mut impl Program,
        material: &Material,
        mode: DrawMode,
    ) -> CoreResult<()> {
        let mut elbow = stack.scope();
        elbow.rotate_z(self.angles.elbow_pitch);

        Drawable::new("lower arm", Geometry::Cube, LOWER_ARM_COLOR)
            .with(LocalOp::translate(0.0, LOWER_ARM_LENGTH / 2.0, 0.0))
            .with(LocalOp::scale(LOWER_ARM_WIDTH, LOWER_ARM_LENGTH, LOWER_ARM_WIDTH))
            .draw(&mut elbow, program, material, mode)?;

        elbow.translate(vec3(0.0, LOWER_ARM_LENGTH, 0.0));
        self.draw_claw(&mut elbow, program, material, mode)
    }

    fn draw_claw(
        &self,
        stack: &mut MatrixStack,
        program: &mut impl Program,
        material: &Material,
        mode: DrawMode,
    ) -> CoreResult<()> {
        let mut wrist = stack.scope();
        wrist.rotate_y(self.angles.wrist_yaw);

        Drawable::new("fist", Geometry::Cube, CLAW_COLOR)
            .with(LocalOp::translate(0.0, FIST_SIZE.y / 2.0, 0.0))
            .with(LocalOp::Scale(FIST_SIZE))
            .draw(&mut wrist, program, material, mode)?;

        let jaw_y = FIST_SIZE.y + MAXILLA_SIZE.y / 2.0;
        let jaw_x = MAXILLA_SIZE.x / 2.0 + self.angles.claw_spread;
        for x in [jaw_x, -jaw_x] {
            Drawable::new("maxilla", Geometry::Cube, CLAW_COLOR)
                .with(LocalOp::translate(x, jaw_y, 0.0))
                .with(LocalOp::Scale(MAXILLA_SIZE))
                .draw(&mut wrist, program, material, mode)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mat4;
    use crate::testing::RecordingProgram;

    fn render(arm: &RobotArm) -> RecordingProgram {
        let mut stack = MatrixStack::new();
        stack.load(Mat4::IDENTITY);
        let mut program = RecordingProgram::default();
        arm.draw(&mut stack, &mut program, &Material::default(), DrawMode::Filled)
            .unwrap();
        assert_eq!(stack.depth(), 1);
        program
    }

    #[test]
    fn elbow_stays_within_limits() {
        let mut angles = JointAngles::default();
        for _ in 0..500 {
            angles.step(Joint::ElbowPitch, true);
        }
        assert_eq!(angles.elbow_pitch, ELBOW_LIMIT);
        for _ in 0..1000 {
            angles.step(Joint::ElbowPitch, false);
            assert!(angles.elbow_pitch >= -ELBOW_LIMIT);
        }
        assert_eq!(angles.elbow_pitch, -ELBOW_LIMIT);
    }

    #[test]
    fn claw_spread_stays_within_limits() {
        let mut angles = JointAngles::default();
        angles.step(Joint::ClawSpread, false);
        assert_eq!(angles.claw_spread, 0.0);
        for _ in 0..50 {
            angles.step(Joint::ClawSpread, true);
            assert!(angles.claw_spread <= CLAW_SPREAD_MAX);
        }
        assert_eq!(angles.claw_spread, CLAW_SPREAD_MAX);
    }

    #[test]
    fn yaw_joints_are_unclamped() {
        let mut angles = JointAngles::default();
        for _ in 0..400 {
            angles.step(Joint::ShoulderYaw, true);
            angles.step(Joint::WristYaw, false);
        }
        assert_eq!(angles.get(Joint::ShoulderYaw), 400.0);
        assert_eq!(angles.get(Joint::WristYaw), -400.0);
    }

    #[test]
    fn draws_upper_lower_fist_and_two_maxillas() {
        let program = render(&RobotArm::default());
        let kinds: Vec<Geometry> = program.draws.iter().map(|d| d.geometry).collect();
        assert_eq!(
            kinds,
            vec![
                Geometry::Cylinder,
                Geometry::Cube,
                Geometry::Cube,
                Geometry::Cube,
                Geometry::Cube
            ]
        );
    }

    #[test]
    fn elbow_rotates_about_the_joint() {
        let mut arm = RobotArm::new(vec3(1.0, 0.0, 0.0));
        arm.angles.elbow_pitch = 90.0;
        let program = render(&arm);
        let lower = &program.draws[1];
        // +Y of the lower arm frame maps to -X after a 90 degree pitch.
        let expected = vec3(
            1.0 - arm.scale * LOWER_ARM_LENGTH / 2.0,
            arm.scale * UPPER_ARM_LENGTH,
            0.0,
        );
        assert!((lower.origin() - expected).length() < 1e-4);
    }

    #[test]
    fn shoulder_yaw_carries_the_whole_chain() {
        let mut arm = RobotArm::default();
        arm.angles.elbow_pitch = 90.0;
        arm.angles.shoulder_yaw = 90.0;
        let program = render(&arm);
        // Elbow offset points along -X, yawed 90 degrees about Y: -X -> +Z.
        let lower = program.draws[1].origin();
        assert!(lower.x.abs() < 1e-4);
        assert!((lower.z - arm.scale * LOWER_ARM_LENGTH / 2.0).abs() < 1e-4);
    }

    #[test]
    fn maxillas_mirror_around_the_wrist() {
        let mut arm = RobotArm::default();
        arm.angles.claw_spread = CLAW_SPREAD_MAX;
        let program = render(&arm);
        let right = program.draws[3].origin();
        let left = program.draws[4].origin();
        assert!((right.x + left.x).abs() < 1e-5);
        let gap = (right.x - left.x) / arm.scale;
        assert!((gap - (MAXILLA_SIZE.x + 2.0 * CLAW_SPREAD_MAX)).abs() < 1e-5);
    }

    #[test]
    fn wrist_yaw_does_not_move_the_fist_centre() {
        let mut arm = RobotArm::default();
        let before = render(&arm).draws[2].origin();
        arm.angles.wrist_yaw = 45.0;
        let after = render(&arm).draws[2].origin();
        assert!((before - after).length() < 1e-5);
    }
}
