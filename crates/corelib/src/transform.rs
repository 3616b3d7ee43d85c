use crate::{Mat3, Mat4, Vec3};

/// One step of a node's local placement. Rotations are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocalOp {
    Translate(Vec3),
    Scale(Vec3),
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
}

impl LocalOp {
    #[inline]
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::Translate(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::Scale(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn uniform_scale(s: f32) -> Self {
        Self::Scale(Vec3::splat(s))
    }

    #[inline]
    pub fn matrix(self) -> Mat4 {
        match self {
            Self::Translate(t) => Mat4::from_translation(t),
            Self::Scale(s) => Mat4::from_scale(s),
            Self::RotateX(deg) => Mat4::from_rotation_x(deg.to_radians()),
            Self::RotateY(deg) => Mat4::from_rotation_y(deg.to_radians()),
            Self::RotateZ(deg) => Mat4::from_rotation_z(deg.to_radians()),
        }
    }
}

/// Inverse-transpose of the upper 3x3 block of a model-view matrix.
#[inline]
pub fn normal_matrix(model_view: Mat4) -> Mat3 {
    Mat3::from_mat4(model_view).inverse().transpose()
}
