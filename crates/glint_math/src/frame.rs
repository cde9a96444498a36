//! Orthonormal shading frames.

use crate::{Mat3, Vec3};

/// Lengths below this are treated as zero when picking a tangent.
const TANGENT_EPSILON: f32 = 1e-12;

/// An orthonormal shading frame whose +z axis is a surface normal.
///
/// The tangent is chosen deterministically from the normal's components: of
/// the three perpendicular candidates `(0, -n.z, n.y)`, `(-n.z, 0, n.x)` and
/// `(-n.y, n.x, 0)` the first non-zero one becomes the x axis, and
/// `y = n × x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    frame: Mat3,
}

impl Frame {
    /// Build a frame around `n`. `n` is expected to be unit length.
    ///
    /// Returns `None` for a zero-length normal, where no basis exists.
    pub fn from_normal(n: Vec3) -> Option<Self> {
        let candidates = [
            Vec3::new(0.0, -n.z, n.y),
            Vec3::new(-n.z, 0.0, n.x),
            Vec3::new(-n.y, n.x, 0.0),
        ];
        let tangent = candidates
            .into_iter()
            .find(|c| c.length_squared() > TANGENT_EPSILON)?
            .normalize();
        let bitangent = n.cross(tangent);

        Some(Self {
            frame: Mat3::from_cols(tangent, bitangent, n),
        })
    }

    /// Express a world-space vector in this frame.
    #[inline]
    pub fn to_local(&self, global: Vec3) -> Vec3 {
        self.frame.transpose() * global
    }

    /// Bring a frame-local vector back to world space.
    #[inline]
    pub fn from_local(&self, local: Vec3) -> Vec3 {
        self.frame * local
    }

    pub fn x(&self) -> Vec3 {
        self.frame.x_axis
    }

    pub fn y(&self) -> Vec3 {
        self.frame.y_axis
    }

    pub fn z(&self) -> Vec3 {
        self.frame.z_axis
    }
}
