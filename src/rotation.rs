//! Construction of scaling and rotation transforms.

use crate::{
    angle::Angle,
    consts::DIRECTION_EPSILON,
    error::MatrixError,
    matrix::TransformMatrix,
    orientation::EulerAngles,
};
use glam::{Quat, Vec3};

/// One of the three coordinate axes, for which rotation matrices can be
/// written down directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalAxis {
    X,
    Y,
    Z,
}

impl CanonicalAxis {
    /// The unit vector along the axis.
    pub const fn unit_vector(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

impl TryFrom<Vec3> for CanonicalAxis {
    type Error = MatrixError;

    /// Accepts only the exact unit vectors along X, Y and Z.
    fn try_from(axis: Vec3) -> Result<Self, Self::Error> {
        if axis == Vec3::X {
            Ok(Self::X)
        } else if axis == Vec3::Y {
            Ok(Self::Y)
        } else if axis == Vec3::Z {
            Ok(Self::Z)
        } else {
            Err(MatrixError::NonCanonicalAxis { axis })
        }
    }
}

impl TransformMatrix {
    /// Creates a pure scaling transform.
    pub fn from_scale(scale: Vec3) -> Self {
        let mut m = Self::identity();
        m.create_by_scale(scale);
        m
    }

    /// Overwrites the matrix with a pure scaling transform, discarding any
    /// previous rotation and translation.
    pub fn create_by_scale(&mut self, scale: Vec3) -> &mut Self {
        self.set_identity();
        let d = self.as_array_mut();
        d[0] = scale.x;
        d[5] = scale.y;
        d[10] = scale.z;
        self
    }

    /// Appends a scaling, so that it is applied after the current transform.
    pub fn append_scale(&mut self, scale: Vec3) {
        for row in self.as_array_mut().chunks_exact_mut(4) {
            row[0] *= scale.x;
            row[1] *= scale.y;
            row[2] *= scale.z;
        }
    }

    /// Overwrites the matrix with the pure rotation given by the Euler
    /// angles.
    pub fn rotation(&mut self, angles: EulerAngles) -> &mut Self {
        self.make_transform(Vec3::ZERO, Vec3::ONE, angles.to_quaternion())
    }

    /// Appends a rotation by `angle` about one of the coordinate axes.
    pub fn create_by_rotation<A: Angle>(&mut self, angle: A, axis: CanonicalAxis) {
        let (sin, cos) = angle.sin_cos();
        let mut rotation = Self::identity();
        let d = rotation.as_array_mut();

        match axis {
            CanonicalAxis::X => {
                d[5] = cos;
                d[6] = sin;
                d[9] = -sin;
                d[10] = cos;
            }
            CanonicalAxis::Y => {
                d[0] = cos;
                d[2] = -sin;
                d[8] = sin;
                d[10] = cos;
            }
            CanonicalAxis::Z => {
                d[0] = cos;
                d[1] = sin;
                d[4] = -sin;
                d[5] = cos;
            }
        }

        self.append(&rotation);
    }

    /// Creates a rotation by `angle` about the given axis, counter-clockwise
    /// when looking from the tip of the axis towards the origin.
    ///
    /// The axis does not have to be normalized. A zero axis gives the
    /// identity.
    pub fn axis_rotation<A: Angle>(axis: Vec3, angle: A) -> Self {
        let Some(axis) = axis.try_normalize() else {
            return Self::identity();
        };

        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;

        Self::from_array([
            c + x * x * t,
            x * y * t + z * s,
            x * z * t - y * s,
            0.0,
            x * y * t - z * s,
            c + y * y * t,
            y * z * t + x * s,
            0.0,
            x * z * t + y * s,
            y * z * t - x * s,
            c + z * z * t,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Appends a rotation by `angle` about the given axis. See
    /// [`Self::axis_rotation`].
    pub fn append_rotation<A: Angle>(&mut self, angle: A, axis: Vec3) {
        self.append(&Self::axis_rotation(axis, angle));
    }

    /// Creates the smallest rotation taking the direction `from` to the
    /// direction `to`.
    pub fn from_to_rotation(from: Vec3, to: Vec3) -> Self {
        let mut m = Self::identity();
        m.set_from_to_rotation(from, to);
        m
    }

    /// Overwrites the matrix with the smallest rotation taking the direction
    /// `from` to the direction `to`. The inputs need not be normalized.
    ///
    /// For antiparallel directions there is no unique smallest rotation, and
    /// a half turn about an arbitrary axis perpendicular to `from` is used.
    /// If either direction has zero length the result is the identity.
    pub fn set_from_to_rotation(&mut self, from: Vec3, to: Vec3) -> &mut Self {
        self.set_identity();

        let (Some(from), Some(to)) = (from.try_normalize(), to.try_normalize()) else {
            log::debug!("Using identity for rotation between {from} and {to}");
            return self;
        };

        let e = from.dot(to);

        if e > 1.0 - DIRECTION_EPSILON {
            return self;
        }

        let d = self.as_array_mut();

        if e < -1.0 + DIRECTION_EPSILON {
            log::debug!("Directions {from} and {to} are antiparallel, using a half turn");

            // 2 u u^T - I for a unit axis u perpendicular to `from`
            let u = from.any_orthonormal_vector();
            let u = [u.x, u.y, u.z];
            for (i, &ui) in u.iter().enumerate() {
                for (j, &uj) in u.iter().enumerate() {
                    let identity = if i == j { 1.0 } else { 0.0 };
                    d[4 * i + j] = 2.0 * ui * uj - identity;
                }
            }
            return self;
        }

        let v = from.cross(to);
        let h = (1.0 - e) / v.dot(v);
        let (hvx, hvz) = (h * v.x, h * v.z);
        let (hvxy, hvxz, hvyz) = (hvx * v.y, hvx * v.z, hvz * v.y);

        d[0] = e + hvx * v.x;
        d[1] = hvxy + v.z;
        d[2] = hvxz - v.y;
        d[4] = hvxy - v.z;
        d[5] = e + h * v.y * v.y;
        d[6] = hvyz + v.x;
        d[8] = hvxz + v.y;
        d[9] = hvyz - v.x;
        d[10] = e + hvz * v.z;

        self
    }

    /// Creates the rotation represented by the given unit quaternion.
    pub fn from_quaternion(rotation: Quat) -> Self {
        Self::from_glam(glam::Mat4::from_quat(rotation))
    }
}
