//! Representations of the rotational part of a transform.

use crate::angle::{Angle, Degrees, Radians};
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Quat, Vec3};

/// Rotation angles in degrees about the X, Y and Z axes.
///
/// The rotations are combined as `q = qx * qy * qz`, so when applied to a
/// vector the Z rotation acts first and the X rotation last. Converting a
/// quaternion back to Euler angles recovers the same angles as long as the Y
/// angle lies strictly between -90 and 90 degrees.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct EulerAngles {
    pub x: Degrees,
    pub y: Degrees,
    pub z: Degrees,
}

/// The rotation of a decomposed transform, in one of three representations.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    EulerAngles(EulerAngles),
    /// Rotation by `angle` about the unit vector `axis`, counter-clockwise
    /// when looking from the tip of the axis.
    AxisAngle { axis: Vec3, angle: Degrees },
    /// A unit quaternion.
    Quaternion(Quat),
}

/// Which representation [`decompose`](crate::TransformMatrix::decompose)
/// should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrientationStyle {
    #[default]
    EulerAngles,
    AxisAngle,
    Quaternion,
}

impl EulerAngles {
    pub fn new<A: Angle>(x: A, y: A, z: A) -> Self {
        Self {
            x: x.as_degrees(),
            y: y.as_degrees(),
            z: z.as_degrees(),
        }
    }

    /// Computes the Euler angles of the given unit quaternion.
    pub fn from_quaternion(rotation: Quat) -> Self {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        Self::new(Radians(x), Radians(y), Radians(z))
    }

    /// Computes the unit quaternion for these angles.
    pub fn to_quaternion(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.x.radians(),
            self.y.radians(),
            self.z.radians(),
        )
    }
}

impl Orientation {
    /// Expresses the given unit quaternion in the requested representation.
    pub fn from_quaternion(rotation: Quat, style: OrientationStyle) -> Self {
        match style {
            OrientationStyle::EulerAngles => {
                Self::EulerAngles(EulerAngles::from_quaternion(rotation))
            }
            OrientationStyle::AxisAngle => {
                let (axis, angle) = rotation.to_axis_angle();
                Self::AxisAngle {
                    axis,
                    angle: Radians(angle).as_degrees(),
                }
            }
            OrientationStyle::Quaternion => Self::Quaternion(rotation),
        }
    }

    /// Converts the orientation to a unit quaternion. A zero axis in the
    /// axis-angle representation gives the identity.
    pub fn to_quaternion(&self) -> Quat {
        match *self {
            Self::EulerAngles(angles) => angles.to_quaternion(),
            Self::AxisAngle { axis, angle } => axis
                .try_normalize()
                .map_or(Quat::IDENTITY, |axis| Quat::from_axis_angle(axis, angle.radians())),
            Self::Quaternion(rotation) => rotation.normalize(),
        }
    }

    /// The representation this orientation is given in.
    pub fn style(&self) -> OrientationStyle {
        match self {
            Self::EulerAngles(_) => OrientationStyle::EulerAngles,
            Self::AxisAngle { .. } => OrientationStyle::AxisAngle,
            Self::Quaternion(_) => OrientationStyle::Quaternion,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::Quaternion(Quat::IDENTITY)
    }
}

impl From<EulerAngles> for Orientation {
    fn from(angles: EulerAngles) -> Self {
        Self::EulerAngles(angles)
    }
}

impl From<Quat> for Orientation {
    fn from(rotation: Quat) -> Self {
        Self::Quaternion(rotation)
    }
}

impl_abs_diff_eq!(EulerAngles, |a, b, epsilon| {
    a.x.abs_diff_eq(&b.x, epsilon)
        && a.y.abs_diff_eq(&b.y, epsilon)
        && a.z.abs_diff_eq(&b.z, epsilon)
});

impl_relative_eq!(EulerAngles, |a, b, epsilon, max_relative| {
    a.x.relative_eq(&b.x, epsilon, max_relative)
        && a.y.relative_eq(&b.y, epsilon, max_relative)
        && a.z.relative_eq(&b.z, epsilon, max_relative)
});
