//! Angles with an explicit unit.

use bytemuck::{Pod, Zeroable};

/// An angle that can be read in either unit.
///
/// Rotation and projection builders take `impl Angle`, so callers state the
/// unit in the type of the argument.
pub trait Angle: Copy {
    fn as_degrees(self) -> Degrees;

    fn as_radians(self) -> Radians;

    /// The value of the angle in degrees.
    fn degrees(self) -> f32 {
        self.as_degrees().0
    }

    /// The value of the angle in radians.
    fn radians(self) -> f32 {
        self.as_radians().0
    }

    fn sin_cos(self) -> (f32, f32) {
        self.radians().sin_cos()
    }
}

/// An angle in degrees.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Zeroable, Pod)]
pub struct Degrees(pub f32);

/// An angle in radians.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Zeroable, Pod)]
pub struct Radians(pub f32);

impl Angle for Degrees {
    fn as_degrees(self) -> Degrees {
        self
    }

    fn as_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl Angle for Radians {
    fn as_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    fn as_radians(self) -> Radians {
        self
    }
}

impl From<Radians> for Degrees {
    fn from(angle: Radians) -> Self {
        angle.as_degrees()
    }
}

impl From<Degrees> for Radians {
    fn from(angle: Degrees) -> Self {
        angle.as_radians()
    }
}

impl_binop!(Mul, mul, Degrees, f32, Degrees, |a, b| { Degrees(a.0 * *b) });
impl_binop!(Mul, mul, Radians, f32, Radians, |a, b| { Radians(a.0 * *b) });

impl_unary_op!(Neg, neg, Degrees, Degrees, |angle| { Degrees(-angle.0) });
impl_unary_op!(Neg, neg, Radians, Radians, |angle| { Radians(-angle.0) });

impl_abs_diff_eq!(Degrees, |a, b, epsilon| { a.0.abs_diff_eq(&b.0, epsilon) });

impl_relative_eq!(Degrees, |a, b, epsilon, max_relative| {
    a.0.relative_eq(&b.0, epsilon, max_relative)
});

impl_abs_diff_eq!(Radians, |a, b, epsilon| { a.0.abs_diff_eq(&b.0, epsilon) });

impl_relative_eq!(Radians, |a, b, epsilon, max_relative| {
    a.0.relative_eq(&b.0, epsilon, max_relative)
});
