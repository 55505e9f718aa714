//! Splitting transforms into translation, rotation and scale, and building
//! them back up.

use crate::{
    consts::INVERTIBILITY_THRESHOLD,
    error::{MatrixError, Result},
    matrix::TransformMatrix,
    orientation::{Orientation, OrientationStyle},
};
use glam::{Quat, Vec3};

/// The parts of an affine transform that scales, then rotates and then
/// translates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposition {
    pub translation: Vec3,
    pub orientation: Orientation,
    /// Scale factors along the local X, Y and Z axes. If the transform
    /// mirrors, the Z factor is negative.
    pub scale: Vec3,
}

impl Default for Decomposition {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            orientation: Orientation::default(),
            scale: Vec3::ONE,
        }
    }
}

impl Decomposition {
    pub fn new(translation: Vec3, orientation: impl Into<Orientation>, scale: Vec3) -> Self {
        Self {
            translation,
            orientation: orientation.into(),
            scale,
        }
    }
}

impl TransformMatrix {
    /// Creates the transform that scales, rotates and translates as given.
    pub fn from_decomposition(decomposition: &Decomposition) -> Self {
        let mut m = Self::identity();
        m.recompose(decomposition);
        m
    }

    /// Splits the transform into translation, rotation and scale, with the
    /// rotation given in the requested representation.
    ///
    /// The scale of each axis is the length of the corresponding row of the
    /// 3x3 block. When the block mirrors (negative determinant), the Z scale
    /// is made negative so that the remaining rotation is proper. Shear and
    /// the perspective column are not represented and get lost.
    ///
    /// # Errors
    /// Returns [`MatrixError::DegenerateScale`] if any axis is scaled to
    /// (nearly) zero or is not a number, since no rotation can be recovered
    /// then.
    pub fn decompose(&self, style: OrientationStyle) -> Result<Decomposition> {
        let d = self.as_array();
        let translation = self.position();

        let mut rows = [
            Vec3::new(d[0], d[1], d[2]),
            Vec3::new(d[4], d[5], d[6]),
            Vec3::new(d[8], d[9], d[10]),
        ];

        let mut scale = Vec3::new(rows[0].length(), rows[1].length(), rows[2].length());

        if scale.is_nan() || scale.min_element() < INVERTIBILITY_THRESHOLD {
            log::debug!("Cannot decompose transform with axis scales {scale}");
            return Err(MatrixError::DegenerateScale { scale });
        }

        if self.determinant_3x3() < 0.0 {
            scale.z = -scale.z;
        }

        for (row, &axis_scale) in rows.iter_mut().zip(scale.as_ref()) {
            *row /= axis_scale;
        }

        let rotation = quaternion_from_rotation_rows(&rows);

        Ok(Decomposition {
            translation,
            orientation: Orientation::from_quaternion(rotation, style),
            scale,
        })
    }

    /// Overwrites the matrix with the transform described by the given
    /// decomposition.
    pub fn recompose(&mut self, decomposition: &Decomposition) -> &mut Self {
        self.make_transform(
            decomposition.translation,
            decomposition.scale,
            decomposition.orientation.to_quaternion(),
        )
    }

    /// Overwrites the matrix with the transform that scales, then rotates by
    /// the given unit quaternion and finally translates.
    pub fn make_transform(&mut self, translation: Vec3, scale: Vec3, rotation: Quat) -> &mut Self {
        self.create_by_scale(scale);
        self.append(&Self::from_quaternion(rotation));
        self.set_position(translation);
        self.as_array_mut()[15] = 1.0;
        self
    }
}

/// Extracts the unit quaternion of a proper rotation given by the rows of its
/// matrix, branching on the largest diagonal term for stability.
fn quaternion_from_rotation_rows(rows: &[Vec3; 3]) -> Quat {
    let [m0, m1, m2] = rows[0].to_array();
    let [m4, m5, m6] = rows[1].to_array();
    let [m8, m9, m10] = rows[2].to_array();

    let trace = m0 + m5 + m10;

    let (x, y, z, w) = if trace > 0.0 {
        let s = 2.0 * (1.0 + trace).sqrt();
        ((m6 - m9) / s, (m8 - m2) / s, (m1 - m4) / s, 0.25 * s)
    } else if m0 > m5 && m0 > m10 {
        let s = 2.0 * (1.0 + m0 - m5 - m10).sqrt();
        (0.25 * s, (m1 + m4) / s, (m8 + m2) / s, (m6 - m9) / s)
    } else if m5 > m10 {
        let s = 2.0 * (1.0 + m5 - m0 - m10).sqrt();
        ((m1 + m4) / s, 0.25 * s, (m6 + m9) / s, (m8 - m2) / s)
    } else {
        let s = 2.0 * (1.0 + m10 - m0 - m5).sqrt();
        ((m8 + m2) / s, (m6 + m9) / s, 0.25 * s, (m1 - m4) / s)
    };

    Quat::from_xyzw(x, y, z, w).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        angle::{Angle, Degrees, Radians},
        orientation::EulerAngles,
    };
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use glam::Mat4;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    prop_compose! {
        fn decomposition_strategy()(
            translation_x in -100.0f32..100.0,
            translation_y in -100.0f32..100.0,
            translation_z in -100.0f32..100.0,
            angle_x in -179.0f32..179.0,
            angle_y in -89.0f32..89.0,
            angle_z in -179.0f32..179.0,
            scale_x in 0.1f32..10.0,
            scale_y in 0.1f32..10.0,
            scale_z in 0.1f32..10.0,
        ) -> Decomposition {
            Decomposition::new(
                Vec3::new(translation_x, translation_y, translation_z),
                EulerAngles::new(Degrees(angle_x), Degrees(angle_y), Degrees(angle_z)),
                Vec3::new(scale_x, scale_y, scale_z),
            )
        }
    }

    fn same_rotation(a: Quat, b: Quat) -> bool {
        abs_diff_eq!(a, b, epsilon = 1e-4) || abs_diff_eq!(a, -b, epsilon = 1e-4)
    }

    #[test]
    fn default_decomposition_gives_identity() {
        assert_eq!(
            TransformMatrix::from_decomposition(&Decomposition::default()),
            TransformMatrix::identity()
        );
    }

    #[test]
    fn making_transform_matches_glam() {
        let translation = Vec3::new(1.0, -2.0, 3.0);
        let scale = Vec3::new(0.5, 2.0, 4.0);
        let rotation = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.8);

        let mut m = TransformMatrix::filled(9.0);
        m.make_transform(translation, scale, rotation);

        assert_abs_diff_eq!(
            m,
            TransformMatrix::from_glam(Mat4::from_scale_rotation_translation(
                scale,
                rotation,
                translation
            )),
            epsilon = EPSILON
        );
    }

    #[test]
    fn decomposing_identity_gives_zero_translation_no_rotation_and_unit_scale() {
        let decomposition = TransformMatrix::identity()
            .decompose(OrientationStyle::Quaternion)
            .unwrap();

        assert_eq!(decomposition.translation, Vec3::ZERO);
        assert_eq!(decomposition.scale, Vec3::ONE);
        assert_eq!(decomposition.orientation, Orientation::Quaternion(Quat::IDENTITY));
    }

    #[test]
    fn decomposing_gives_parts_of_composed_transform() {
        let translation = Vec3::new(5.0, 0.0, -1.0);
        let scale = Vec3::new(3.0, 1.0, 0.25);
        let rotation = Quat::from_rotation_z(0.3) * Quat::from_rotation_x(1.1);

        let m = TransformMatrix::from_glam(Mat4::from_scale_rotation_translation(
            scale,
            rotation,
            translation,
        ));
        let decomposition = m.decompose(OrientationStyle::Quaternion).unwrap();

        assert_abs_diff_eq!(decomposition.translation, translation, epsilon = EPSILON);
        assert_abs_diff_eq!(decomposition.scale, scale, epsilon = EPSILON);
        assert!(same_rotation(decomposition.orientation.to_quaternion(), rotation));
    }

    #[test]
    fn decomposing_half_turns_uses_diagonal_branches() {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 1.0, -1.0).normalize()] {
            let rotation = Quat::from_axis_angle(axis, PI);
            let m = TransformMatrix::from_quaternion(rotation);

            let decomposition = m.decompose(OrientationStyle::Quaternion).unwrap();
            let Orientation::Quaternion(extracted) = decomposition.orientation else {
                panic!("Expected quaternion orientation");
            };

            assert!(same_rotation(extracted, rotation));
            assert_abs_diff_eq!(decomposition.scale, Vec3::ONE, epsilon = EPSILON);
        }
    }

    #[test]
    fn decomposing_mirroring_transform_gives_negative_z_scale() {
        let m = TransformMatrix::from_scale(Vec3::new(2.0, 3.0, -4.0));
        let decomposition = m.decompose(OrientationStyle::Quaternion).unwrap();

        assert_abs_diff_eq!(decomposition.scale, Vec3::new(2.0, 3.0, -4.0), epsilon = EPSILON);
        assert!(same_rotation(decomposition.orientation.to_quaternion(), Quat::IDENTITY));
    }

    #[test]
    fn recomposing_mirroring_transform_gives_original() {
        let mut m = TransformMatrix::from_scale(Vec3::new(-1.0, 2.0, 1.0));
        m.append_rotation(Degrees(70.0), Vec3::new(0.2, 1.0, 0.3));
        m.append_translation(Vec3::new(1.0, 2.0, 3.0));

        let decomposition = m.decompose(OrientationStyle::AxisAngle).unwrap();
        assert!(decomposition.scale.z < 0.0);

        assert_abs_diff_eq!(
            TransformMatrix::from_decomposition(&decomposition),
            m,
            epsilon = EPSILON
        );
    }

    #[test]
    fn decomposing_to_axis_angle_gives_axis_and_degrees() {
        let m = TransformMatrix::axis_rotation(Vec3::new(0.0, 0.0, 3.0), Radians(0.5));

        let Orientation::AxisAngle { axis, angle } =
            m.decompose(OrientationStyle::AxisAngle).unwrap().orientation
        else {
            panic!("Expected axis-angle orientation");
        };
        assert_abs_diff_eq!(axis, Vec3::Z, epsilon = EPSILON);
        assert_abs_diff_eq!(angle, Radians(0.5).as_degrees(), epsilon = 1e-3);
    }

    #[test]
    fn decomposing_to_euler_angles_recovers_angles() {
        let angles = EulerAngles::new(Degrees(20.0), Degrees(-35.0), Degrees(140.0));
        let mut m = TransformMatrix::identity();
        m.rotation(angles);

        let Orientation::EulerAngles(extracted) =
            m.decompose(OrientationStyle::EulerAngles).unwrap().orientation
        else {
            panic!("Expected Euler angle orientation");
        };
        assert_abs_diff_eq!(extracted, angles, epsilon = 1e-3);
    }

    #[test]
    fn decomposing_flattened_transform_fails() {
        let m = TransformMatrix::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            m.decompose(OrientationStyle::EulerAngles),
            Err(MatrixError::DegenerateScale {
                scale: Vec3::new(1.0, 0.0, 1.0)
            })
        );
    }

    #[test]
    fn decomposing_transform_with_nan_axis_fails() {
        let mut m = TransformMatrix::from_scale(Vec3::new(2.0, 1.0, 1.0));
        m.as_array_mut()[1] = f32::NAN;

        let result = m.decompose(OrientationStyle::Quaternion);
        assert!(
            matches!(result, Err(MatrixError::DegenerateScale { scale }) if scale.x.is_nan())
        );
    }

    #[test]
    fn decomposing_ignores_perspective_column() {
        let mut m = TransformMatrix::from_scale(Vec3::splat(2.0));
        m.set_position(Vec3::ONE);
        m.set_column(3, glam::Vec4::new(0.1, 0.2, 0.3, 4.0)).unwrap();

        let decomposition = m.decompose(OrientationStyle::Quaternion).unwrap();
        assert_eq!(decomposition.translation, Vec3::ONE);
        assert_abs_diff_eq!(decomposition.scale, Vec3::splat(2.0), epsilon = EPSILON);
    }

    proptest! {
        #[test]
        fn recomposing_decomposition_gives_original_parts(decomposition in decomposition_strategy()) {
            let m = TransformMatrix::from_decomposition(&decomposition);
            let recovered = m.decompose(OrientationStyle::EulerAngles).unwrap();

            prop_assert!(abs_diff_eq!(
                recovered.translation,
                decomposition.translation,
                epsilon = 1e-4
            ));
            prop_assert!(abs_diff_eq!(recovered.scale, decomposition.scale, epsilon = 1e-3));

            let (
                Orientation::EulerAngles(recovered_angles),
                Orientation::EulerAngles(angles),
            ) = (recovered.orientation, decomposition.orientation)
            else {
                panic!("Expected Euler angle orientations");
            };
            prop_assert!(abs_diff_eq!(recovered_angles, angles, epsilon = 0.05));
        }
    }

    proptest! {
        #[test]
        fn decomposed_rotation_has_unit_determinant(decomposition in decomposition_strategy()) {
            let m = TransformMatrix::from_decomposition(&decomposition);
            let rotation = m.decompose(OrientationStyle::Quaternion).unwrap().orientation;

            let rotation = TransformMatrix::from_quaternion(rotation.to_quaternion());
            prop_assert!(abs_diff_eq!(rotation.determinant(), 1.0, epsilon = 1e-4));
        }
    }
}
