//! Planes and their transformation.

use crate::{
    consts::INVERTIBILITY_THRESHOLD,
    error::{MatrixError, Result},
    matrix::TransformMatrix,
};
use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// A plane in 3D, represented by a unit normal and a displacement.
///
/// The displacement `d` can be determined from the normal `n` and any point
/// `p` lying on the plane as `d = -n.dot(p)`, so the points of the plane are
/// those satisfying `n.dot(p) + d = 0`. The positive halfspace is the one the
/// normal points into.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct Plane {
    unit_normal: Vec3,
    displacement: f32,
}

impl Plane {
    /// The xy-coordinate plane, with the positive halfspace being the space
    /// of positive z-coordinates.
    pub const XY_PLANE: Self = Self::new(Vec3::Z, 0.0);

    /// The yz-coordinate plane, with the positive halfspace being the space
    /// of positive x-coordinates.
    pub const YZ_PLANE: Self = Self::new(Vec3::X, 0.0);

    /// The xz-coordinate plane, with the positive halfspace being the space
    /// of positive y-coordinates.
    pub const XZ_PLANE: Self = Self::new(Vec3::Y, 0.0);

    /// Creates a plane from its unit normal and displacement. The normal is
    /// assumed to be normalized.
    pub const fn new(unit_normal: Vec3, displacement: f32) -> Self {
        Self {
            unit_normal,
            displacement,
        }
    }

    /// Creates the plane with the given unit normal that contains the given
    /// point.
    pub fn from_normal_and_point(unit_normal: Vec3, point_in_plane: Vec3) -> Self {
        Self::new(unit_normal, -unit_normal.dot(point_in_plane))
    }

    /// Creates the plane `a x + b y + c z + d = 0` from its coefficients,
    /// normalizing them. Returns [`None`] if `(a, b, c)` is zero.
    pub fn from_coefficients(coefficients: Vec4) -> Option<Self> {
        let length = coefficients.truncate().length();
        (length > INVERTIBILITY_THRESHOLD).then(|| {
            let normalized = coefficients / length;
            Self::new(normalized.truncate(), normalized.w)
        })
    }

    pub fn unit_normal(&self) -> Vec3 {
        self.unit_normal
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    /// The coefficients `(a, b, c, d)` of the plane equation.
    pub fn coefficients(&self) -> Vec4 {
        self.unit_normal.extend(self.displacement)
    }

    /// Computes the signed distance from the plane to the given point. It is
    /// positive for points in the positive halfspace.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.unit_normal.dot(point) + self.displacement
    }
}

impl_abs_diff_eq!(Plane, |a, b, epsilon| {
    a.unit_normal.abs_diff_eq(b.unit_normal, epsilon)
        && a.displacement.abs_diff_eq(&b.displacement, epsilon)
});

impl_relative_eq!(Plane, |a, b, epsilon, max_relative| {
    a.unit_normal
        .relative_eq(&b.unit_normal, epsilon, max_relative)
        && a.displacement
            .relative_eq(&b.displacement, epsilon, max_relative)
});

impl TransformMatrix {
    /// Transforms the given plane, so that every point of the plane is mapped
    /// by this transform onto the returned plane.
    ///
    /// The plane coefficients are multiplied with the inverse transpose of the
    /// matrix and normalized again.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotInvertible`] if the matrix is singular and
    /// [`MatrixError::DegeneratePlane`] if the transformed coefficients have no
    /// normal direction.
    pub fn transform_plane(&self, plane: &Plane) -> Result<Plane> {
        let inverse_transpose = self
            .inverted()
            .ok_or_else(|| MatrixError::NotInvertible {
                determinant: self.determinant(),
            })?
            .transposed();

        let coefficients = inverse_transpose.transform_vector4(plane.coefficients());

        Plane::from_coefficients(coefficients).ok_or(MatrixError::DegeneratePlane {
            plane: coefficients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Degrees;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use glam::Mat4;
    use proptest::prelude::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn creating_plane_from_normal_and_point_gives_correct_displacement() {
        let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::new(3.0, 2.0, -1.0));
        assert_eq!(plane.displacement(), -2.0);
        assert_eq!(plane.signed_distance(Vec3::new(0.0, 5.0, 0.0)), 3.0);
    }

    #[test]
    fn creating_plane_from_coefficients_normalizes_them() {
        let plane = Plane::from_coefficients(Vec4::new(0.0, 0.0, 2.0, -4.0)).unwrap();
        assert_eq!(plane, Plane::new(Vec3::Z, -2.0));
        assert!(Plane::from_coefficients(Vec4::new(0.0, 0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn translating_plane_moves_it_along_normal() {
        let m = TransformMatrix::from_glam(Mat4::from_translation(Vec3::new(5.0, 2.0, 0.0)));
        let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::Y);

        let transformed = m.transform_plane(&plane).unwrap();
        assert_abs_diff_eq!(transformed, Plane::new(Vec3::Y, -3.0), epsilon = EPSILON);
    }

    #[test]
    fn scaling_plane_keeps_normal_unit_length() {
        let m = TransformMatrix::from_scale(Vec3::new(1.0, 4.0, 1.0));
        let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::Y);

        let transformed = m.transform_plane(&plane).unwrap();
        assert_abs_diff_eq!(transformed, Plane::new(Vec3::Y, -4.0), epsilon = EPSILON);
    }

    #[test]
    fn rotating_plane_rotates_normal() {
        let m = TransformMatrix::axis_rotation(Vec3::Z, Degrees(90.0));
        let transformed = m.transform_plane(&Plane::YZ_PLANE).unwrap();
        assert_abs_diff_eq!(transformed, Plane::XZ_PLANE, epsilon = EPSILON);
    }

    #[test]
    fn transforming_plane_with_singular_matrix_fails() {
        let m = TransformMatrix::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            m.transform_plane(&Plane::XY_PLANE),
            Err(MatrixError::NotInvertible { determinant: 0.0 })
        );
    }

    #[test]
    fn transforming_plane_with_nan_matrix_fails() {
        let mut m = TransformMatrix::identity();
        m.as_array_mut()[13] = f32::NAN;
        assert!(matches!(
            m.transform_plane(&Plane::XY_PLANE),
            Err(MatrixError::NotInvertible { determinant }) if determinant.is_nan()
        ));
    }

    proptest! {
        #[test]
        fn transformed_points_lie_on_transformed_plane(
            normal_x in -1.0f32..1.0,
            normal_y in 0.1f32..1.0,
            normal_z in -1.0f32..1.0,
            point_x in -10.0f32..10.0,
            point_z in -10.0f32..10.0,
            angle in -180.0f32..180.0,
            scale in 0.5f32..2.0,
            translation_y in -10.0f32..10.0,
        ) {
            let normal = Vec3::new(normal_x, normal_y, normal_z).normalize();
            let plane = Plane::from_normal_and_point(normal, Vec3::ZERO);

            // Point on the plane, solved for y
            let point = Vec3::new(
                point_x,
                -(normal.x * point_x + normal.z * point_z) / normal.y,
                point_z,
            );

            let mut m = TransformMatrix::from_scale(Vec3::new(scale, 1.0, 2.0 * scale));
            m.append_rotation(Degrees(angle), Vec3::new(1.0, 2.0, 3.0));
            m.append_translation(Vec3::new(0.0, translation_y, 1.0));

            let transformed = m.transform_plane(&plane).unwrap();
            prop_assert!(abs_diff_eq!(
                transformed.signed_distance(m.transform_point(point)),
                0.0,
                epsilon = 1e-2
            ));
            prop_assert!(abs_diff_eq!(transformed.unit_normal().length(), 1.0, epsilon = 1e-5));
        }
    }
}
