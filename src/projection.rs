//! Projection and view transforms.
//!
//! View space is right-handed with the camera looking down `-Z`. All
//! projections map the view volume to clip space with `x` and `y` in
//! `[-1, 1]` and depth in `[0, 1]`, where depth 0 is the near plane.

use crate::{angle::Angle, consts::LOOK_AT_DEGENERACY_THRESHOLD, matrix::TransformMatrix};
use glam::Vec3;

impl TransformMatrix {
    /// Creates a perspective projection. See [`Self::perspective`].
    pub fn perspective_matrix<A: Angle>(
        vertical_field_of_view: A,
        aspect_ratio: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> Self {
        let mut m = Self::identity();
        m.perspective(vertical_field_of_view, aspect_ratio, near_distance, far_distance);
        m
    }

    /// Overwrites the matrix with a perspective projection for a symmetric
    /// view frustum with the given vertical field of view and width-to-height
    /// aspect ratio. The near and far distances are positive distances along
    /// `-Z`.
    pub fn perspective<A: Angle>(
        &mut self,
        vertical_field_of_view: A,
        aspect_ratio: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> &mut Self {
        let (sin, cos) = (vertical_field_of_view.as_radians() * 0.5).sin_cos();
        let y_scale = cos / sin;
        let depth_scale = far_distance / (near_distance - far_distance);

        self.fill(0.0);
        let d = self.as_array_mut();
        d[0] = y_scale / aspect_ratio;
        d[5] = y_scale;
        d[10] = depth_scale;
        d[11] = -1.0;
        d[14] = depth_scale * near_distance;
        self
    }

    /// Overwrites the matrix with a perspective projection by computing the
    /// bounds of the near plane from the field of view and passing them to
    /// [`Self::frustum`]. Gives the same result as [`Self::perspective`].
    pub fn perspective_b<A: Angle>(
        &mut self,
        vertical_field_of_view: A,
        aspect_ratio: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> &mut Self {
        let half_height = (vertical_field_of_view.radians() * 0.5).tan() * near_distance;
        let half_width = half_height * aspect_ratio;
        self.frustum(
            -half_width,
            half_width,
            -half_height,
            half_height,
            near_distance,
            far_distance,
        )
    }

    /// Creates a general perspective projection. See [`Self::frustum`].
    pub fn frustum_matrix(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> Self {
        let mut m = Self::identity();
        m.frustum(left, right, bottom, top, near_distance, far_distance);
        m
    }

    /// Overwrites the matrix with a perspective projection for the view
    /// frustum whose near plane spans `[left, right]` horizontally and
    /// `[bottom, top]` vertically. The frustum need not be symmetric.
    pub fn frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> &mut Self {
        let inverse_width = (right - left).recip();
        let inverse_height = (top - bottom).recip();
        let depth_scale = far_distance / (near_distance - far_distance);

        self.fill(0.0);
        let d = self.as_array_mut();
        d[0] = 2.0 * near_distance * inverse_width;
        d[5] = 2.0 * near_distance * inverse_height;
        d[8] = (right + left) * inverse_width;
        d[9] = (top + bottom) * inverse_height;
        d[10] = depth_scale;
        d[11] = -1.0;
        d[14] = depth_scale * near_distance;
        self
    }

    /// Overwrites the matrix with an orthographic projection of a view box
    /// of the given width and height centered on the `Z` axis.
    pub fn ortho(
        &mut self,
        width: f32,
        height: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> &mut Self {
        let depth_scale = (near_distance - far_distance).recip();

        self.set_identity();
        let d = self.as_array_mut();
        d[0] = 2.0 / width;
        d[5] = 2.0 / height;
        d[10] = depth_scale;
        d[14] = near_distance * depth_scale;
        self
    }

    /// Creates an orthographic projection. See [`Self::ortho_off_center`].
    pub fn ortho_off_center_matrix(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> Self {
        let mut m = Self::identity();
        m.ortho_off_center(left, right, bottom, top, near_distance, far_distance);
        m
    }

    /// Overwrites the matrix with an orthographic projection of the view box
    /// spanning `[left, right]`, `[bottom, top]` and the depth range between
    /// the near and far distances.
    pub fn ortho_off_center(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> &mut Self {
        let inverse_width = (right - left).recip();
        let inverse_height = (top - bottom).recip();
        let depth_scale = (near_distance - far_distance).recip();

        self.set_identity();
        let d = self.as_array_mut();
        d[0] = 2.0 * inverse_width;
        d[5] = 2.0 * inverse_height;
        d[10] = depth_scale;
        d[12] = -(left + right) * inverse_width;
        d[13] = -(top + bottom) * inverse_height;
        d[14] = near_distance * depth_scale;
        self
    }

    /// Creates a view transform. See [`Self::look_at`].
    pub fn look_at_matrix(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut m = Self::identity();
        m.look_at(eye, target, up);
        m
    }

    /// Overwrites the matrix with the view transform of a camera at `eye`
    /// looking towards `target`, with `up` giving the approximate upward
    /// direction.
    ///
    /// When `up` is (nearly) parallel to the viewing direction, an upward
    /// direction perpendicular to the viewing direction is picked instead.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> &mut Self {
        let z_axis = (eye - target).normalize_or(Vec3::Z);
        let mut x_axis = up.cross(z_axis);

        if x_axis.length() < LOOK_AT_DEGENERACY_THRESHOLD {
            log::debug!("Up direction {up} is degenerate for view direction {}", -z_axis);
            x_axis = fallback_right_axis(up, z_axis);
        }

        let x_axis = x_axis.normalize();
        let y_axis = z_axis.cross(x_axis);

        *self.as_array_mut() = [
            x_axis.x,
            y_axis.x,
            z_axis.x,
            0.0,
            x_axis.y,
            y_axis.y,
            z_axis.y,
            0.0,
            x_axis.z,
            y_axis.z,
            z_axis.z,
            0.0,
            -x_axis.dot(eye),
            -y_axis.dot(eye),
            -z_axis.dot(eye),
            1.0,
        ];
        self
    }
}

/// Builds a right axis from the components of `up` and makes it orthogonal
/// to the backward axis.
fn fallback_right_axis(up: Vec3, z_axis: Vec3) -> Vec3 {
    let candidate = if (up.y - up.x).abs() < LOOK_AT_DEGENERACY_THRESHOLD {
        Vec3::new(-up.z, up.x, 0.0)
    } else {
        Vec3::new(up.y, up.x, 0.0)
    };

    let orthogonal = candidate - candidate.dot(z_axis) * z_axis;

    if orthogonal.length() < LOOK_AT_DEGENERACY_THRESHOLD {
        z_axis.any_orthonormal_vector()
    } else {
        orthogonal
    }
}
