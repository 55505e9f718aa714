//! Numeric thresholds.

/// A determinant with magnitude at or below this value marks a matrix (or 3x3
/// block) as singular. Decomposition uses the same value as the smallest
/// accepted axis scale.
pub const INVERTIBILITY_THRESHOLD: f32 = 1e-11;

/// Tolerance on the dot product of two unit directions for treating them as
/// coincident (`dot > 1 - eps`) or antiparallel (`dot < -1 + eps`).
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Length below which the right axis computed by
/// [`look_at`](crate::TransformMatrix::look_at) is considered degenerate.
pub const LOOK_AT_DEGENERACY_THRESHOLD: f32 = 0.05;
