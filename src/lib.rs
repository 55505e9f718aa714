//! Row-major 4x4 homogeneous transform matrices.
//!
//! A [`TransformMatrix`] stores 16 `f32` values in row-major order and acts on
//! row vectors multiplied from the left (`p' = p * M`), so the translation
//! lives in elements 12, 13 and 14. This memory layout is identical to that
//! of a column-major [`glam::Mat4`] acting on column vectors, which is what
//! the conversion methods rely on.
//!
//! Projections target a right-handed view space (the camera looks down `-Z`)
//! and a clip space with depth in `[0, 1]`.

#[macro_use]
mod macros;

pub mod angle;
pub mod consts;
pub mod decomposition;
pub mod error;
pub mod inverse;
pub mod matrix;
pub mod orientation;
pub mod plane;
pub mod projection;
pub mod rotation;

pub use angle::{Angle, Degrees, Radians};
pub use decomposition::Decomposition;
pub use error::{MatrixError, Result};
pub use matrix::{RawDataLayout, TransformMatrix};
pub use orientation::{EulerAngles, Orientation, OrientationStyle};
pub use plane::Plane;
pub use rotation::CanonicalAxis;
