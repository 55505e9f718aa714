//! Errors reported by matrix operations.

use glam::{Vec3, Vec4};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum MatrixError {
    #[error("Row index {index} out of bounds [0, ..., 3]")]
    RowOutOfBounds { index: usize },

    #[error("Column index {index} out of bounds [0, ..., 3]")]
    ColumnOutOfBounds { index: usize },

    #[error("Buffer of length {len} cannot hold 16 elements starting at offset {offset}")]
    BufferTooShort { offset: usize, len: usize },

    #[error("Axis {axis} is not one of the unit axes X, Y or Z")]
    NonCanonicalAxis { axis: Vec3 },

    #[error("Cannot decompose matrix with degenerate axis scale {scale}")]
    DegenerateScale { scale: Vec3 },

    #[error("Matrix is not invertible (determinant {determinant})")]
    NotInvertible { determinant: f32 },

    #[error("Plane {plane} has a zero-length normal after transformation")]
    DegeneratePlane { plane: Vec4 },
}
