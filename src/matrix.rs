//! The transform matrix type and its basic arithmetic.

use crate::error::{MatrixError, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use std::fmt;

/// A 4x4 homogeneous transform stored as 16 `f32` values in row-major order.
///
/// Points and vectors are treated as row vectors multiplied from the left,
/// `p' = p * M`. Consequently elements 12, 13 and 14 hold the translation and
/// elements 3, 7 and 11 hold the perspective column, which is zero for affine
/// transforms. The bottom-right element is 1 for affine transforms, but no
/// structure is enforced: projection matrices are equally valid values.
///
/// The memory layout coincides with that of a column-major [`Mat4`] acting on
/// column vectors, so [`Self::to_glam`] and [`Self::from_glam`] do not
/// transpose anything.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct TransformMatrix {
    data: [f32; 16],
}

/// Element order used when exchanging matrices with flat buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RawDataLayout {
    /// The stored row-major order.
    #[default]
    RowMajor,
    /// Transposed order, i.e. the buffer holds the matrix column by column.
    Transposed,
}

impl TransformMatrix {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_array([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a matrix with all 16 elements set to `value`.
    #[inline]
    pub const fn filled(value: f32) -> Self {
        Self::from_array([value; 16])
    }

    /// Creates a matrix from 16 elements in row-major order.
    #[inline]
    pub const fn from_array(data: [f32; 16]) -> Self {
        Self { data }
    }

    /// Creates a matrix with the given rows.
    #[inline]
    pub fn from_rows(row_0: Vec4, row_1: Vec4, row_2: Vec4, row_3: Vec4) -> Self {
        let mut m = Self::filled(0.0);
        m.data[0..4].copy_from_slice(&row_0.to_array());
        m.data[4..8].copy_from_slice(&row_1.to_array());
        m.data[8..12].copy_from_slice(&row_2.to_array());
        m.data[12..16].copy_from_slice(&row_3.to_array());
        m
    }

    /// Reinterprets a column-major glam matrix acting on column vectors as
    /// the equivalent row-major matrix acting on row vectors.
    #[inline]
    pub fn from_glam(matrix: Mat4) -> Self {
        Self::from_array(matrix.to_cols_array())
    }

    /// Returns the equivalent column-major glam matrix acting on column
    /// vectors.
    #[inline]
    pub fn to_glam(&self) -> Mat4 {
        Mat4::from_cols_array(&self.data)
    }

    /// The 16 elements in row-major order.
    #[inline]
    pub const fn as_array(&self) -> &[f32; 16] {
        &self.data
    }

    /// The 16 elements in row-major order, mutably.
    #[inline]
    pub fn as_array_mut(&mut self) -> &mut [f32; 16] {
        &mut self.data
    }

    /// Resets the matrix to the identity.
    #[inline]
    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Sets all 16 elements to `value`. The result is generally not a
    /// meaningful transform.
    #[inline]
    pub fn fill(&mut self, value: f32) {
        self.data = [value; 16];
    }

    /// Overwrites this matrix with the elements of `source`.
    #[inline]
    pub fn copy_from(&mut self, source: &Self) -> &mut Self {
        self.data = source.data;
        self
    }

    /// Reads 16 elements starting at `offset` in `buffer`. Several matrices
    /// can thus be packed into one buffer.
    ///
    /// # Errors
    /// Returns [`MatrixError::BufferTooShort`] if the buffer does not hold 16
    /// elements after `offset`. The matrix is left unchanged in that case.
    pub fn copy_raw_data_from(
        &mut self,
        buffer: &[f32],
        offset: usize,
        layout: RawDataLayout,
    ) -> Result<()> {
        let source = raw_data_window(buffer.len(), offset)
            .map(|range| &buffer[range])
            .ok_or(MatrixError::BufferTooShort {
                offset,
                len: buffer.len(),
            })?;

        self.data.copy_from_slice(source);
        if layout == RawDataLayout::Transposed {
            self.transpose();
        }
        Ok(())
    }

    /// Writes the 16 elements into `buffer` starting at `offset`.
    ///
    /// # Errors
    /// Returns [`MatrixError::BufferTooShort`] if the buffer does not have
    /// room for 16 elements after `offset`. The buffer is left unchanged in
    /// that case.
    pub fn copy_raw_data_to(
        &self,
        buffer: &mut [f32],
        offset: usize,
        layout: RawDataLayout,
    ) -> Result<()> {
        let len = buffer.len();
        let target = raw_data_window(len, offset)
            .map(|range| &mut buffer[range])
            .ok_or(MatrixError::BufferTooShort { offset, len })?;

        match layout {
            RawDataLayout::RowMajor => target.copy_from_slice(&self.data),
            RawDataLayout::Transposed => target.copy_from_slice(&self.transposed().data),
        }
        Ok(())
    }

    /// Returns the element at the given row and column.
    ///
    /// # Errors
    /// Returns [`MatrixError::RowOutOfBounds`] or
    /// [`MatrixError::ColumnOutOfBounds`] if an index exceeds 3.
    pub fn element(&self, row: usize, column: usize) -> Result<f32> {
        Ok(self.data[element_index(row, column)?])
    }

    /// Sets the element at the given row and column.
    ///
    /// # Errors
    /// Returns [`MatrixError::RowOutOfBounds`] or
    /// [`MatrixError::ColumnOutOfBounds`] if an index exceeds 3.
    pub fn set_element(&mut self, row: usize, column: usize, value: f32) -> Result<()> {
        self.data[element_index(row, column)?] = value;
        Ok(())
    }

    /// Returns the row with the given index.
    ///
    /// # Errors
    /// Returns [`MatrixError::RowOutOfBounds`] if `index > 3`.
    pub fn row(&self, index: usize) -> Result<Vec4> {
        if index > 3 {
            return Err(MatrixError::RowOutOfBounds { index });
        }
        Ok(Vec4::from_slice(&self.data[4 * index..4 * index + 4]))
    }

    /// Sets the row with the given index.
    ///
    /// # Errors
    /// Returns [`MatrixError::RowOutOfBounds`] if `index > 3`.
    pub fn set_row(&mut self, index: usize, row: Vec4) -> Result<()> {
        if index > 3 {
            return Err(MatrixError::RowOutOfBounds { index });
        }
        row.write_to_slice(&mut self.data[4 * index..4 * index + 4]);
        Ok(())
    }

    /// Returns the column with the given index.
    ///
    /// # Errors
    /// Returns [`MatrixError::ColumnOutOfBounds`] if `index > 3`.
    pub fn column(&self, index: usize) -> Result<Vec4> {
        if index > 3 {
            return Err(MatrixError::ColumnOutOfBounds { index });
        }
        let d = &self.data;
        Ok(Vec4::new(
            d[index],
            d[index + 4],
            d[index + 8],
            d[index + 12],
        ))
    }

    /// Sets the column with the given index.
    ///
    /// # Errors
    /// Returns [`MatrixError::ColumnOutOfBounds`] if `index > 3`.
    pub fn set_column(&mut self, index: usize, column: Vec4) -> Result<()> {
        if index > 3 {
            return Err(MatrixError::ColumnOutOfBounds { index });
        }
        for (row, value) in column.to_array().into_iter().enumerate() {
            self.data[4 * row + index] = value;
        }
        Ok(())
    }

    /// Sets this matrix to `self * rhs`, so that the transform of `self` is
    /// applied first and then that of `rhs`.
    ///
    /// The product is computed into a separate buffer before being committed,
    /// so squaring a matrix through a copy of itself is well defined.
    pub fn multiply(&mut self, rhs: &Self) {
        self.data = product(&self.data, &rhs.data);
    }

    /// Sets this matrix to `self * rhs`, appending the transform of `rhs`.
    ///
    /// Numerically identical to [`Self::multiply`], but overwrites the matrix
    /// in place one row at a time, using only the cached elements of that row.
    pub fn append(&mut self, rhs: &Self) {
        let b = &rhs.data;
        for row in self.data.chunks_exact_mut(4) {
            let r = [row[0], row[1], row[2], row[3]];
            for (j, element) in row.iter_mut().enumerate() {
                *element = row_dot_column(r, b, j);
            }
        }
    }

    /// Appends a translation by adding it directly to the translation
    /// elements.
    ///
    /// This equals appending a translation matrix only when the perspective
    /// column is `(0, 0, 0, 1)`, i.e. for affine transforms.
    #[inline]
    pub fn append_translation(&mut self, translation: Vec3) {
        self.data[12] += translation.x;
        self.data[13] += translation.y;
        self.data[14] += translation.z;
    }

    /// The translation part of the transform.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.data[12], self.data[13], self.data[14])
    }

    /// Overwrites the translation part of the transform.
    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.data[12] = position.x;
        self.data[13] = position.y;
        self.data[14] = position.z;
    }

    /// The raw diagonal of the 3x3 block. This is the scale only when the
    /// transform has no rotation.
    #[inline]
    pub fn diagonal_scale(&self) -> Vec3 {
        Vec3::new(self.data[0], self.data[5], self.data[10])
    }

    /// The largest of the three row lengths of the 3x3 block, i.e. the largest
    /// axis scale of the transform.
    pub fn max_scale_on_axis(&self) -> f32 {
        let d = &self.data;
        let x = Vec3::new(d[0], d[1], d[2]).length_squared();
        let y = Vec3::new(d[4], d[5], d[6]).length_squared();
        let z = Vec3::new(d[8], d[9], d[10]).length_squared();
        x.max(y).max(z).sqrt()
    }

    /// Transposes the matrix in place.
    pub fn transpose(&mut self) {
        for i in 0..4 {
            for j in (i + 1)..4 {
                self.data.swap(4 * i + j, 4 * j + i);
            }
        }
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// Blends the two matrices element-wise as `t * (m1 - m0) + m0`.
    ///
    /// This is not rotation-aware: blending two rotations this way does not
    /// yield a rotation in general. Decompose, interpolate the orientations
    /// and recompose when that matters.
    pub fn lerp(m0: &Self, m1: &Self, t: f32) -> Self {
        let mut m = *m0;
        m.set_lerp(m0, m1, t);
        m
    }

    /// Sets this matrix to the element-wise blend `t * (m1 - m0) + m0`. See
    /// [`Self::lerp`].
    pub fn set_lerp(&mut self, m0: &Self, m1: &Self, t: f32) {
        for ((element, a), b) in self.data.iter_mut().zip(m0.data).zip(m1.data) {
            *element = t * (b - a) + a;
        }
    }

    /// Applies the transform to the given point, including translation. The
    /// perspective column is ignored.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.transform_linear(point) + self.position()
    }

    /// Multiplies the direction `(x, y, z, 0)` with the full matrix, so
    /// translation is skipped while the perspective column still yields `w`.
    pub fn transform_direction(&self, direction: Vec3) -> Vec4 {
        self.transform_vector4(direction.extend(0.0))
    }

    /// Applies only the 3x3 block of the transform to the given vector.
    pub fn transform_linear(&self, vector: Vec3) -> Vec3 {
        let d = &self.data;
        let (x, y, z) = (vector.x, vector.y, vector.z);
        Vec3::new(
            x * d[0] + y * d[4] + z * d[8],
            x * d[1] + y * d[5] + z * d[9],
            x * d[2] + y * d[6] + z * d[10],
        )
    }

    /// Multiplies the given homogeneous row vector with the full matrix.
    pub fn transform_vector4(&self, vector: Vec4) -> Vec4 {
        let d = &self.data;
        let r = vector.to_array();
        Vec4::new(
            row_dot_column(r, d, 0),
            row_dot_column(r, d, 1),
            row_dot_column(r, d, 2),
            row_dot_column(r, d, 3),
        )
    }

    /// Applies the full matrix to the point `(x, y, z, 1)` and performs the
    /// perspective division.
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        let clip = self.transform_vector4(point.extend(1.0));
        clip.truncate() / clip.w
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 16]> for TransformMatrix {
    fn from(data: [f32; 16]) -> Self {
        Self::from_array(data)
    }
}

impl From<TransformMatrix> for [f32; 16] {
    fn from(matrix: TransformMatrix) -> Self {
        matrix.data
    }
}

impl From<Mat4> for TransformMatrix {
    fn from(matrix: Mat4) -> Self {
        Self::from_glam(matrix)
    }
}

impl From<TransformMatrix> for Mat4 {
    fn from(matrix: TransformMatrix) -> Self {
        matrix.to_glam()
    }
}

/// Formats the elements rounded to three decimals as
/// `matrix3d(m0,m1,...,m15)`. Meant for debugging and snapshots, not for
/// parsing.
impl fmt::Display for TransformMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matrix3d(")?;
        for (i, &value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", round_to_thousandths(value))?;
        }
        write!(f, ")")
    }
}

impl_binop!(Add, add, TransformMatrix, TransformMatrix, TransformMatrix, |a, b| {
    let mut m = *a;
    m += b;
    m
});

impl_binop!(Sub, sub, TransformMatrix, TransformMatrix, TransformMatrix, |a, b| {
    let mut m = *a;
    m -= b;
    m
});

impl_binop!(Mul, mul, TransformMatrix, TransformMatrix, TransformMatrix, |a, b| {
    TransformMatrix::from_array(product(&a.data, &b.data))
});

impl_binop!(Mul, mul, TransformMatrix, f32, TransformMatrix, |a, b| {
    let mut m = *a;
    m *= *b;
    m
});

impl_binop!(Mul, mul, f32, TransformMatrix, TransformMatrix, |a, b| { b.mul(*a) });

impl_binop!(Mul, mul, Vec4, TransformMatrix, Vec4, |a, b| {
    b.transform_vector4(*a)
});

impl_binop_assign!(AddAssign, add_assign, TransformMatrix, TransformMatrix, |a, b| {
    for (lhs, rhs) in a.data.iter_mut().zip(b.data) {
        *lhs += rhs;
    }
});

impl_binop_assign!(SubAssign, sub_assign, TransformMatrix, TransformMatrix, |a, b| {
    for (lhs, rhs) in a.data.iter_mut().zip(b.data) {
        *lhs -= rhs;
    }
});

impl_binop_assign!(MulAssign, mul_assign, TransformMatrix, TransformMatrix, |a, b| {
    a.multiply(b);
});

impl_binop_assign!(MulAssign, mul_assign, TransformMatrix, f32, |a, b| {
    for element in &mut a.data {
        *element *= *b;
    }
});

impl_unary_op!(Neg, neg, TransformMatrix, TransformMatrix, |val| {
    *val * -1.0
});

impl_abs_diff_eq!(TransformMatrix, |a, b, epsilon| {
    a.data.as_slice().abs_diff_eq(b.data.as_slice(), epsilon)
});

impl_relative_eq!(TransformMatrix, |a, b, epsilon, max_relative| {
    a.data
        .as_slice()
        .relative_eq(b.data.as_slice(), epsilon, max_relative)
});

/// Row-major product of two 4x4 matrices.
pub(crate) fn product(a: &[f32; 16], b: &[f32; 16]) -> [f32; 16] {
    let mut r = [0.0; 16];
    for (i, row) in r.chunks_exact_mut(4).enumerate() {
        let a_row = [a[4 * i], a[4 * i + 1], a[4 * i + 2], a[4 * i + 3]];
        for (j, element) in row.iter_mut().enumerate() {
            *element = row_dot_column(a_row, b, j);
        }
    }
    r
}

#[inline]
fn row_dot_column(row: [f32; 4], m: &[f32; 16], column: usize) -> f32 {
    row[0] * m[column] + row[1] * m[column + 4] + row[2] * m[column + 8] + row[3] * m[column + 12]
}

fn element_index(row: usize, column: usize) -> Result<usize> {
    if row > 3 {
        Err(MatrixError::RowOutOfBounds { index: row })
    } else if column > 3 {
        Err(MatrixError::ColumnOutOfBounds { index: column })
    } else {
        Ok(4 * row + column)
    }
}

fn raw_data_window(len: usize, offset: usize) -> Option<std::ops::Range<usize>> {
    let end = offset.checked_add(16)?;
    (end <= len).then_some(offset..end)
}

fn round_to_thousandths(value: f32) -> f32 {
    let rounded = (value * 1000.0 + 0.5).floor() / 1000.0;
    // Avoids printing "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}
