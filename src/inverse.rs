//! Determinants and inversion.

use crate::{consts::INVERTIBILITY_THRESHOLD, matrix::TransformMatrix};

impl TransformMatrix {
    /// Computes the determinant of the full 4x4 matrix.
    pub fn determinant(&self) -> f32 {
        Minors::of(self.as_array()).determinant()
    }

    /// Computes the determinant of the upper-left 3x3 block.
    pub fn determinant_3x3(&self) -> f32 {
        let d = self.as_array();
        d[0] * (d[5] * d[10] - d[6] * d[9]) - d[1] * (d[4] * d[10] - d[6] * d[8])
            + d[2] * (d[4] * d[9] - d[5] * d[8])
    }

    /// Inverts the matrix in place using the adjugate formula.
    ///
    /// Returns `false` and leaves the matrix untouched if the magnitude of the
    /// determinant does not exceed
    /// [`INVERTIBILITY_THRESHOLD`](crate::consts::INVERTIBILITY_THRESHOLD).
    #[must_use = "the matrix is left unchanged when it is not invertible"]
    pub fn invert(&mut self) -> bool {
        let a = *self.as_array();
        let minors = Minors::of(&a);
        let det = minors.determinant();

        if det.is_nan() || det.abs() <= INVERTIBILITY_THRESHOLD {
            log::debug!("Skipping inversion of singular matrix (determinant {det})");
            return false;
        }

        let inv_det = det.recip();
        let Minors { s, c } = minors;

        *self.as_array_mut() = [
            (a[5] * c[5] - a[6] * c[4] + a[7] * c[3]) * inv_det,
            (-a[1] * c[5] + a[2] * c[4] - a[3] * c[3]) * inv_det,
            (a[13] * s[5] - a[14] * s[4] + a[15] * s[3]) * inv_det,
            (-a[9] * s[5] + a[10] * s[4] - a[11] * s[3]) * inv_det,
            (-a[4] * c[5] + a[6] * c[2] - a[7] * c[1]) * inv_det,
            (a[0] * c[5] - a[2] * c[2] + a[3] * c[1]) * inv_det,
            (-a[12] * s[5] + a[14] * s[2] - a[15] * s[1]) * inv_det,
            (a[8] * s[5] - a[10] * s[2] + a[11] * s[1]) * inv_det,
            (a[4] * c[4] - a[5] * c[2] + a[7] * c[0]) * inv_det,
            (-a[0] * c[4] + a[1] * c[2] - a[3] * c[0]) * inv_det,
            (a[12] * s[4] - a[13] * s[2] + a[15] * s[0]) * inv_det,
            (-a[8] * s[4] + a[9] * s[2] - a[11] * s[0]) * inv_det,
            (-a[4] * c[3] + a[5] * c[1] - a[6] * c[0]) * inv_det,
            (a[0] * c[3] - a[1] * c[1] + a[2] * c[0]) * inv_det,
            (-a[12] * s[3] + a[13] * s[1] - a[14] * s[0]) * inv_det,
            (a[8] * s[3] - a[9] * s[1] + a[10] * s[0]) * inv_det,
        ];

        true
    }

    /// Inverts only the upper-left 3x3 block in place by cofactors. The
    /// translation elements and the perspective column are left as they are.
    ///
    /// Returns `false` and leaves the matrix untouched if the block is
    /// singular.
    #[must_use = "the matrix is left unchanged when the 3x3 block is not invertible"]
    pub fn invert_3x3(&mut self) -> bool {
        let d = self.as_array_mut();

        let cofactors = [
            d[5] * d[10] - d[6] * d[9],
            d[2] * d[9] - d[1] * d[10],
            d[1] * d[6] - d[2] * d[5],
            d[6] * d[8] - d[4] * d[10],
            d[0] * d[10] - d[2] * d[8],
            d[2] * d[4] - d[0] * d[6],
            d[4] * d[9] - d[5] * d[8],
            d[1] * d[8] - d[0] * d[9],
            d[0] * d[5] - d[1] * d[4],
        ];

        let det = d[0] * cofactors[0] + d[1] * cofactors[3] + d[2] * cofactors[6];

        if det.is_nan() || det.abs() <= INVERTIBILITY_THRESHOLD {
            log::debug!("Skipping inversion of singular 3x3 block (determinant {det})");
            return false;
        }

        let inv_det = det.recip();

        for (row, chunk) in cofactors.chunks_exact(3).enumerate() {
            for (col, &cofactor) in chunk.iter().enumerate() {
                d[4 * row + col] = cofactor * inv_det;
            }
        }

        true
    }

    /// Returns the inverse of this matrix, or [`None`] if it is singular.
    pub fn inverted(&self) -> Option<Self> {
        let mut m = *self;
        m.invert().then_some(m)
    }

    /// Returns the inverse of the given matrix, or [`None`] if it is
    /// singular.
    pub fn inverse(matrix: &Self) -> Option<Self> {
        matrix.inverted()
    }
}

/// The 2x2 minors of the top two rows (`s`) and bottom two rows (`c`).
struct Minors {
    s: [f32; 6],
    c: [f32; 6],
}

impl Minors {
    fn of(a: &[f32; 16]) -> Self {
        Self {
            s: [
                a[0] * a[5] - a[4] * a[1],
                a[0] * a[6] - a[4] * a[2],
                a[0] * a[7] - a[4] * a[3],
                a[1] * a[6] - a[5] * a[2],
                a[1] * a[7] - a[5] * a[3],
                a[2] * a[7] - a[6] * a[3],
            ],
            c: [
                a[8] * a[13] - a[12] * a[9],
                a[8] * a[14] - a[12] * a[10],
                a[8] * a[15] - a[12] * a[11],
                a[9] * a[14] - a[13] * a[10],
                a[9] * a[15] - a[13] * a[11],
                a[10] * a[15] - a[14] * a[11],
            ],
        }
    }

    fn determinant(&self) -> f32 {
        let Self { s, c } = self;
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }
}
