//! Conversions between `ndarray` (storage) and `nalgebra` (decompositions).

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Copies a 2-D view into a `DMatrix`, whatever its memory layout.
pub fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copies a 1-D view into a `DVector`.
pub fn to_dvector(v: ArrayView1<'_, f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

/// Copies a `DMatrix` into an owned `Array2`.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    let (nrows, ncols) = m.shape();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| m[(i, j)])
}

/// Copies a `DVector` into an owned `Array1`.
pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_iter(v.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn matrix_round_trip_preserves_layout() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = to_dmatrix(a.view());
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(to_array2(&m), a);
    }

    #[test]
    fn transposed_view_is_copied_logically() {
        let a = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let m = to_dmatrix(a.t());
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 5.0);
        assert_eq!(m[(1, 0)], 2.0);
    }

    #[test]
    fn vector_round_trip() {
        let v = array![1.5, -2.0, 0.25];
        assert_eq!(to_array1(&to_dvector(v.view())), v);
    }
}
