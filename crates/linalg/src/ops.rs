//! Dense matrix operations on `ndarray` inputs.
//!
//! Each function converts to `nalgebra`, runs the decomposition, and
//! converts back, so callers never handle `nalgebra` types.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::convert::{to_array1, to_array2, to_dmatrix, to_dvector};
use crate::error::LinalgError;

/// Default relative cutoff for [`pinv`], matching the usual LAPACK-backed
/// pseudo-inverse convention.
pub const DEFAULT_RCOND: f64 = 1e-15;

fn ensure_square(a: &ArrayView2<'_, f64>) -> Result<usize, LinalgError> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Inverts a square matrix.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LinalgError::NotSquare`] | `a` is not square |
/// | [`LinalgError::Singular`] | LU pivot is zero or the inverse is non-finite |
pub fn inverse(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, LinalgError> {
    let n = ensure_square(&a)?;
    if n == 0 {
        return Ok(Array2::zeros((0, 0)));
    }
    let inv = to_dmatrix(a).try_inverse().ok_or(LinalgError::Singular)?;
    if inv.iter().any(|x| !x.is_finite()) {
        return Err(LinalgError::Singular);
    }
    Ok(to_array2(&inv))
}

/// Moore-Penrose pseudo-inverse via SVD.
///
/// Singular values at or below `rcond * max(singular values)` are treated
/// as zero. An `m x n` input yields an `n x m` result; empty inputs give an
/// empty result of the transposed shape.
pub fn pinv(a: ArrayView2<'_, f64>, rcond: f64) -> Array2<f64> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Array2::zeros((cols, rows));
    }

    let svd = to_dmatrix(a).svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        // Both factors were requested, so this branch only guards the API.
        return Array2::zeros((cols, rows));
    };
    let s = svd.singular_values;
    let cutoff = rcond * s.max();

    // V * S^+ * U^T, scaling the rows of U^T by the inverted singular values.
    let mut ut = u.transpose();
    for (k, &sigma) in s.iter().enumerate() {
        let scale = if sigma > cutoff { 1.0 / sigma } else { 0.0 };
        ut.row_mut(k).scale_mut(scale);
    }
    to_array2(&(v_t.transpose() * ut))
}

/// Numerical rank: the number of singular values above
/// `rcond * max(singular values)`. Empty matrices have rank 0.
pub fn rank(a: ArrayView2<'_, f64>, rcond: f64) -> usize {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return 0;
    }
    let s = to_dmatrix(a).singular_values();
    let cutoff = rcond * s.max();
    s.iter().filter(|&&sigma| sigma > cutoff).count()
}

/// Determinant of a square matrix (1.0 for the empty matrix).
///
/// # Errors
///
/// Returns [`LinalgError::NotSquare`] if `a` is not square.
pub fn determinant(a: ArrayView2<'_, f64>) -> Result<f64, LinalgError> {
    let n = ensure_square(&a)?;
    if n == 0 {
        return Ok(1.0);
    }
    Ok(to_dmatrix(a).determinant())
}

/// Solves `a * x = b` by LU decomposition.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LinalgError::NotSquare`] | `a` is not square |
/// | [`LinalgError::DimensionMismatch`] | `b.len()` differs from the order of `a` |
/// | [`LinalgError::Singular`] | no unique finite solution |
pub fn solve(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> Result<Array1<f64>, LinalgError> {
    let n = ensure_square(&a)?;
    if b.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            got: b.len(),
        });
    }
    if n == 0 {
        return Ok(Array1::zeros(0));
    }
    let x = to_dmatrix(a)
        .lu()
        .solve(&to_dvector(b))
        .ok_or(LinalgError::Singular)?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(LinalgError::Singular);
    }
    Ok(to_array1(&x))
}
