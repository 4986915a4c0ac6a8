//! Multivariate normal sampling.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::warn;

use crate::convert::{to_array2, to_dmatrix};
use crate::error::LinalgError;

/// Draws i.i.d. vectors from `N(mean, cov)`.
///
/// Holds the mean and a square factor `A` with `A * A^T = cov`. The factor
/// is the Cholesky factor when `cov` is positive definite; singular but
/// positive semi-definite covariances fall back to the symmetric eigen
/// factor `V * diag(sqrt(max(lambda, 0)))`.
#[derive(Clone, Debug)]
pub struct MvnSampler {
    mean: Array1<f64>,
    factor: Array2<f64>,
}

impl MvnSampler {
    /// Builds a sampler for `N(mean, cov)`.
    ///
    /// `psd_tolerance` bounds how negative the smallest eigenvalue may be,
    /// relative to the largest eigenvalue magnitude (floored at 1), before
    /// the covariance is rejected.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LinalgError::NotSquare`] | `cov` is not square |
    /// | [`LinalgError::DimensionMismatch`] | `mean.len()` differs from the order of `cov` |
    /// | [`LinalgError::NonFinite`] | `mean` or `cov` holds NaN or infinity |
    /// | [`LinalgError::NotPositiveSemiDefinite`] | `cov` has a significantly negative eigenvalue |
    pub fn new(
        mean: ArrayView1<'_, f64>,
        cov: ArrayView2<'_, f64>,
        psd_tolerance: f64,
    ) -> Result<Self, LinalgError> {
        let (rows, cols) = cov.dim();
        if rows != cols {
            return Err(LinalgError::NotSquare { rows, cols });
        }
        if mean.len() != rows {
            return Err(LinalgError::DimensionMismatch {
                expected: rows,
                got: mean.len(),
            });
        }
        if mean.iter().chain(cov.iter()).any(|x| !x.is_finite()) {
            return Err(LinalgError::NonFinite);
        }
        if rows == 0 {
            return Ok(Self {
                mean: Array1::zeros(0),
                factor: Array2::zeros((0, 0)),
            });
        }

        let factor = match to_dmatrix(cov).cholesky() {
            Some(chol) => to_array2(&chol.l()),
            None => eigen_factor(cov, psd_tolerance)?,
        };

        Ok(Self {
            mean: mean.to_owned(),
            factor,
        })
    }

    /// Dimension of the distribution.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Returns the mean vector.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Returns the square factor `A` with `A * A^T = cov`.
    pub fn factor(&self) -> &Array2<f64> {
        &self.factor
    }

    /// Draws `size` vectors; returns an array of shape `(size, dim)`.
    pub fn sample<R: Rng>(&self, size: usize, rng: &mut R) -> Array2<f64> {
        let z: Array2<f64> =
            Array2::from_shape_fn((size, self.dim()), |_| StandardNormal.sample(rng));
        let mut draws = z.dot(&self.factor.t());
        draws += &self.mean;
        draws
    }
}

/// Square-root factor from the symmetric eigendecomposition.
fn eigen_factor(cov: ArrayView2<'_, f64>, psd_tolerance: f64) -> Result<Array2<f64>, LinalgError> {
    let eigen = to_dmatrix(cov).symmetric_eigen();
    let min_eigenvalue = eigen.eigenvalues.min();
    let scale = eigen.eigenvalues.amax().max(1.0);
    if min_eigenvalue < -psd_tolerance * scale {
        return Err(LinalgError::NotPositiveSemiDefinite { min_eigenvalue });
    }
    warn!(
        min_eigenvalue,
        "covariance is singular; sampling through its eigen factor"
    );

    let mut factor = eigen.eigenvectors;
    for (j, &lambda) in eigen.eigenvalues.iter().enumerate() {
        factor.column_mut(j).scale_mut(lambda.max(0.0).sqrt());
    }
    Ok(to_array2(&factor))
}
