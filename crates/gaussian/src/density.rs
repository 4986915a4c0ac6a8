//! Batched multivariate normal density.

use std::f64::consts::PI;

use mlest_linalg::{determinant, inverse, rank};
use ndarray::{Array1, Array2, Array3, ArrayView3, ArrayViewD, Axis, Ix3};
use tracing::debug;

use crate::error::GaussianError;

/// Relative singular-value cutoff below which a slot covariance is treated
/// as singular.
const SINGULAR_RCOND: f64 = 1e-12;

/// Multivariate normal density fitted from a batch of samples.
///
/// Input arrays are `batch x variables` or `batch x variables x repeats`;
/// a 2-D input is treated as having a single repeat slot. The mean is
/// taken over the batch axis for every `(variable, slot)` pair, and one
/// `variables x variables` covariance is estimated per repeat slot with the
/// unbiased `n - 1` divisor. Slots are never pooled.
///
/// A density only exists in fitted form: build it with
/// [`MultivariateGaussianDensity::fit()`] or
/// [`MultivariateGaussianDensity::new()`].
///
/// # Example
///
/// ```
/// use mlest_gaussian::MultivariateGaussianDensity;
/// use ndarray::array;
///
/// let x = array![[1.0, 0.0], [-1.0, 0.0], [0.0, 2.0], [0.0, -2.0]];
/// let density = MultivariateGaussianDensity::fit(x.view().into_dyn()).unwrap();
/// let p = density.prob(array![[0.0, 0.0]].view().into_dyn()).unwrap();
/// assert_eq!(p.dim(), (1, 1));
/// assert!(p[[0, 0]] > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct MultivariateGaussianDensity {
    /// `variables x slots`.
    mean: Array2<f64>,
    /// `slots x variables x variables`.
    covariance: Array3<f64>,
}

/// Views a 2-D or 3-D array as `batch x variables x slots`.
fn as_batch(x: ArrayViewD<'_, f64>) -> Result<ArrayView3<'_, f64>, GaussianError> {
    let ndim = x.ndim();
    let x = match ndim {
        2 => x.insert_axis(Axis(2)),
        3 => x,
        _ => return Err(GaussianError::InvalidShape { ndim }),
    };
    x.into_dimensionality::<Ix3>()
        .map_err(|_| GaussianError::InvalidShape { ndim })
}

impl MultivariateGaussianDensity {
    /// Fits mean and covariance from a batch of samples.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::InvalidShape`] | `x` is not 2-D or 3-D |
    /// | [`GaussianError::InsufficientData`] | fewer than 2 samples in the batch |
    /// | [`GaussianError::EmptyData`] | no variables or no repeat slots |
    /// | [`GaussianError::NonFiniteData`] | NaN or infinity in `x` |
    #[tracing::instrument(skip_all, fields(shape = ?x.shape()))]
    pub fn fit(x: ArrayViewD<'_, f64>) -> Result<Self, GaussianError> {
        let x = as_batch(x)?;
        let (n, d, slots) = x.dim();
        if n < 2 {
            return Err(GaussianError::InsufficientData { n, min: 2 });
        }
        if d == 0 || slots == 0 {
            return Err(GaussianError::EmptyData {
                n_obs: n,
                n_vars: d,
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(GaussianError::NonFiniteData);
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or(GaussianError::InsufficientData { n, min: 2 })?;
        let centered = &x - &mean;

        let mut covariance = Array3::zeros((slots, d, d));
        for (slot, mut cov) in covariance.outer_iter_mut().enumerate() {
            let c = centered.index_axis(Axis(2), slot);
            cov.assign(&(c.t().dot(&c) / (n - 1) as f64));
        }

        debug!(n, d, slots, "fitted multivariate normal density");
        Ok(Self { mean, covariance })
    }

    /// Builds a single-slot density from known parameters.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::EmptyData`] | `mean` is empty |
    /// | [`GaussianError::DimensionMismatch`] | `covariance` is not `d x d` for `d = mean.len()` |
    /// | [`GaussianError::NonFiniteData`] | NaN or infinity in either input |
    pub fn new(mean: Array1<f64>, covariance: Array2<f64>) -> Result<Self, GaussianError> {
        let d = mean.len();
        if d == 0 {
            return Err(GaussianError::EmptyData {
                n_obs: 0,
                n_vars: 0,
            });
        }
        for (field, got) in [
            ("covariance rows", covariance.nrows()),
            ("covariance columns", covariance.ncols()),
        ] {
            if got != d {
                return Err(GaussianError::DimensionMismatch {
                    field,
                    expected: d,
                    got,
                });
            }
        }
        if mean.iter().chain(covariance.iter()).any(|v| !v.is_finite()) {
            return Err(GaussianError::NonFiniteData);
        }
        Ok(Self {
            mean: mean.insert_axis(Axis(1)),
            covariance: covariance.insert_axis(Axis(0)),
        })
    }

    /// Number of variables.
    pub fn n_vars(&self) -> usize {
        self.mean.nrows()
    }

    /// Number of repeat slots.
    pub fn n_slots(&self) -> usize {
        self.mean.ncols()
    }

    /// Mean, shape `variables x slots`.
    pub fn mean(&self) -> &Array2<f64> {
        &self.mean
    }

    /// Covariance of one repeat slot, or `None` if `slot` is out of range.
    pub fn covariance(&self, slot: usize) -> Option<Array2<f64>> {
        (slot < self.n_slots()).then(|| self.covariance.index_axis(Axis(0), slot).to_owned())
    }

    /// Evaluates the density at every query row and slot.
    ///
    /// `x` has the same layout as the fitting input; the result has shape
    /// `batch x slots`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::InvalidShape`] | `x` is not 2-D or 3-D |
    /// | [`GaussianError::DimensionMismatch`] | variable or slot count differs from the fit |
    /// | [`GaussianError::NonFiniteData`] | NaN or infinity in `x` |
    /// | [`GaussianError::SingularCovariance`] | a slot covariance is numerically rank deficient |
    pub fn prob(&self, x: ArrayViewD<'_, f64>) -> Result<Array2<f64>, GaussianError> {
        self.evaluate(x, |norm, quad| norm * (-0.5 * quad).exp())
    }

    /// Log of [`prob`](Self::prob), with the same shape and error contract.
    pub fn log_prob(&self, x: ArrayViewD<'_, f64>) -> Result<Array2<f64>, GaussianError> {
        self.evaluate(x, |norm, quad| norm.ln() - 0.5 * quad)
    }

    /// Applies `f(normalising constant, Mahalanobis quadratic form)` to each
    /// query point.
    fn evaluate(
        &self,
        x: ArrayViewD<'_, f64>,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Array2<f64>, GaussianError> {
        let x = as_batch(x)?;
        let (m, d, slots) = x.dim();
        if d != self.n_vars() {
            return Err(GaussianError::DimensionMismatch {
                field: "variables",
                expected: self.n_vars(),
                got: d,
            });
        }
        if slots != self.n_slots() {
            return Err(GaussianError::DimensionMismatch {
                field: "repeats",
                expected: self.n_slots(),
                got: slots,
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(GaussianError::NonFiniteData);
        }

        let mut out = Array2::zeros((m, slots));
        for slot in 0..slots {
            let cov = self.covariance.index_axis(Axis(0), slot);
            if rank(cov, SINGULAR_RCOND) < d {
                return Err(GaussianError::SingularCovariance { slot });
            }
            let det = determinant(cov)?;
            if !det.is_finite() || det <= 0.0 {
                return Err(GaussianError::SingularCovariance { slot });
            }
            let precision =
                inverse(cov).map_err(|_| GaussianError::SingularCovariance { slot })?;
            let norm = (2.0 * PI).powf(-(d as f64) / 2.0) * det.powf(-0.5);

            let mu = self.mean.column(slot);
            let points = x.index_axis(Axis(2), slot);
            for (i, point) in points.outer_iter().enumerate() {
                let diff = &point - &mu;
                let quad = diff.dot(&precision.dot(&diff));
                out[[i, slot]] = f(norm, quad);
            }
        }
        Ok(out)
    }
}
