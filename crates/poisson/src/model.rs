//! Poisson regression log-likelihood and its derivatives.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use statrs::function::gamma::ln_gamma;

use crate::error::PoissonError;

/// A Poisson GLM with log link, `y ~ Poisson(exp(X beta))`.
///
/// Holds the response `y` as an `n x 1` column, the design matrix `X`
/// (`n x k`), and the coefficients `beta` as a `k x 1` column. Every
/// method recomputes the fitted mean from the held coefficients; nothing
/// is cached or mutated.
///
/// # Example
///
/// ```
/// use mlest_poisson::PoissonRegression;
/// use ndarray::array;
///
/// let y = array![1.0, 0.0, 2.0];
/// let x = array![[1.0, 0.5], [1.0, -0.5], [1.0, 1.0]];
/// let beta = array![0.1, 0.2];
/// let model = PoissonRegression::new(y.view(), x.view(), beta.view()).unwrap();
///
/// assert_eq!(model.mu().dim(), (3, 1));
/// assert_eq!(model.gradient().dim(), (2, 1));
/// assert_eq!(model.hessian().dim(), (2, 2));
/// ```
#[derive(Clone, Debug)]
pub struct PoissonRegression {
    y: Array2<f64>,
    x: Array2<f64>,
    beta: Array2<f64>,
}

impl PoissonRegression {
    /// Builds a model from response counts, design matrix, and coefficients.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`PoissonError::EmptyDesign`] | `x` has no rows or no columns |
    /// | [`PoissonError::DimensionMismatch`] | `y` or `beta` length disagrees with `x` |
    /// | [`PoissonError::NonFiniteData`] | any input holds NaN or infinity |
    /// | [`PoissonError::NegativeResponse`] | some `y[i] < 0` |
    pub fn new(
        y: ArrayView1<'_, f64>,
        x: ArrayView2<'_, f64>,
        beta: ArrayView1<'_, f64>,
    ) -> Result<Self, PoissonError> {
        let (n, k) = x.dim();
        if n == 0 || k == 0 {
            return Err(PoissonError::EmptyDesign { rows: n, cols: k });
        }
        if y.len() != n {
            return Err(PoissonError::DimensionMismatch {
                field: "y",
                expected: n,
                got: y.len(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(PoissonError::NonFiniteData { field: "x" });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(PoissonError::NonFiniteData { field: "y" });
        }
        if let Some((index, &value)) = y.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(PoissonError::NegativeResponse { index, value });
        }
        let beta = Self::check_beta(beta, k)?;

        Ok(Self {
            y: y.to_owned().insert_axis(Axis(1)),
            x: x.to_owned(),
            beta,
        })
    }

    fn check_beta(beta: ArrayView1<'_, f64>, k: usize) -> Result<Array2<f64>, PoissonError> {
        if beta.len() != k {
            return Err(PoissonError::DimensionMismatch {
                field: "beta",
                expected: k,
                got: beta.len(),
            });
        }
        if beta.iter().any(|v| !v.is_finite()) {
            return Err(PoissonError::NonFiniteData { field: "beta" });
        }
        Ok(beta.to_owned().insert_axis(Axis(1)))
    }

    /// Returns a copy of this model with coefficients replaced by `beta`.
    ///
    /// # Errors
    ///
    /// [`PoissonError::DimensionMismatch`] or [`PoissonError::NonFiniteData`]
    /// for an invalid `beta`.
    pub fn with_beta(&self, beta: ArrayView1<'_, f64>) -> Result<Self, PoissonError> {
        let beta = Self::check_beta(beta, self.n_params())?;
        Ok(Self {
            y: self.y.clone(),
            x: self.x.clone(),
            beta,
        })
    }

    /// Number of observations `n`.
    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    /// Number of coefficients `k`.
    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Response column (`n x 1`).
    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    /// Design matrix (`n x k`).
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Coefficient column (`k x 1`).
    pub fn beta(&self) -> &Array2<f64> {
        &self.beta
    }

    /// Linear predictor `X beta` (`n x 1`).
    pub fn linear_predictor(&self) -> Array2<f64> {
        self.x.dot(&self.beta)
    }

    /// Fitted mean `exp(X beta)` (`n x 1`).
    ///
    /// A large linear predictor overflows to `+inf`; that is ordinary IEEE
    /// behaviour and not reported as an error.
    pub fn mu(&self) -> Array2<f64> {
        self.linear_predictor().mapv_into(f64::exp)
    }

    /// Poisson log-likelihood `sum(y * log(mu) - mu - log(y!))`.
    ///
    /// `log(mu)` is taken as the linear predictor itself and `log(y!)` as
    /// `ln_gamma(y + 1)`, so large counts do not overflow.
    pub fn log_likelihood(&self) -> f64 {
        let eta = self.linear_predictor();
        self.y
            .iter()
            .zip(eta.iter())
            .map(|(&y, &eta)| y * eta - eta.exp() - ln_gamma(y + 1.0))
            .sum()
    }

    /// Gradient of the log-likelihood, `X^T (y - mu)` (`k x 1`).
    pub fn gradient(&self) -> Array2<f64> {
        let residual = &self.y - &self.mu();
        self.x.t().dot(&residual)
    }

    /// Hessian of the log-likelihood, `-X^T (mu * X)` (`k x k`).
    ///
    /// `mu` scales each row of `X`. The result is negative semi-definite for
    /// every `beta`.
    pub fn hessian(&self) -> Array2<f64> {
        let weighted = &self.mu() * &self.x;
        -self.x.t().dot(&weighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn small_model() -> PoissonRegression {
        let y = array![1.0, 0.0, 3.0, 2.0];
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, -1.0]];
        let beta = array![0.2, 0.3];
        PoissonRegression::new(y.view(), x.view(), beta.view()).unwrap()
    }

    #[test]
    fn shapes_are_columns() {
        let model = small_model();
        assert_eq!(model.y().dim(), (4, 1));
        assert_eq!(model.beta().dim(), (2, 1));
        assert_eq!(model.n_obs(), 4);
        assert_eq!(model.n_params(), 2);
    }

    #[test]
    fn mu_is_exp_of_linear_predictor() {
        let model = small_model();
        let mu = model.mu();
        assert_relative_eq!(mu[[0, 0]], 0.2_f64.exp(), epsilon = 1e-12);
        assert_relative_eq!(mu[[2, 0]], 0.8_f64.exp(), epsilon = 1e-12);
        assert_relative_eq!(mu[[3, 0]], (-0.1_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn log_likelihood_matches_direct_sum() {
        let model = small_model();
        let factorials = [1.0_f64, 1.0, 6.0, 2.0];
        let mut expected = 0.0;
        for (i, &fact) in factorials.iter().enumerate() {
            let y = model.y()[[i, 0]];
            let mu = model.mu()[[i, 0]];
            expected += y * mu.ln() - mu - fact.ln();
        }
        assert_relative_eq!(model.log_likelihood(), expected, epsilon = 1e-10);
    }

    #[test]
    fn log_likelihood_handles_large_counts() {
        let y = array![500.0];
        let x = array![[1.0]];
        let beta = array![500.0_f64.ln()];
        let model = PoissonRegression::new(y.view(), x.view(), beta.view()).unwrap();
        let ll = model.log_likelihood();
        assert!(ll.is_finite());
        // Near the mode the pmf is about 1 / sqrt(2 pi 500).
        assert_relative_eq!(ll, -0.5 * (2.0 * std::f64::consts::PI * 500.0).ln(), epsilon = 1e-3);
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let model = small_model();
        let grad = model.gradient();
        let h = 1e-6;
        for j in 0..model.n_params() {
            let mut up = model.beta().column(0).to_owned();
            let mut down = up.clone();
            up[j] += h;
            down[j] -= h;
            let ll_up = model.with_beta(up.view()).unwrap().log_likelihood();
            let ll_down = model.with_beta(down.view()).unwrap().log_likelihood();
            let numeric = (ll_up - ll_down) / (2.0 * h);
            assert_relative_eq!(grad[[j, 0]], numeric, epsilon = 1e-5);
        }
    }

    #[test]
    fn hessian_matches_finite_difference_of_gradient() {
        let model = small_model();
        let hess = model.hessian();
        let h = 1e-6;
        for j in 0..model.n_params() {
            let mut up = model.beta().column(0).to_owned();
            let mut down = up.clone();
            up[j] += h;
            down[j] -= h;
            let g_up = model.with_beta(up.view()).unwrap().gradient();
            let g_down = model.with_beta(down.view()).unwrap().gradient();
            for i in 0..model.n_params() {
                let numeric = (g_up[[i, 0]] - g_down[[i, 0]]) / (2.0 * h);
                assert_relative_eq!(hess[[i, j]], numeric, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn hessian_is_symmetric() {
        let hess = small_model().hessian();
        assert_relative_eq!(hess[[0, 1]], hess[[1, 0]], epsilon = 1e-12);
    }

    #[test]
    fn overflow_is_not_an_error() {
        let y = array![1.0];
        let x = array![[1.0]];
        let beta = array![1000.0];
        let model = PoissonRegression::new(y.view(), x.view(), beta.view()).unwrap();
        assert!(model.mu()[[0, 0]].is_infinite());
        assert_eq!(model.log_likelihood(), f64::NEG_INFINITY);
    }

    #[test]
    fn rejects_empty_design() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = ndarray::Array1::<f64>::zeros(0);
        let err = PoissonRegression::new(y.view(), x.view(), array![0.0, 0.0].view()).unwrap_err();
        assert_eq!(err, PoissonError::EmptyDesign { rows: 0, cols: 2 });
    }

    #[test]
    fn rejects_length_mismatch() {
        let x = array![[1.0], [1.0]];
        let err = PoissonRegression::new(array![1.0].view(), x.view(), array![0.0].view())
            .unwrap_err();
        assert!(matches!(
            err,
            PoissonError::DimensionMismatch { field: "y", .. }
        ));

        let y = array![1.0, 2.0];
        let err = PoissonRegression::new(y.view(), x.view(), array![0.0, 1.0].view()).unwrap_err();
        assert!(matches!(
            err,
            PoissonError::DimensionMismatch { field: "beta", .. }
        ));
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        let x = array![[1.0], [1.0]];
        let err = PoissonRegression::new(array![1.0, -2.0].view(), x.view(), array![0.0].view())
            .unwrap_err();
        assert_eq!(
            err,
            PoissonError::NegativeResponse {
                index: 1,
                value: -2.0
            }
        );

        let err = PoissonRegression::new(array![1.0, f64::NAN].view(), x.view(), array![0.0].view())
            .unwrap_err();
        assert_eq!(err, PoissonError::NonFiniteData { field: "y" });
    }
}
