//! Newton-Raphson maximisation of the Poisson log-likelihood.

use mlest_linalg::{LinalgError, solve};
use ndarray::{Array1, ArrayView1};
use tracing::{debug, trace};

use crate::config::NewtonConfig;
use crate::error::PoissonError;
use crate::model::PoissonRegression;

/// Result of [`fit_newton`]: the model at the maximum-likelihood
/// coefficients plus iteration diagnostics.
#[derive(Clone, Debug)]
pub struct NewtonFit {
    model: PoissonRegression,
    iterations: usize,
}

impl NewtonFit {
    /// The regression model holding the fitted coefficients.
    pub fn model(&self) -> &PoissonRegression {
        &self.model
    }

    /// Fitted coefficients.
    pub fn beta(&self) -> ArrayView1<'_, f64> {
        self.model.beta().column(0)
    }

    /// Number of Newton steps taken.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Log-likelihood at the fitted coefficients.
    pub fn log_likelihood(&self) -> f64 {
        self.model.log_likelihood()
    }

    /// Largest absolute gradient component at the fitted coefficients.
    pub fn gradient_norm(&self) -> f64 {
        max_abs(self.model.gradient().iter())
    }
}

fn max_abs<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.fold(0.0, |acc, v| acc.max(v.abs()))
}

/// Maximises the log-likelihood of `model` by Newton-Raphson, starting from
/// its current coefficients.
///
/// Each step solves `H * delta = G` and updates `beta <- beta - delta`.
/// Iteration stops once `max|delta| < tolerance`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`PoissonError::InvalidTolerance`] | non-positive or non-finite tolerance |
/// | [`PoissonError::InvalidMaxIterations`] | zero iteration cap |
/// | [`PoissonError::SingularHessian`] | the Hessian cannot be solved (e.g. collinear design) |
/// | [`PoissonError::Diverged`] | the gradient, Hessian, or coefficients become non-finite |
/// | [`PoissonError::NotConverged`] | `max_iterations` steps without convergence |
#[tracing::instrument(skip_all, fields(n_obs = model.n_obs(), n_params = model.n_params()))]
pub fn fit_newton(
    model: &PoissonRegression,
    config: &NewtonConfig,
) -> Result<NewtonFit, PoissonError> {
    config.validate()?;

    let mut current = model.clone();
    for iteration in 1..=config.max_iterations() {
        let gradient = current.gradient().column(0).to_owned();
        let hessian = current.hessian();
        if gradient.iter().chain(hessian.iter()).any(|v| !v.is_finite()) {
            return Err(PoissonError::Diverged { iteration });
        }

        let delta = solve(hessian.view(), gradient.view()).map_err(|err| match err {
            LinalgError::Singular => PoissonError::SingularHessian { iteration },
            other => PoissonError::from(other),
        })?;
        let beta: Array1<f64> = &current.beta().column(0) - &delta;
        if beta.iter().any(|b| !b.is_finite()) {
            return Err(PoissonError::Diverged { iteration });
        }

        let change = max_abs(delta.iter());
        trace!(iteration, change, "newton step");
        current = current.with_beta(beta.view())?;

        if change < config.tolerance() {
            debug!(
                iteration,
                log_likelihood = current.log_likelihood(),
                "newton iteration converged"
            );
            return Ok(NewtonFit {
                model: current,
                iterations: iteration,
            });
        }
    }

    Err(PoissonError::NotConverged {
        iterations: config.max_iterations(),
    })
}
