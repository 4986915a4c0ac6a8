//! Configuration for Newton-Raphson fitting.

use crate::error::PoissonError;

/// Stopping rules for [`fit_newton`](crate::fit_newton).
///
/// # Example
///
/// ```
/// use mlest_poisson::NewtonConfig;
///
/// let config = NewtonConfig::new()
///     .with_tolerance(1e-8)
///     .with_max_iterations(50);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// Largest absolute coefficient change that counts as converged.
    tolerance: f64,
    /// Iteration cap.
    max_iterations: usize,
}

impl NewtonConfig {
    /// Creates a configuration with defaults `tolerance = 1e-3`,
    /// `max_iterations = 1000`.
    pub fn new() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 1000,
        }
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the tolerance is non-finite / non-positive or the
    /// iteration cap is zero.
    pub fn validate(&self) -> Result<(), PoissonError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(PoissonError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if self.max_iterations < 1 {
            return Err(PoissonError::InvalidMaxIterations {
                max_iterations: self.max_iterations,
            });
        }
        Ok(())
    }
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self::new()
    }
}
