//! Error types for the mlest-poisson crate.

use mlest_linalg::LinalgError;

/// Error type for all fallible operations in the mlest-poisson crate.
///
/// Covers input validation for the regression model and failures of the
/// Newton-Raphson maximiser.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoissonError {
    /// Returned when the design matrix has no rows or no columns.
    #[error("design matrix is empty ({rows}x{cols})")]
    EmptyDesign {
        /// Number of rows in the design matrix.
        rows: usize,
        /// Number of columns in the design matrix.
        cols: usize,
    },

    /// Returned when `y` or `beta` does not match the design matrix.
    #[error("{field} has length {got}, expected {expected}")]
    DimensionMismatch {
        /// Name of the offending input.
        field: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when any input contains NaN or infinity.
    #[error("{field} contains non-finite values")]
    NonFiniteData {
        /// Name of the offending input.
        field: &'static str,
    },

    /// Returned when a response count is negative.
    #[error("response must be non-negative, got {value} at index {index}")]
    NegativeResponse {
        /// Index of the first negative response.
        index: usize,
        /// The negative value.
        value: f64,
    },

    /// Returned when the Newton tolerance is not finite and positive.
    #[error("tolerance must be finite and positive, got {tolerance}")]
    InvalidTolerance {
        /// The invalid tolerance.
        tolerance: f64,
    },

    /// Returned when the Newton iteration cap is zero.
    #[error("max_iterations must be >= 1, got {max_iterations}")]
    InvalidMaxIterations {
        /// The invalid iteration cap.
        max_iterations: usize,
    },

    /// Returned when the Hessian cannot be solved against the gradient.
    #[error("Hessian is singular at iteration {iteration}")]
    SingularHessian {
        /// Iteration at which the solve failed (1-based).
        iteration: usize,
    },

    /// Returned when the coefficients become non-finite.
    #[error("Newton iteration diverged at iteration {iteration}")]
    Diverged {
        /// Iteration at which non-finite coefficients appeared (1-based).
        iteration: usize,
    },

    /// Returned when the iteration cap is reached before convergence.
    #[error("Newton iteration did not converge in {iterations} iterations")]
    NotConverged {
        /// Number of iterations performed.
        iterations: usize,
    },

    /// Linear algebra error.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}
