//! Error types for the mlest-gaussian crate.

use mlest_linalg::LinalgError;

/// Error type for all fallible operations in the mlest-gaussian crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaussianError {
    /// Returned when the sample matrix has no observations or no variables.
    #[error("sample matrix is empty ({n_obs} observations x {n_vars} variables)")]
    EmptyData {
        /// Number of observations.
        n_obs: usize,
        /// Number of variables.
        n_vars: usize,
    },

    /// Returned when there are too few samples for the estimator.
    #[error("insufficient data: got {n} samples, need at least {min}")]
    InsufficientData {
        /// Number of samples provided.
        n: usize,
        /// Minimum number of samples required.
        min: usize,
    },

    /// Returned when an input contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when an array has an unsupported number of dimensions.
    #[error("expected a 2-D or 3-D array, got {ndim} dimensions")]
    InvalidShape {
        /// Number of dimensions supplied.
        ndim: usize,
    },

    /// Returned when an input length or axis does not match the fitted model.
    #[error("{field} has size {got}, expected {expected}")]
    DimensionMismatch {
        /// Name of the mismatching input or axis.
        field: &'static str,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when the dependent and conditioning sets do not cover all variables.
    #[error(
        "invalid partition: {dependent} dependent + {independent} conditioning values != {n_vars} variables"
    )]
    InvalidPartition {
        /// Number of dependent indices supplied.
        dependent: usize,
        /// Number of conditioning values supplied.
        independent: usize,
        /// Number of variables in the model.
        n_vars: usize,
    },

    /// Returned when a dependent index is outside `0..n_vars`.
    #[error("variable index {index} out of bounds for {n_vars} variables")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of variables in the model.
        n_vars: usize,
    },

    /// Returned when a dependent index is listed twice.
    #[error("variable index {index} listed more than once")]
    DuplicateIndex {
        /// The repeated index.
        index: usize,
    },

    /// Returned when a conditional draw is requested before a conditional estimate.
    #[error("conditional distribution not estimated yet")]
    NotFitted,

    /// Returned when a covariance has zero, negative, or non-finite determinant,
    /// or cannot be inverted.
    #[error("covariance matrix for slot {slot} is singular")]
    SingularCovariance {
        /// Repeat slot whose covariance is singular.
        slot: usize,
    },

    /// Returned when an estimator setting is invalid.
    #[error("invalid configuration: {field} must be finite and non-negative, got {value}")]
    InvalidConfig {
        /// Name of the setting.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Linear algebra error.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_partition() {
        let err = GaussianError::InvalidPartition {
            dependent: 2,
            independent: 2,
            n_vars: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid partition: 2 dependent + 2 conditioning values != 3 variables"
        );
    }

    #[test]
    fn error_not_fitted() {
        assert_eq!(
            GaussianError::NotFitted.to_string(),
            "conditional distribution not estimated yet"
        );
    }

    #[test]
    fn error_singular_covariance() {
        let err = GaussianError::SingularCovariance { slot: 0 };
        assert_eq!(err.to_string(), "covariance matrix for slot 0 is singular");
    }

    #[test]
    fn error_dimension_mismatch() {
        let err = GaussianError::DimensionMismatch {
            field: "variables",
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "variables has size 2, expected 3");
    }

    #[test]
    fn error_linalg_transparent() {
        let err = GaussianError::from(LinalgError::NonFinite);
        assert_eq!(err.to_string(), "input contains non-finite values");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<GaussianError>();
    }
}
