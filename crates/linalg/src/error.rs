//! Error types for the mlest-linalg crate.

/// Error type for all fallible operations in the mlest-linalg crate.
///
/// Covers shape validation and numerical failures of the dense
/// decompositions used by the estimators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    /// Returned when an operation requires a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when operand dimensions do not agree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a matrix cannot be inverted or a system has no unique solution.
    #[error("matrix is singular")]
    Singular,

    /// Returned when a covariance matrix has a significantly negative eigenvalue.
    #[error("covariance is not positive semi-definite (min eigenvalue {min_eigenvalue})")]
    NotPositiveSemiDefinite {
        /// Smallest eigenvalue found.
        min_eigenvalue: f64,
    },

    /// Returned when an input contains NaN or infinite values.
    #[error("input contains non-finite values")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_not_square() {
        let err = LinalgError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(err.to_string(), "matrix must be square, got 2x3");
    }

    #[test]
    fn error_dimension_mismatch() {
        let err = LinalgError::DimensionMismatch {
            expected: 3,
            got: 4,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 4");
    }

    #[test]
    fn error_singular() {
        assert_eq!(LinalgError::Singular.to_string(), "matrix is singular");
    }

    #[test]
    fn error_not_psd() {
        let err = LinalgError::NotPositiveSemiDefinite {
            min_eigenvalue: -1.5,
        };
        assert_eq!(
            err.to_string(),
            "covariance is not positive semi-definite (min eigenvalue -1.5)"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<LinalgError>();
    }
}
