//! Configuration for the Gaussian MLE estimator.

use mlest_linalg::DEFAULT_RCOND;

use crate::error::GaussianError;

/// Numerical settings for [`GaussianMle`](crate::GaussianMle).
///
/// # Example
///
/// ```
/// use mlest_gaussian::MleConfig;
///
/// let config = MleConfig::new().with_pinv_rcond(1e-12);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MleConfig {
    /// Relative singular-value cutoff for the pseudo-inverse of the
    /// conditioning block.
    pinv_rcond: f64,
    /// Relative tolerance for negative eigenvalues when sampling.
    psd_tolerance: f64,
}

impl MleConfig {
    /// Creates a configuration with defaults `pinv_rcond = 1e-15`,
    /// `psd_tolerance = 1e-8`.
    pub fn new() -> Self {
        Self {
            pinv_rcond: DEFAULT_RCOND,
            psd_tolerance: 1e-8,
        }
    }

    /// Sets the pseudo-inverse cutoff.
    pub fn with_pinv_rcond(mut self, pinv_rcond: f64) -> Self {
        self.pinv_rcond = pinv_rcond;
        self
    }

    /// Sets the sampling PSD tolerance.
    pub fn with_psd_tolerance(mut self, psd_tolerance: f64) -> Self {
        self.psd_tolerance = psd_tolerance;
        self
    }

    /// Returns the pseudo-inverse cutoff.
    pub fn pinv_rcond(&self) -> f64 {
        self.pinv_rcond
    }

    /// Returns the sampling PSD tolerance.
    pub fn psd_tolerance(&self) -> f64 {
        self.psd_tolerance
    }

    /// Validates this configuration.
    ///
    /// Both settings must be finite and non-negative.
    pub fn validate(&self) -> Result<(), GaussianError> {
        for (field, value) in [
            ("pinv_rcond", self.pinv_rcond),
            ("psd_tolerance", self.psd_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GaussianError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

impl Default for MleConfig {
    fn default() -> Self {
        Self::new()
    }
}
