//! TOML configuration for the estimators.

use mlest_gaussian::{GaussianError, MleConfig};
use mlest_poisson::{NewtonConfig, PoissonError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::debug;

/// Error raised while loading a [`MlestConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed or has unknown keys.
    #[error("failed to parse TOML config: {0}")]
    Parse(String),

    /// The `[newton]` table holds an invalid setting.
    #[error(transparent)]
    Newton(#[from] PoissonError),

    /// The `[gaussian]` table holds an invalid setting.
    #[error(transparent)]
    Gaussian(#[from] GaussianError),
}

/// Top-level mlest configuration.
///
/// Every table and key is optional; missing values take the estimator
/// defaults.
///
/// ```toml
/// seed = 42
///
/// [newton]
/// tolerance = 1e-6
/// max_iterations = 50
///
/// [gaussian]
/// pinv_rcond = 1e-12
/// psd_tolerance = 1e-8
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MlestConfig {
    /// Global RNG seed. When absent, [`rng()`](Self::rng) seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Newton-Raphson settings for Poisson regression.
    #[serde(default)]
    pub newton: NewtonToml,

    /// Gaussian MLE settings.
    #[serde(default)]
    pub gaussian: GaussianToml,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewtonToml {
    #[serde(default = "default_newton_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for NewtonToml {
    fn default() -> Self {
        Self {
            tolerance: default_newton_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_newton_tolerance() -> f64 {
    NewtonConfig::default().tolerance()
}
fn default_max_iterations() -> usize {
    NewtonConfig::default().max_iterations()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaussianToml {
    #[serde(default = "default_pinv_rcond")]
    pub pinv_rcond: f64,
    #[serde(default = "default_psd_tolerance")]
    pub psd_tolerance: f64,
}

impl Default for GaussianToml {
    fn default() -> Self {
        Self {
            pinv_rcond: default_pinv_rcond(),
            psd_tolerance: default_psd_tolerance(),
        }
    }
}

fn default_pinv_rcond() -> f64 {
    MleConfig::default().pinv_rcond()
}
fn default_psd_tolerance() -> f64 {
    MleConfig::default().psd_tolerance()
}

impl MlestConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ConfigError::Parse`] | malformed TOML, wrong types, or unknown keys |
    /// | [`ConfigError::Newton`] | non-positive tolerance or zero iteration cap |
    /// | [`ConfigError::Gaussian`] | negative or non-finite Gaussian setting |
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.newton_config()?;
        config.mle_config()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Newton-Raphson settings as a validated [`NewtonConfig`].
    pub fn newton_config(&self) -> Result<NewtonConfig, PoissonError> {
        let config = NewtonConfig::new()
            .with_tolerance(self.newton.tolerance)
            .with_max_iterations(self.newton.max_iterations);
        config.validate()?;
        Ok(config)
    }

    /// Gaussian MLE settings as a validated [`MleConfig`].
    pub fn mle_config(&self) -> Result<MleConfig, GaussianError> {
        let config = MleConfig::new()
            .with_pinv_rcond(self.gaussian.pinv_rcond)
            .with_psd_tolerance(self.gaussian.psd_tolerance);
        config.validate()?;
        Ok(config)
    }

    /// Random number generator seeded from `seed`, or from the OS when unset.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
