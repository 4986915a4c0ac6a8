//! # mlest
//!
//! Classical maximum-likelihood estimators over dense `ndarray` data:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`linalg`] | inverse, pseudo-inverse, determinant, multivariate normal sampler |
//! | [`poisson`] | Poisson regression likelihood, gradient, Hessian and Newton fit |
//! | [`gaussian`] | Gaussian density fitter and joint/conditional Gaussian MLE |
//!
//! The root crate adds a TOML [`config`] layer and [`logging`] setup.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["MlestConfig::from_toml_str(text)?"] --> B[".newton_config()? / .mle_config()? / .rng()"]
//!     B --> C["fit_newton(&model, &cfg)?"]
//!     B --> D["GaussianMle::with_config(x, cfg)?"]
//!     D --> E[".conditional_estimate(dep, vals)? / .conditional_draw(n, rng)?"]
//! ```

pub mod config;
pub mod logging;

pub use mlest_gaussian as gaussian;
pub use mlest_linalg as linalg;
pub use mlest_poisson as poisson;

pub use config::{ConfigError, MlestConfig};
pub use mlest_gaussian::{
    ConditionalFit, FitState, GaussianError, GaussianMle, GaussianParams, MleConfig,
    MultivariateGaussianDensity, Partition,
};
pub use mlest_poisson::{NewtonConfig, NewtonFit, PoissonError, PoissonRegression, fit_newton};
