//! # mlest-gaussian
//!
//! Multivariate normal estimation: a per-slot density fitter and a joint
//! maximum-likelihood estimator with conditioning on a subset of variables.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["samples (M x N)"] -->|"GaussianMle::new(x)?"| B["GaussianMle"]
//!     B -->|".estimate()"| C["GaussianParams"]
//!     B -->|".draw(size, rng)?"| D["joint draws"]
//!     B -->|".conditional_estimate(dep, vals)?"| E["ConditionalFit"]
//!     E -->|".conditional_draw(size, rng)?"| F["conditional draws"]
//!     G["samples (n x d [x K])"] -->|"MultivariateGaussianDensity::fit(x)?"| H["density"]
//!     H -->|".prob(x)?"| I["densities (n x K)"]
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Where | Meaning |
//! |--------|-------|---------|
//! | mu, Sigma | [`GaussianParams`] | joint mean, covariance `D^T D / M` |
//! | D, I | [`Partition`] | dependent and conditioning index sets |
//! | S_DD, S_DI, S_ID, S_II | [`GaussianMle::conditional_estimate()`] | covariance blocks |
//! | mu_cond | [`ConditionalFit::mean()`] | `mu_D + S_DI pinv(S_II) (x_I - mu_I)` |
//! | Sigma_cond | [`ConditionalFit::covariance()`] | `S_DD - S_DI pinv(S_II) S_ID` |
//! | p(x) | [`MultivariateGaussianDensity::prob()`] | `(2 pi)^(-d/2) det(S)^(-1/2) exp(-q/2)` |

mod config;
mod density;
mod error;
mod mle;
mod partition;

pub use config::MleConfig;
pub use density::MultivariateGaussianDensity;
pub use error::GaussianError;
pub use mle::{ConditionalFit, FitState, GaussianMle, GaussianParams};
pub use partition::Partition;
