//! # mlest-poisson
//!
//! Poisson regression (log link) by maximum likelihood.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["PoissonRegression::new(y, X, beta)?"] --> B[".mu() / .log_likelihood()"]
//!     A --> C[".gradient() / .hessian()"]
//!     A -->|"fit_newton(&model, &config)?"| D["NewtonFit"]
//!     D --> E[".beta() / .log_likelihood()"]
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Method | Meaning |
//! |--------|--------|---------|
//! | mu | [`PoissonRegression::mu()`] | fitted mean `exp(X beta)` |
//! | logL | [`PoissonRegression::log_likelihood()`] | `sum(y log mu - mu - log y!)` |
//! | G | [`PoissonRegression::gradient()`] | `X^T (y - mu)` |
//! | H | [`PoissonRegression::hessian()`] | `-X^T (mu * X)` |

mod config;
mod error;
mod model;
mod newton;

pub use config::NewtonConfig;
pub use error::PoissonError;
pub use model::PoissonRegression;
pub use newton::{NewtonFit, fit_newton};
