//! # mlest-linalg
//!
//! Dense linear algebra used by the mlest estimators. Storage stays in
//! `ndarray`; decompositions run in `nalgebra` behind the functions below.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`inverse`] | strict inverse (LU) |
//! | [`pinv`] | Moore-Penrose pseudo-inverse (SVD) |
//! | [`determinant`] | determinant |
//! | [`solve`] | linear system `A x = b` |
//! | [`MvnSampler`] | i.i.d. draws from `N(mean, cov)` |
//!
//! ```
//! use mlest_linalg::{DEFAULT_RCOND, pinv};
//! use ndarray::array;
//!
//! let a = array![[2.0, 0.0], [0.0, 0.0]];
//! let p = pinv(a.view(), DEFAULT_RCOND);
//! assert!((p[[0, 0]] - 0.5).abs() < 1e-12);
//! assert!(p[[1, 1]].abs() < 1e-12);
//! ```

pub mod convert;
mod error;
mod mvn;
mod ops;

pub use error::LinalgError;
pub use mvn::MvnSampler;
pub use ops::{DEFAULT_RCOND, determinant, inverse, pinv, rank, solve};
