//! Joint and conditional Gaussian maximum-likelihood estimation.

use mlest_linalg::{MvnSampler, pinv};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use tracing::info;

use crate::config::MleConfig;
use crate::error::GaussianError;
use crate::partition::Partition;

/// Lifecycle of a [`GaussianMle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitState {
    /// No parameters estimated yet.
    Unfitted,
    /// Joint mean and covariance estimated.
    Fitted,
    /// Joint and conditional parameters estimated.
    ConditionallyFitted,
}

/// Mean vector and covariance matrix of a multivariate normal.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianParams {
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

impl GaussianParams {
    /// Mean vector.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Covariance matrix.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Number of variables.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}

/// Conditional distribution of the dependent variables given fixed values
/// of the conditioning variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalFit {
    partition: Partition,
    given: Array1<f64>,
    params: GaussianParams,
}

impl ConditionalFit {
    /// The variable split this fit was computed for.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Realised values of the conditioning variables, in ascending index order.
    pub fn given(&self) -> &Array1<f64> {
        &self.given
    }

    /// Conditional mean, one entry per dependent variable in ascending index order.
    pub fn mean(&self) -> &Array1<f64> {
        self.params.mean()
    }

    /// Conditional covariance (Schur complement).
    pub fn covariance(&self) -> &Array2<f64> {
        self.params.covariance()
    }

    /// Conditional mean and covariance together.
    pub fn params(&self) -> &GaussianParams {
        &self.params
    }
}

/// Maximum-likelihood estimator for a multivariate normal, with
/// conditional estimation on a partition of the variables.
///
/// Owns an `observations x variables` sample matrix. The joint fit uses the
/// per-variable mean and the biased covariance `D^T D / M` (divisor `M`, the
/// number of observations).
///
/// # State Machine
///
/// ```mermaid
/// graph LR
///     A["Unfitted"] -->|".estimate()"| B["Fitted"]
///     A -->|".draw() (auto-fit)"| B
///     A -->|".conditional_estimate() (auto-fit)"| C["ConditionallyFitted"]
///     B -->|".conditional_estimate()"| C
///     C -->|".conditional_estimate() (new partition)"| C
/// ```
///
/// [`draw()`](Self::draw) and [`conditional_estimate()`](Self::conditional_estimate)
/// run [`estimate()`](Self::estimate) if nothing has been fitted yet; that
/// auto-fit is the only implicit side effect in the API.
/// [`conditional_draw()`](Self::conditional_draw) never fits anything.
///
/// # Example
///
/// ```
/// use mlest_gaussian::{FitState, GaussianMle};
/// use ndarray::array;
///
/// let samples = array![[1.0, 2.0], [2.0, 3.5], [3.0, 6.5], [4.0, 8.0]];
/// let mut mle = GaussianMle::new(samples.view()).unwrap();
/// mle.estimate();
/// assert_eq!(mle.state(), FitState::Fitted);
///
/// let cond = mle.conditional_estimate(&[1], &[2.5]).unwrap();
/// assert_eq!(cond.mean().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct GaussianMle {
    samples: Array2<f64>,
    config: MleConfig,
    params: Option<GaussianParams>,
    conditional: Option<ConditionalFit>,
}

impl GaussianMle {
    /// Creates an unfitted estimator with the default [`MleConfig`].
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::EmptyData`] | no observations or no variables |
    /// | [`GaussianError::NonFiniteData`] | NaN or infinity in `samples` |
    pub fn new(samples: ArrayView2<'_, f64>) -> Result<Self, GaussianError> {
        Self::with_config(samples, MleConfig::default())
    }

    /// Creates an unfitted estimator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// As [`new()`](Self::new), plus [`GaussianError::InvalidConfig`].
    pub fn with_config(
        samples: ArrayView2<'_, f64>,
        config: MleConfig,
    ) -> Result<Self, GaussianError> {
        config.validate()?;
        let (n_obs, n_vars) = samples.dim();
        if n_obs == 0 || n_vars == 0 {
            return Err(GaussianError::EmptyData { n_obs, n_vars });
        }
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(GaussianError::NonFiniteData);
        }
        Ok(Self {
            samples: samples.to_owned(),
            config,
            params: None,
            conditional: None,
        })
    }

    /// Number of observations `M`.
    pub fn n_obs(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of variables `N`.
    pub fn n_vars(&self) -> usize {
        self.samples.ncols()
    }

    /// The owned sample matrix.
    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    /// Numerical settings.
    pub fn config(&self) -> &MleConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FitState {
        match (&self.params, &self.conditional) {
            (None, _) => FitState::Unfitted,
            (Some(_), None) => FitState::Fitted,
            (Some(_), Some(_)) => FitState::ConditionallyFitted,
        }
    }

    /// Joint parameters, if estimated.
    pub fn params(&self) -> Option<&GaussianParams> {
        self.params.as_ref()
    }

    /// Most recent conditional fit, if any.
    pub fn conditional(&self) -> Option<&ConditionalFit> {
        self.conditional.as_ref()
    }

    /// Estimates the joint mean and covariance.
    ///
    /// Recomputes from the samples on every call and always yields the same
    /// result. An existing conditional fit stays valid because the samples
    /// never change.
    #[tracing::instrument(skip(self), fields(n_obs = self.n_obs(), n_vars = self.n_vars()))]
    pub fn estimate(&mut self) -> &GaussianParams {
        let m = self.n_obs() as f64;
        let mean = self.samples.sum_axis(Axis(0)) / m;
        let diffs = &self.samples - &mean;
        let covariance = diffs.t().dot(&diffs) / m;

        info!(
            mean_shape = ?mean.shape(),
            covariance_shape = ?covariance.shape(),
            "multivariate Gaussian distribution fit with MLE"
        );
        &*self.params.insert(GaussianParams { mean, covariance })
    }

    fn ensure_fitted(&mut self) -> GaussianParams {
        match &self.params {
            Some(params) => params.clone(),
            None => self.estimate().clone(),
        }
    }

    /// Draws `size` samples from the fitted joint normal, estimating first
    /// if the estimator is unfitted.
    ///
    /// Returns an array of shape `(size, n_vars)`.
    ///
    /// # Errors
    ///
    /// [`GaussianError::Linalg`] if the covariance cannot be factored for
    /// sampling.
    pub fn draw<R: Rng>(
        &mut self,
        size: usize,
        rng: &mut R,
    ) -> Result<Array2<f64>, GaussianError> {
        let params = self.ensure_fitted();
        let sampler = MvnSampler::new(
            params.mean.view(),
            params.covariance.view(),
            self.config.psd_tolerance(),
        )?;
        Ok(sampler.sample(size, rng))
    }

    /// Estimates the distribution of the `dependent` variables conditional on
    /// the remaining variables taking the values in `independent`.
    ///
    /// `independent` lists one value per conditioning variable, in ascending
    /// variable-index order. The conditional parameters are
    ///
    /// ```text
    /// mu_cond    = mu_D + S_DI pinv(S_II) (independent - mu_I)
    /// sigma_cond = S_DD - S_DI pinv(S_II) S_ID
    /// ```
    ///
    /// with the Moore-Penrose pseudo-inverse so that a singular conditioning
    /// block (e.g. perfectly correlated conditioning variables) is tolerated.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::InvalidPartition`] | `dependent.len() + independent.len() != n_vars` |
    /// | [`GaussianError::IndexOutOfBounds`] | a dependent index `>= n_vars` |
    /// | [`GaussianError::DuplicateIndex`] | a dependent index listed twice |
    /// | [`GaussianError::NonFiniteData`] | NaN or infinity in `independent` |
    #[tracing::instrument(skip(self, independent), fields(n_vars = self.n_vars()))]
    pub fn conditional_estimate(
        &mut self,
        dependent: &[usize],
        independent: &[f64],
    ) -> Result<&ConditionalFit, GaussianError> {
        let n_vars = self.n_vars();
        if dependent.len() + independent.len() != n_vars {
            return Err(GaussianError::InvalidPartition {
                dependent: dependent.len(),
                independent: independent.len(),
                n_vars,
            });
        }
        if independent.iter().any(|v| !v.is_finite()) {
            return Err(GaussianError::NonFiniteData);
        }
        let partition = Partition::new(dependent, n_vars)?;
        let joint = self.ensure_fitted();

        let given = ArrayView1::from(independent).to_owned();
        let params = condition(&joint, &partition, &given, self.config.pinv_rcond());

        info!(
            conditional_mean = ?params.mean.to_vec(),
            conditional_covariance = ?params.covariance,
            "conditional distribution estimated"
        );
        Ok(&*self.conditional.insert(ConditionalFit {
            partition,
            given,
            params,
        }))
    }

    /// Draws `size` samples from the most recent conditional fit.
    ///
    /// Returns an array of shape `(size, n_dependent)`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::NotFitted`] | no conditional estimate has been made |
    /// | [`GaussianError::Linalg`] | the conditional covariance cannot be factored |
    pub fn conditional_draw<R: Rng>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<Array2<f64>, GaussianError> {
        let fit = self.conditional.as_ref().ok_or(GaussianError::NotFitted)?;
        let sampler = MvnSampler::new(
            fit.mean().view(),
            fit.covariance().view(),
            self.config.psd_tolerance(),
        )?;
        Ok(sampler.sample(size, rng))
    }
}

/// Conditions `joint` on the independent block of `partition` taking the
/// values `given`.
fn condition(
    joint: &GaussianParams,
    partition: &Partition,
    given: &Array1<f64>,
    rcond: f64,
) -> GaussianParams {
    let dep = partition.dependent();
    let ind = partition.independent();
    let sigma = &joint.covariance;

    let block = |rows: &[usize], cols: &[usize]| -> Array2<f64> {
        sigma.select(Axis(0), rows).select(Axis(1), cols)
    };
    let s_ii = block(ind, ind);
    let s_dd = block(dep, dep);
    let s_id = block(ind, dep);
    let s_di = block(dep, ind);

    // S_DI * pinv(S_II), shared by the mean and covariance updates.
    let gain = s_di.dot(&pinv(s_ii.view(), rcond));

    let mu_d = joint.mean.select(Axis(0), dep);
    let mu_i = joint.mean.select(Axis(0), ind);
    let mean = mu_d + gain.dot(&(given - &mu_i));
    let covariance = s_dd - gain.dot(&s_id);

    GaussianParams { mean, covariance }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::SeedableRng;

    fn samples() -> Array2<f64> {
        array![
            [1.0, 2.0, 0.5],
            [2.0, 3.5, -0.5],
            [3.0, 6.5, 1.0],
            [4.0, 8.0, 0.0],
            [0.0, 1.0, 2.0]
        ]
    }

    #[test]
    fn starts_unfitted() {
        let mle = GaussianMle::new(samples().view()).unwrap();
        assert_eq!(mle.state(), FitState::Unfitted);
        assert!(mle.params().is_none());
        assert!(mle.conditional().is_none());
        assert_eq!(mle.n_obs(), 5);
        assert_eq!(mle.n_vars(), 3);
    }

    #[test]
    fn estimate_uses_population_divisor() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let mut mle = GaussianMle::new(x.view()).unwrap();
        let params = mle.estimate();
        assert_abs_diff_eq!(params.mean()[0], 2.5, epsilon = 1e-12);
        // sum of squared deviations = 5, divided by M = 4.
        assert_abs_diff_eq!(params.covariance()[[0, 0]], 1.25, epsilon = 1e-12);
        assert_eq!(mle.state(), FitState::Fitted);
    }

    #[test]
    fn estimate_shapes() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        let params = mle.estimate();
        assert_eq!(params.mean().dim(), 3);
        assert_eq!(params.covariance().dim(), (3, 3));
        assert_eq!(params.dim(), 3);
    }

    #[test]
    fn estimate_is_deterministic() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        let first = mle.estimate().clone();
        let second = mle.estimate().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn covariance_is_symmetric() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        let cov = mle.estimate().covariance().clone();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(cov[[i, j]], cov[[j, i]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn draw_auto_fits() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let draws = mle.draw(7, &mut rng).unwrap();
        assert_eq!(draws.dim(), (7, 3));
        assert_eq!(mle.state(), FitState::Fitted);
    }

    #[test]
    fn conditional_draw_requires_conditional_fit() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert_eq!(
            mle.conditional_draw(3, &mut rng).unwrap_err(),
            GaussianError::NotFitted
        );
        mle.estimate();
        assert_eq!(
            mle.conditional_draw(3, &mut rng).unwrap_err(),
            GaussianError::NotFitted
        );
    }

    #[test]
    fn conditional_estimate_auto_fits() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        mle.conditional_estimate(&[0], &[3.0, 0.0]).unwrap();
        assert_eq!(mle.state(), FitState::ConditionallyFitted);
        assert!(mle.params().is_some());
    }

    #[test]
    fn invalid_partition_fails_before_fitting() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        let err = mle.conditional_estimate(&[0], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            GaussianError::InvalidPartition {
                dependent: 1,
                independent: 1,
                n_vars: 3
            }
        );
        assert_eq!(mle.state(), FitState::Unfitted);
    }

    #[test]
    fn bivariate_conditional_matches_closed_form() {
        let mut mle = GaussianMle::new(samples().select(Axis(1), &[0, 1]).view()).unwrap();
        let joint = mle.estimate().clone();
        let (m0, m1) = (joint.mean()[0], joint.mean()[1]);
        let s = joint.covariance();

        let cond = mle.conditional_estimate(&[1], &[2.5]).unwrap();
        let expected_mean = m1 + s[[1, 0]] / s[[0, 0]] * (2.5 - m0);
        let expected_var = s[[1, 1]] - s[[1, 0]] * s[[0, 1]] / s[[0, 0]];
        assert_abs_diff_eq!(cond.mean()[0], expected_mean, epsilon = 1e-10);
        assert_abs_diff_eq!(cond.covariance()[[0, 0]], expected_var, epsilon = 1e-10);
        assert_eq!(cond.partition().dependent(), &[1]);
        assert_eq!(cond.given().to_vec(), vec![2.5]);
    }

    #[test]
    fn new_partition_replaces_previous_fit() {
        let mut mle = GaussianMle::new(samples().view()).unwrap();
        mle.conditional_estimate(&[0], &[3.0, 0.0]).unwrap();
        let cond = mle.conditional_estimate(&[1, 2], &[2.0]).unwrap();
        assert_eq!(cond.partition().dependent(), &[1, 2]);
        assert_eq!(cond.partition().independent(), &[0]);
        assert_eq!(cond.mean().len(), 2);

        // The first split must not leak into the second.
        let mut fresh = GaussianMle::new(samples().view()).unwrap();
        let direct = fresh.conditional_estimate(&[1, 2], &[2.0]).unwrap().clone();
        assert_eq!(mle.conditional().unwrap(), &direct);
    }

    #[test]
    fn singular_conditioning_block_uses_pseudo_inverse() {
        // Variables 0 and 1 are perfectly correlated.
        let x = array![
            [1.0, 2.0, 0.3],
            [2.0, 4.0, 0.1],
            [3.0, 6.0, 0.9],
            [4.0, 8.0, 1.2]
        ];
        let mut mle = GaussianMle::new(x.view()).unwrap();
        let cond = mle.conditional_estimate(&[2], &[2.5, 5.0]).unwrap();
        assert!(cond.mean()[0].is_finite());
        assert!(cond.covariance()[[0, 0]].is_finite());
        assert!(cond.covariance()[[0, 0]] >= -1e-12);
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            GaussianMle::new(empty.view()).unwrap_err(),
            GaussianError::EmptyData {
                n_obs: 0,
                n_vars: 3
            }
        );
        let nan = array![[1.0, f64::INFINITY]];
        assert_eq!(
            GaussianMle::new(nan.view()).unwrap_err(),
            GaussianError::NonFiniteData
        );
    }
}
