//! Dependent / conditioning split of the model variables.

use ndarray::Array1;

use crate::error::GaussianError;

/// A split of the variables `0..n_vars` into a dependent set (the variables
/// to be drawn) and an independent set (the conditioning variables whose
/// values are fixed).
///
/// Both index sets are stored in ascending order, are disjoint, and
/// together cover every variable exactly once. A partition is immutable:
/// each conditional estimate builds a fresh one.
///
/// # Example
///
/// ```
/// use mlest_gaussian::Partition;
///
/// let p = Partition::new(&[2, 0], 4).unwrap();
/// assert_eq!(p.dependent(), &[0, 2]);
/// assert_eq!(p.independent(), &[1, 3]);
/// assert_eq!(p.mask().to_vec(), vec![false, true, false, true]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    dependent: Vec<usize>,
    independent: Vec<usize>,
}

impl Partition {
    /// Builds a partition from the dependent indices; every other variable
    /// is independent.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GaussianError::IndexOutOfBounds`] | an index is `>= n_vars` |
    /// | [`GaussianError::DuplicateIndex`] | an index appears twice |
    pub fn new(dependent: &[usize], n_vars: usize) -> Result<Self, GaussianError> {
        let mut is_dependent = vec![false; n_vars];
        for &index in dependent {
            if index >= n_vars {
                return Err(GaussianError::IndexOutOfBounds { index, n_vars });
            }
            if is_dependent[index] {
                return Err(GaussianError::DuplicateIndex { index });
            }
            is_dependent[index] = true;
        }

        let (dependent, independent): (Vec<usize>, Vec<usize>) =
            (0..n_vars).partition(|&i| is_dependent[i]);
        Ok(Self {
            dependent,
            independent,
        })
    }

    /// Dependent variable indices, ascending.
    pub fn dependent(&self) -> &[usize] {
        &self.dependent
    }

    /// Independent (conditioning) variable indices, ascending.
    pub fn independent(&self) -> &[usize] {
        &self.independent
    }

    /// Total number of variables.
    pub fn n_vars(&self) -> usize {
        self.dependent.len() + self.independent.len()
    }

    /// Boolean indicator over all variables: `true` marks a conditioning
    /// variable, `false` a dependent one.
    pub fn mask(&self) -> Array1<bool> {
        let mut mask = Array1::from_elem(self.n_vars(), true);
        for &i in &self.dependent {
            mask[i] = false;
        }
        mask
    }
}
