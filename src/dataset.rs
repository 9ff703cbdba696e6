//! In-memory dataset of paired (x, y) observations

use crate::error::{CrossvalError, Result};
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

/// A single paired observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

/// Ordered, immutable collection of paired observations, stored as parallel
/// x and y columns.
///
/// Derived structures (partitions, bootstrap samples) are fresh copies; a
/// dataset is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Dataset {
    /// Create a dataset from parallel x and y columns
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(CrossvalError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Create a dataset from a slice of observations
    pub fn from_observations(obs: &[Observation]) -> Self {
        Self {
            x: obs.iter().map(|o| o.x).collect(),
            y: obs.iter().map(|o| o.y).collect(),
        }
    }

    /// Create a dataset from (x, y) pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            x: pairs.iter().map(|p| p.0).collect(),
            y: pairs.iter().map(|p| p.1).collect(),
        }
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the dataset has no observations
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The x column
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    /// The y column
    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    /// The observation at a row index
    pub fn observation(&self, i: usize) -> Observation {
        Observation {
            x: self.x[i],
            y: self.y[i],
        }
    }

    /// All observations in row order
    pub fn observations(&self) -> Vec<Observation> {
        (0..self.len()).map(|i| self.observation(i)).collect()
    }

    /// Fresh dataset containing the given rows, in the given order.
    /// Indices may repeat (bootstrap samples rely on this).
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = Dataset::new(array![1.0, 2.0, 3.0], array![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(CrossvalError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_from_pairs_round_trips_observations() {
        let ds = Dataset::from_pairs(&[(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.observation(1), Observation { x: 3.0, y: 4.0 });

        let rebuilt = Dataset::from_observations(&ds.observations());
        assert_eq!(rebuilt, ds);
    }

    #[test]
    fn test_select_copies_rows_with_repeats() {
        let ds = Dataset::from_pairs(&[(0.0, 10.0), (1.0, 11.0), (2.0, 12.0)]);
        let sub = ds.select(&[2, 0, 2]);
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.x().as_slice().unwrap(), &[2.0, 0.0, 2.0]);
        assert_eq!(sub.y().as_slice().unwrap(), &[12.0, 10.0, 12.0]);
    }

    #[test]
    fn test_empty_dataset_is_constructible() {
        let ds = Dataset::from_pairs(&[]);
        assert!(ds.is_empty());
    }
}
