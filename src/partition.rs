//! Random disjoint partitioning of a dataset into labeled subsets

use crate::dataset::Dataset;
use crate::error::{CrossvalError, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Tolerance when checking that fractions sum to at most 1
const SUM_EPSILON: f64 = 1e-9;

/// Ordered mapping from subset label to requested fraction of rows.
///
/// Declaration order matters: rows left over from rounding are assigned to
/// the first-declared label (see [`Partitioner::split`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    entries: Vec<(String, f64)>,
}

impl Proportions {
    /// Create an empty proportions list
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a labeled fraction
    pub fn with(mut self, label: impl Into<String>, fraction: f64) -> Self {
        self.entries.push((label.into(), fraction));
        self
    }

    /// Declared labels, in declaration order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Labeled fractions, in declaration order
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Sum of all declared fractions
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, f)| f).sum()
    }

    /// Check structural validity: at least one label, no duplicates, all
    /// fractions non-negative, sum at most 1 (within tolerance).
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(CrossvalError::InvalidProportions(
                "no labels declared".to_string(),
            ));
        }
        for (label, fraction) in &self.entries {
            if *fraction < 0.0 || !fraction.is_finite() {
                return Err(CrossvalError::InvalidProportions(format!(
                    "fraction for '{}' is {}",
                    label, fraction
                )));
            }
        }
        for (i, (label, _)) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|(l, _)| l == label) {
                return Err(CrossvalError::InvalidProportions(format!(
                    "duplicate label '{}'",
                    label
                )));
            }
        }
        let total = self.total();
        if total > 1.0 + SUM_EPSILON {
            return Err(CrossvalError::InvalidProportions(format!(
                "fractions sum to {}",
                total
            )));
        }
        Ok(())
    }
}

impl Default for Proportions {
    fn default() -> Self {
        Self::new()
    }
}

/// A labeled subset of a partitioned dataset
#[derive(Debug, Clone)]
struct PartitionPart {
    label: String,
    indices: Vec<usize>,
    data: Dataset,
}

/// Result of partitioning: disjoint labeled subsets of the source rows
#[derive(Debug, Clone)]
pub struct Partition {
    parts: Vec<PartitionPart>,
}

impl Partition {
    /// The subset for a label, if declared
    pub fn get(&self, label: &str) -> Option<&Dataset> {
        self.parts.iter().find(|p| p.label == label).map(|p| &p.data)
    }

    /// Source-row indices assigned to a label, if declared
    pub fn indices(&self, label: &str) -> Option<&[usize]> {
        self.parts
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.indices.as_slice())
    }

    /// Labels in declaration order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.label.as_str())
    }
}

/// Random partitioner
///
/// Shuffles the source row indices and carves contiguous blocks of the
/// permutation into labeled subsets, sized `floor(fraction * n)` each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partitioner {
    proportions: Proportions,
    seed: Option<u64>,
}

impl Partitioner {
    /// Create a partitioner with the given proportions
    pub fn new(proportions: Proportions) -> Self {
        Self {
            proportions,
            seed: None,
        }
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured proportions
    pub fn proportions(&self) -> &Proportions {
        &self.proportions
    }

    /// Partition a dataset using the configured seed (or process entropy)
    pub fn split(&self, dataset: &Dataset) -> Result<Partition> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.split_with_rng(dataset, &mut rng)
    }

    /// Partition a dataset drawing the permutation from the given RNG.
    ///
    /// Block sizes are `floor(fraction * n)`. When the fractions sum to 1
    /// (within tolerance) the rows left over from flooring are assigned to
    /// the first-declared label, so subset sizes total exactly n. When the
    /// fractions sum to less than 1 the leftover rows stay unassigned.
    pub fn split_with_rng<R: Rng>(&self, dataset: &Dataset, rng: &mut R) -> Result<Partition> {
        self.proportions.validate()?;
        let n = dataset.len();
        if n == 0 {
            return Err(CrossvalError::EmptyDataset);
        }

        let mut permutation: Vec<usize> = (0..n).collect();
        permutation.shuffle(rng);

        let mut sizes: Vec<usize> = self
            .proportions
            .entries()
            .iter()
            .map(|(_, fraction)| (fraction * n as f64).floor() as usize)
            .collect();

        // Top up the first-declared label only when the caller asked for a
        // full partition of the rows.
        if (self.proportions.total() - 1.0).abs() <= SUM_EPSILON {
            let assigned: usize = sizes.iter().sum();
            sizes[0] += n - assigned;
        }

        let mut parts = Vec::with_capacity(sizes.len());
        let mut cursor = 0;
        for ((label, _), &size) in self.proportions.entries().iter().zip(&sizes) {
            let indices: Vec<usize> = permutation[cursor..cursor + size].to_vec();
            let data = dataset.select(&indices);
            parts.push(PartitionPart {
                label: label.clone(),
                indices,
                data,
            });
            cursor += size;
        }

        Ok(Partition { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_dataset(n: usize) -> Dataset {
        Dataset::from_pairs(&(0..n).map(|i| (i as f64, 2.0 * i as f64)).collect::<Vec<_>>())
    }

    #[test]
    fn test_split_exact_sizes() {
        let proportions = Proportions::new().with("train", 0.7).with("test", 0.3);
        let partition = Partitioner::new(proportions)
            .with_seed(7)
            .split(&grid_dataset(100))
            .unwrap();

        assert_eq!(partition.get("train").unwrap().len(), 70);
        assert_eq!(partition.get("test").unwrap().len(), 30);
    }

    #[test]
    fn test_split_disjoint_and_covering() {
        let proportions = Proportions::new().with("train", 0.6).with("test", 0.4);
        let partition = Partitioner::new(proportions)
            .with_seed(11)
            .split(&grid_dataset(53))
            .unwrap();

        let mut all: Vec<usize> = partition
            .indices("train")
            .unwrap()
            .iter()
            .chain(partition.indices("test").unwrap())
            .copied()
            .collect();
        all.sort_unstable();
        // Fractions sum to 1, so every row is assigned exactly once.
        assert_eq!(all, (0..53).collect::<Vec<_>>());
    }

    #[test]
    fn test_remainder_goes_to_first_label() {
        // n = 10 with thirds: floor gives 3/3/3, the leftover row tops up
        // the first-declared label.
        let proportions = Proportions::new()
            .with("a", 1.0 / 3.0)
            .with("b", 1.0 / 3.0)
            .with("c", 1.0 / 3.0);
        let partition = Partitioner::new(proportions)
            .with_seed(3)
            .split(&grid_dataset(10))
            .unwrap();

        assert_eq!(partition.get("a").unwrap().len(), 4);
        assert_eq!(partition.get("b").unwrap().len(), 3);
        assert_eq!(partition.get("c").unwrap().len(), 3);
    }

    #[test]
    fn test_partial_proportions_leave_rows_unassigned() {
        let proportions = Proportions::new().with("sample", 0.5);
        let partition = Partitioner::new(proportions)
            .with_seed(5)
            .split(&grid_dataset(101))
            .unwrap();

        assert_eq!(partition.get("sample").unwrap().len(), 50);
    }

    #[test]
    fn test_invalid_proportions_rejected() {
        let ds = grid_dataset(10);

        let negative = Proportions::new().with("train", -0.1).with("test", 0.5);
        assert!(matches!(
            Partitioner::new(negative).split(&ds),
            Err(CrossvalError::InvalidProportions(_))
        ));

        let oversum = Proportions::new().with("train", 0.8).with("test", 0.3);
        assert!(matches!(
            Partitioner::new(oversum).split(&ds),
            Err(CrossvalError::InvalidProportions(_))
        ));

        let duplicate = Proportions::new().with("train", 0.5).with("train", 0.5);
        assert!(matches!(
            Partitioner::new(duplicate).split(&ds),
            Err(CrossvalError::InvalidProportions(_))
        ));

        let empty = Proportions::new();
        assert!(matches!(
            Partitioner::new(empty).split(&ds),
            Err(CrossvalError::InvalidProportions(_))
        ));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let proportions = Proportions::new().with("train", 0.7).with("test", 0.3);
        let result = Partitioner::new(proportions).split(&Dataset::from_pairs(&[]));
        assert!(matches!(result, Err(CrossvalError::EmptyDataset)));
    }

    #[test]
    fn test_seeded_split_is_deterministic() {
        let ds = grid_dataset(40);
        let proportions = Proportions::new().with("train", 0.75).with("test", 0.25);

        let a = Partitioner::new(proportions.clone()).with_seed(42).split(&ds).unwrap();
        let b = Partitioner::new(proportions).with_seed(42).split(&ds).unwrap();

        assert_eq!(a.indices("train"), b.indices("train"));
        assert_eq!(a.indices("test"), b.indices("test"));
    }
}
