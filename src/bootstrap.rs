//! Bootstrap resampling (sampling with replacement)

use crate::dataset::Dataset;
use crate::error::{CrossvalError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Draw `n` row indices independently and uniformly from `[0, n)`, with
/// replacement.
pub fn bootstrap_indices<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

/// Bootstrap resampler
///
/// Produces same-size samples drawn with replacement from a source dataset.
/// A sample typically contains duplicate rows and omits others (about
/// `e^-1` of the source rows for large n).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapSampler {
    seed: Option<u64>,
}

impl BootstrapSampler {
    /// Create a new bootstrap sampler
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw one bootstrap sample using the configured seed (or process
    /// entropy)
    pub fn resample(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.resample_with_rng(dataset, &mut rng)
    }

    /// Draw one bootstrap sample from the given RNG
    pub fn resample_with_rng<R: Rng>(&self, dataset: &Dataset, rng: &mut R) -> Result<Dataset> {
        if dataset.is_empty() {
            return Err(CrossvalError::EmptyDataset);
        }
        let indices = bootstrap_indices(dataset.len(), rng);
        Ok(dataset.select(&indices))
    }
}
