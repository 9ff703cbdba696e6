//! Synthetic data generation from a known linear process

use crate::dataset::Dataset;
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Linear data-generating process y = intercept + slope * x + N(0, noise_sd)
///
/// Besides producing fresh datasets, this doubles as the generative
/// alternative to bootstrap resampling: [`LinearProcess::resimulate`] keeps
/// a dataset's x values and redraws y from the known noise process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearProcess {
    intercept: f64,
    slope: f64,
    noise_sd: f64,
}

impl LinearProcess {
    /// Create a process with the given coefficients and noise level.
    /// Negative noise levels are clamped to zero.
    pub fn new(intercept: f64, slope: f64, noise_sd: f64) -> Self {
        Self {
            intercept,
            slope,
            noise_sd: noise_sd.max(0.0),
        }
    }

    /// The noiseless response at x
    pub fn truth(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Noise standard deviation
    pub fn noise_sd(&self) -> f64 {
        self.noise_sd
    }

    /// Generate observations at the given x values
    pub fn generate_at<R: Rng>(&self, xs: &Array1<f64>, rng: &mut R) -> Dataset {
        // noise_sd is non-negative by construction, so Normal::new cannot
        // fail; a zero sd degenerates to the noiseless line.
        let noise = Normal::new(0.0, self.noise_sd).expect("non-negative std dev");
        let ys = xs.mapv(|x| self.truth(x) + noise.sample(rng));
        Dataset::new(xs.clone(), ys).expect("columns have equal length by construction")
    }

    /// Generate `n` observations at evenly spaced x values in `[lo, hi]`
    pub fn generate_grid<R: Rng>(&self, n: usize, lo: f64, hi: f64, rng: &mut R) -> Dataset {
        let xs = Array1::linspace(lo, hi, n);
        self.generate_at(&xs, rng)
    }

    /// Fresh dataset with the same x values as `dataset` and newly drawn y
    pub fn resimulate<R: Rng>(&self, dataset: &Dataset, rng: &mut R) -> Dataset {
        self.generate_at(dataset.x(), rng)
    }
}
