//! Repeated resample → fit → evaluate experiments
//!
//! The driver runs R independent repetitions of either
//! partition → fit → score (cross-validation mode) or
//! resample → fit (bootstrap / variability mode). Repetitions run on the
//! rayon pool; each repetition derives its own ChaCha8 stream from the base
//! seed, so a fixed seed yields bit-identical results regardless of thread
//! count, and results are collected in repetition order.

use crate::bootstrap::BootstrapSampler;
use crate::dataset::Dataset;
use crate::error::{CrossvalError, Result};
use crate::fit::{run_fit, FitOutcome};
use crate::metrics::{mean, rmse, std_dev};
use crate::model::Model;
use crate::partition::{Partitioner, Proportions};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Label the cross-validation mode fits on
pub const TRAIN_LABEL: &str = "train";
/// Label the cross-validation mode scores against
pub const TEST_LABEL: &str = "test";

/// Outcome sequence of a cross-validation run
///
/// One slot per repetition: `Some(rmse)` for a successful fit-and-score,
/// `None` where the fit (or scoring) failed. Failed slots stay visible so
/// callers can report a failure rate instead of a silently shrunk
/// distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValReport {
    /// Per-repetition out-of-sample rmse, in repetition order
    pub scores: Vec<Option<f64>>,
    /// Mean over present scores
    pub mean_score: Option<f64>,
    /// Standard deviation over present scores
    pub std_score: Option<f64>,
    /// Number of repetitions without a score
    pub n_failures: usize,
    /// Number of repetitions requested
    pub repetitions: usize,
}

impl CrossValReport {
    fn from_scores(scores: Vec<Option<f64>>) -> Self {
        let repetitions = scores.len();
        let present: Vec<f64> = scores.iter().flatten().copied().collect();
        Self {
            mean_score: mean(&present),
            std_score: std_dev(&present),
            n_failures: repetitions - present.len(),
            repetitions,
            scores,
        }
    }

    /// The successful scores, in repetition order
    pub fn present_scores(&self) -> Vec<f64> {
        self.scores.iter().flatten().copied().collect()
    }

    /// Fraction of repetitions that produced no score
    pub fn failure_rate(&self) -> f64 {
        self.n_failures as f64 / self.repetitions as f64
    }
}

/// Outcome of a bootstrap or simulation variability run
///
/// Failed fits are dropped from `models` (never surfaced as degenerate data
/// points) but stay counted in `n_failures`.
#[derive(Debug, Clone)]
pub struct BootstrapReport<M> {
    /// Successfully fitted models, in repetition order
    pub models: Vec<M>,
    /// Number of repetitions whose fit failed
    pub n_failures: usize,
    /// Number of repetitions requested
    pub repetitions: usize,
}

impl<M> BootstrapReport<M> {
    fn from_outcomes(outcomes: Vec<FitOutcome<M>>) -> Self {
        let repetitions = outcomes.len();
        let models: Vec<M> = outcomes.into_iter().filter_map(FitOutcome::into_model).collect();
        Self {
            n_failures: repetitions - models.len(),
            repetitions,
            models,
        }
    }

    /// Number of repetitions that produced a model
    pub fn n_successes(&self) -> usize {
        self.models.len()
    }

    /// Fraction of repetitions whose fit failed
    pub fn failure_rate(&self) -> f64 {
        self.n_failures as f64 / self.repetitions as f64
    }
}

/// Driver for repeated resampling experiments
///
/// Stateless across runs: each call is a pure function of the inputs, the
/// configuration, and the seed. Repetitions are mutually independent; a
/// failed repetition is counted and skipped, never retried.
#[derive(Debug, Clone)]
pub struct Experiment {
    repetitions: usize,
    seed: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Experiment {
    /// Create an experiment with a single repetition
    pub fn new() -> Self {
        Self {
            repetitions: 1,
            seed: None,
            cancel: None,
        }
    }

    /// Number of configured repetitions
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Set the number of repetitions (callers typically use 100)
    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Set the base seed for reproducibility; each repetition derives its
    /// own stream from it
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Install a cooperative cancellation flag, checked before each
    /// repetition starts. Cancelled repetitions are recorded as failures
    /// and the run still returns normally.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Cross-validation mode: per repetition, draw a random partition, fit
    /// on the `"train"` subset, and score rmse against the `"test"` subset.
    ///
    /// The proportions must declare both labels. Failed repetitions record
    /// an absent score and never abort the batch.
    pub fn cross_validate<M, F>(
        &self,
        dataset: &Dataset,
        proportions: &Proportions,
        fit_fn: F,
    ) -> Result<CrossValReport>
    where
        M: Model,
        F: Fn(&Dataset) -> Result<M> + Sync,
    {
        self.validate_repetitions()?;
        if dataset.is_empty() {
            return Err(CrossvalError::EmptyDataset);
        }
        proportions.validate()?;
        for label in [TRAIN_LABEL, TEST_LABEL] {
            if !proportions.labels().any(|l| l == label) {
                return Err(CrossvalError::InvalidProportions(format!(
                    "cross-validation requires a '{}' label",
                    label
                )));
            }
        }

        let partitioner = Partitioner::new(proportions.clone());
        let base_seed = self.base_seed();
        debug!(repetitions = self.repetitions, base_seed, "cross-validation run");

        let scores: Vec<Option<f64>> = (0..self.repetitions)
            .into_par_iter()
            .map(|rep| {
                if self.is_cancelled() {
                    return None;
                }
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(rep as u64));
                let partition = match partitioner.split_with_rng(dataset, &mut rng) {
                    Ok(partition) => partition,
                    Err(err) => {
                        debug!(rep, error = %err, "partition failed");
                        return None;
                    }
                };
                let (train, test) = (partition.get(TRAIN_LABEL)?, partition.get(TEST_LABEL)?);
                match run_fit(&fit_fn, train) {
                    FitOutcome::Success(model) => match rmse(&model, test) {
                        Ok(score) => Some(score),
                        Err(err) => {
                            debug!(rep, error = %err, "evaluation failed");
                            None
                        }
                    },
                    FitOutcome::Failure(description) => {
                        debug!(rep, %description, "fit failed");
                        None
                    }
                }
            })
            .collect();

        Ok(CrossValReport::from_scores(scores))
    }

    /// Bootstrap variability mode: per repetition, draw a same-size sample
    /// with replacement and fit. Failed fits are dropped and counted.
    pub fn bootstrap<M, F>(&self, dataset: &Dataset, fit_fn: F) -> Result<BootstrapReport<M>>
    where
        M: Model,
        F: Fn(&Dataset) -> Result<M> + Sync,
    {
        self.validate_repetitions()?;
        if dataset.is_empty() {
            return Err(CrossvalError::EmptyDataset);
        }

        let sampler = BootstrapSampler::new();
        let base_seed = self.base_seed();
        debug!(repetitions = self.repetitions, base_seed, "bootstrap run");

        let outcomes: Vec<FitOutcome<M>> = (0..self.repetitions)
            .into_par_iter()
            .map(|rep| {
                if self.is_cancelled() {
                    return FitOutcome::Failure("cancelled".to_string());
                }
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(rep as u64));
                match sampler.resample_with_rng(dataset, &mut rng) {
                    Ok(sample) => run_fit(&fit_fn, &sample),
                    Err(err) => FitOutcome::Failure(err.to_string()),
                }
            })
            .collect();

        Ok(BootstrapReport::from_outcomes(outcomes))
    }

    /// Generative variability mode: like [`Experiment::bootstrap`], but each
    /// repetition fits a dataset freshly drawn from `generator` (e.g. a
    /// known noise process resimulated at fixed x values) instead of a
    /// bootstrap resample.
    pub fn simulate<M, F, G>(&self, generator: G, fit_fn: F) -> Result<BootstrapReport<M>>
    where
        M: Model,
        F: Fn(&Dataset) -> Result<M> + Sync,
        G: Fn(&mut ChaCha8Rng) -> Dataset + Sync,
    {
        self.validate_repetitions()?;

        let base_seed = self.base_seed();
        debug!(repetitions = self.repetitions, base_seed, "simulation run");

        let outcomes: Vec<FitOutcome<M>> = (0..self.repetitions)
            .into_par_iter()
            .map(|rep| {
                if self.is_cancelled() {
                    return FitOutcome::Failure("cancelled".to_string());
                }
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(rep as u64));
                let sample = generator(&mut rng);
                run_fit(&fit_fn, &sample)
            })
            .collect();

        Ok(BootstrapReport::from_outcomes(outcomes))
    }

    fn validate_repetitions(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(CrossvalError::InvalidParameter {
                name: "repetitions".to_string(),
                value: "0".to_string(),
                reason: "at least one repetition is required".to_string(),
            });
        }
        Ok(())
    }

    fn base_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => ChaCha8Rng::from_entropy().gen(),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

impl Default for Experiment {
    fn default() -> Self {
        Self::new()
    }
}
