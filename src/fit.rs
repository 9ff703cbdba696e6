//! Fault-isolating execution of user-supplied fitting functions

use crate::dataset::Dataset;
use crate::error::Result;

/// Tagged result of one fit attempt
#[derive(Debug, Clone)]
pub enum FitOutcome<M> {
    /// The fitting function produced a model
    Success(M),
    /// The fitting function failed; the description is the error's display
    /// form
    Failure(String),
}

impl<M> FitOutcome<M> {
    /// Whether this outcome carries a model
    pub fn is_success(&self) -> bool {
        matches!(self, FitOutcome::Success(_))
    }

    /// The model, if fitting succeeded
    pub fn model(&self) -> Option<&M> {
        match self {
            FitOutcome::Success(model) => Some(model),
            FitOutcome::Failure(_) => None,
        }
    }

    /// Consume the outcome, yielding the model if fitting succeeded
    pub fn into_model(self) -> Option<M> {
        match self {
            FitOutcome::Success(model) => Some(model),
            FitOutcome::Failure(_) => None,
        }
    }

    /// The failure description, if fitting failed
    pub fn failure(&self) -> Option<&str> {
        match self {
            FitOutcome::Success(_) => None,
            FitOutcome::Failure(description) => Some(description),
        }
    }
}

/// Invoke a fitting function exactly once against `dataset`, converting any
/// error into a [`FitOutcome::Failure`].
///
/// This is the safe-execution seam of the toolkit: one bad resample must
/// never abort a batch of repetitions, so no error crosses this boundary. A
/// returned model is accepted as-is; validating its internals is the fitting
/// routine's responsibility.
pub fn run_fit<M, F>(fit_fn: F, dataset: &Dataset) -> FitOutcome<M>
where
    F: FnOnce(&Dataset) -> Result<M>,
{
    match fit_fn(dataset) {
        Ok(model) => FitOutcome::Success(model),
        Err(err) => FitOutcome::Failure(err.to_string()),
    }
}
