//! crossval - Resampling-based model validation
//!
//! This crate estimates a fitting procedure's generalization error and
//! parameter variability by running it many times over resampled views of
//! a dataset:
//! - [`partition`] - Random disjoint train/test splitting with labeled
//!   proportions
//! - [`bootstrap`] - Same-size resampling with replacement
//! - [`fit`] - Fault-isolating execution of user-supplied fitting functions
//! - [`metrics`] - Prediction-error metrics (rmse, mse, mae)
//! - [`experiment`] - The repeated resample → fit → evaluate driver
//! - [`synthetic`] - Known linear data-generating process for simulation
//!   studies
//! - [`model`] - The prediction capability trait plus small reference fits
//!
//! The fitting procedure itself is opaque to this crate: callers pass any
//! closure `Fn(&Dataset) -> Result<M>` whose `M` can produce one prediction
//! per dataset row. A failing fit on one resample is captured as a recorded
//! failure and never aborts the batch.
//!
//! # Example
//!
//! ```
//! use crossval::prelude::*;
//!
//! let data = Dataset::from_pairs(&[
//!     (0.0, 1.1), (0.2, 1.3), (0.4, 1.8), (0.6, 2.2), (0.8, 2.6),
//!     (1.0, 3.1), (1.2, 3.4), (1.4, 3.8), (1.6, 4.2), (1.8, 4.5),
//! ]);
//! let proportions = Proportions::new().with("train", 0.8).with("test", 0.2);
//!
//! let report = Experiment::new()
//!     .with_repetitions(100)
//!     .with_seed(42)
//!     .cross_validate(&data, &proportions, LinearModel::fit)
//!     .unwrap();
//!
//! assert_eq!(report.scores.len(), 100);
//! assert!(report.mean_score.unwrap() < 1.0);
//! ```

// Core error handling
pub mod error;

// Data model
pub mod dataset;

// Resampling primitives
pub mod bootstrap;
pub mod partition;

// Fitting and evaluation
pub mod fit;
pub mod metrics;
pub mod model;

// Orchestration
pub mod experiment;

// Simulation studies
pub mod synthetic;

pub use error::{CrossvalError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{CrossvalError, Result};

    // Data model
    pub use crate::dataset::{Dataset, Observation};

    // Resampling
    pub use crate::bootstrap::{bootstrap_indices, BootstrapSampler};
    pub use crate::partition::{Partition, Partitioner, Proportions};

    // Fitting and evaluation
    pub use crate::fit::{run_fit, FitOutcome};
    pub use crate::metrics::{mae, mse, rmse};
    pub use crate::model::{LinearModel, Model, NearestNeighbor, PolynomialModel};

    // Orchestration
    pub use crate::experiment::{
        BootstrapReport, CrossValReport, Experiment, TEST_LABEL, TRAIN_LABEL,
    };

    // Simulation
    pub use crate::synthetic::LinearProcess;
}
