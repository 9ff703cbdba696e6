//! Prediction-error metrics and score aggregation helpers

use crate::dataset::Dataset;
use crate::error::{CrossvalError, Result};
use crate::model::Model;
use ndarray::Array1;

/// Root-mean-square error of a model's predictions against a dataset
pub fn rmse<M: Model>(model: &M, data: &Dataset) -> Result<f64> {
    mse(model, data).map(f64::sqrt)
}

/// Mean-square error of a model's predictions against a dataset
pub fn mse<M: Model>(model: &M, data: &Dataset) -> Result<f64> {
    let predictions = checked_predictions(model, data)?;
    let sum: f64 = predictions
        .iter()
        .zip(data.y().iter())
        .map(|(p, y)| (p - y) * (p - y))
        .sum();
    Ok(sum / data.len() as f64)
}

/// Mean absolute error of a model's predictions against a dataset
pub fn mae<M: Model>(model: &M, data: &Dataset) -> Result<f64> {
    let predictions = checked_predictions(model, data)?;
    let sum: f64 = predictions
        .iter()
        .zip(data.y().iter())
        .map(|(p, y)| (p - y).abs())
        .sum();
    Ok(sum / data.len() as f64)
}

/// Predictions with shape validation: empty datasets and short prediction
/// vectors error instead of silently yielding NaN or truncated sums.
fn checked_predictions<M: Model>(model: &M, data: &Dataset) -> Result<Array1<f64>> {
    if data.is_empty() {
        return Err(CrossvalError::EmptyDataset);
    }
    let predictions = model.predict(data)?;
    if predictions.len() != data.len() {
        return Err(CrossvalError::DimensionMismatch {
            expected: data.len(),
            actual: predictions.len(),
        });
    }
    Ok(predictions)
}

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
