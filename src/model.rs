//! Fitted-model capability and reference model implementations
//!
//! The toolkit treats fitted models as opaque: the only capability it needs
//! is producing one prediction per dataset row. Fitting functions are plain
//! closures `Fn(&Dataset) -> Result<M>` supplied by the caller.
//!
//! The reference models here exist so the toolkit is exercisable out of the
//! box: a closed-form linear fit, a least-squares polynomial with a
//! configurable degree (the flexibility knob), and a nearest-neighbor
//! interpolator that memorizes its training data.

use crate::dataset::Dataset;
use crate::error::{CrossvalError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Prediction capability of a fitted model
pub trait Model: Send + Sync {
    /// One prediction per row of `data`
    fn predict(&self, data: &Dataset) -> Result<Array1<f64>>;
}

/// Ordinary least squares fit of y = intercept + slope * x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearModel {
    /// Closed-form OLS fit.
    ///
    /// Fails with `FitFailure` when fewer than two rows are available or
    /// the x column has no variance.
    pub fn fit(data: &Dataset) -> Result<Self> {
        let n = data.len();
        if n < 2 {
            return Err(CrossvalError::FitFailure(format!(
                "need at least 2 observations, got {}",
                n
            )));
        }

        let x_mean = data.x().mean().unwrap_or(0.0);
        let y_mean = data.y().mean().unwrap_or(0.0);

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (&x, &y) in data.x().iter().zip(data.y().iter()) {
            sxx += (x - x_mean) * (x - x_mean);
            sxy += (x - x_mean) * (y - y_mean);
        }

        if sxx < f64::EPSILON * n as f64 {
            return Err(CrossvalError::FitFailure(
                "x column has no variance".to_string(),
            ));
        }

        let slope = sxy / sxx;
        Ok(Self {
            intercept: y_mean - slope * x_mean,
            slope,
        })
    }
}

impl Model for LinearModel {
    fn predict(&self, data: &Dataset) -> Result<Array1<f64>> {
        Ok(data.x().mapv(|x| self.intercept + self.slope * x))
    }
}

/// Least-squares polynomial of a fixed degree
///
/// Coefficients are stored in ascending power order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialModel {
    pub coefficients: Vec<f64>,
}

impl PolynomialModel {
    /// Fit a degree-`degree` polynomial by solving the normal equations.
    ///
    /// Fails with `FitFailure` when the dataset has fewer than `degree + 1`
    /// rows or the normal equations are singular (e.g. a degenerate
    /// resample with too few distinct x values).
    pub fn fit(data: &Dataset, degree: usize) -> Result<Self> {
        let n = data.len();
        let k = degree + 1;
        if n < k {
            return Err(CrossvalError::FitFailure(format!(
                "degree {} needs at least {} observations, got {}",
                degree, k, n
            )));
        }

        // Normal equations A b = c with A = X^T X, c = X^T y for the
        // Vandermonde design matrix X.
        let mut a = vec![vec![0.0; k]; k];
        let mut c = vec![0.0; k];
        for (&x, &y) in data.x().iter().zip(data.y().iter()) {
            let mut powers = vec![1.0; k];
            for p in 1..k {
                powers[p] = powers[p - 1] * x;
            }
            for i in 0..k {
                c[i] += powers[i] * y;
                for j in 0..k {
                    a[i][j] += powers[i] * powers[j];
                }
            }
        }

        let coefficients = solve_linear_system(&mut a, &mut c)?;
        Ok(Self { coefficients })
    }
}

impl Model for PolynomialModel {
    fn predict(&self, data: &Dataset) -> Result<Array1<f64>> {
        Ok(data.x().mapv(|x| {
            // Horner evaluation
            self.coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, &coef| acc * x + coef)
        }))
    }
}

/// Gaussian elimination with partial pivoting; consumes its inputs.
fn solve_linear_system(a: &mut [Vec<f64>], c: &mut [f64]) -> Result<Vec<f64>> {
    let k = c.len();
    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot_row][col].abs() < 1e-12 {
            return Err(CrossvalError::FitFailure(
                "singular normal equations".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        c.swap(col, pivot_row);

        for row in col + 1..k {
            let factor = a[row][col] / a[col][col];
            for j in col..k {
                a[row][j] -= factor * a[col][j];
            }
            c[row] -= factor * c[col];
        }
    }

    let mut solution = vec![0.0; k];
    for row in (0..k).rev() {
        let mut value = c[row];
        for j in row + 1..k {
            value -= a[row][j] * solution[j];
        }
        solution[row] = value / a[row][row];
    }
    Ok(solution)
}

/// One-nearest-neighbor regressor on x
///
/// Memorizes its training data and predicts the y of the closest training
/// x, so it interpolates the training set exactly when x values are
/// distinct. Useful as the maximally over-flexible end of the complexity
/// spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighbor {
    training: Dataset,
}

impl NearestNeighbor {
    /// Memorize the training data
    pub fn fit(data: &Dataset) -> Result<Self> {
        if data.is_empty() {
            return Err(CrossvalError::FitFailure(
                "no observations to memorize".to_string(),
            ));
        }
        Ok(Self {
            training: data.clone(),
        })
    }
}

impl Model for NearestNeighbor {
    fn predict(&self, data: &Dataset) -> Result<Array1<f64>> {
        Ok(data.x().mapv(|x| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (i, &tx) in self.training.x().iter().enumerate() {
                let dist = (x - tx).abs();
                if dist < best_dist {
                    best_dist = dist;
                    best = i;
                }
            }
            self.training.y()[best]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fit_recovers_exact_line() {
        let ds = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);
        let model = LinearModel::fit(&ds).unwrap();
        assert!((model.intercept - 1.0).abs() < 1e-10);
        assert!((model.slope - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_linear_fit_fails_without_variance() {
        let ds = Dataset::from_pairs(&[(2.0, 1.0), (2.0, 3.0), (2.0, 5.0)]);
        assert!(matches!(
            LinearModel::fit(&ds),
            Err(CrossvalError::FitFailure(_))
        ));
    }

    #[test]
    fn test_linear_fit_fails_on_single_row() {
        let ds = Dataset::from_pairs(&[(1.0, 1.0)]);
        assert!(matches!(
            LinearModel::fit(&ds),
            Err(CrossvalError::FitFailure(_))
        ));
    }

    #[test]
    fn test_polynomial_fit_recovers_quadratic() {
        let ds = Dataset::from_pairs(
            &(0..8)
                .map(|i| {
                    let x = i as f64;
                    (x, 2.0 - x + 0.5 * x * x)
                })
                .collect::<Vec<_>>(),
        );
        let model = PolynomialModel::fit(&ds, 2).unwrap();
        assert!((model.coefficients[0] - 2.0).abs() < 1e-8);
        assert!((model.coefficients[1] + 1.0).abs() < 1e-8);
        assert!((model.coefficients[2] - 0.5).abs() < 1e-8);
    }

    #[test]
    fn test_polynomial_fit_fails_on_insufficient_rows() {
        let ds = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 2.0)]);
        assert!(matches!(
            PolynomialModel::fit(&ds, 3),
            Err(CrossvalError::FitFailure(_))
        ));
    }

    #[test]
    fn test_polynomial_fit_fails_on_degenerate_x() {
        // Three rows but only one distinct x value: singular system.
        let ds = Dataset::from_pairs(&[(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        assert!(matches!(
            PolynomialModel::fit(&ds, 2),
            Err(CrossvalError::FitFailure(_))
        ));
    }

    #[test]
    fn test_nearest_neighbor_interpolates_training_data() {
        let ds = Dataset::from_pairs(&[(0.0, 5.0), (1.0, -2.0), (2.0, 9.0)]);
        let model = NearestNeighbor::fit(&ds).unwrap();
        let preds = model.predict(&ds).unwrap();
        assert_eq!(preds.as_slice().unwrap(), &[5.0, -2.0, 9.0]);

        let query = Dataset::from_pairs(&[(0.9, 0.0)]);
        assert_eq!(model.predict(&query).unwrap()[0], -2.0);
    }
}
