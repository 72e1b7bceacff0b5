//! Ordinary least squares linear regression
//!
//! Solves the normal equations `β = (X'X)^(-1) X'y` with a Cholesky
//! factorization. A tiny ridge term keeps the system positive definite when
//! a feature column is constant.

use ndarray::{s, Array1, Array2, Axis};
use thiserror::Error;

use crate::metrics::regression::RegressionMetrics;

/// Errors that can occur during linear regression
#[derive(Error, Debug)]
pub enum LinearRegressionError {
    #[error("Matrix is singular and cannot be inverted")]
    SingularMatrix,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Cannot fit on an empty dataset")]
    EmptyDataset,

    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Computation error: {0}")]
    ComputationError(String),
}

/// Diagonal damping tried in order until the factorization succeeds
const RIDGE_STEPS: [f64; 3] = [1e-10, 1e-8, 1e-6];

/// Linear Regression model using Ordinary Least Squares
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Coefficients (weights) for each feature
    pub coefficients: Option<Array1<f64>>,
    /// Intercept (bias) term
    pub intercept: Option<f64>,
    /// Whether to fit an intercept
    fit_intercept: bool,
    /// R-squared on the training data
    pub r_squared: Option<f64>,
    /// Feature names
    pub feature_names: Option<Vec<String>>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LinearRegression {
    pub fn new(fit_intercept: bool) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept,
            r_squared: None,
            feature_names: None,
        }
    }

    /// Set feature names for the summary
    pub fn with_feature_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.feature_names = Some(names.iter().map(|n| n.as_ref().to_string()).collect());
        self
    }

    /// Fit the model on `x` (n_samples x n_features) and `y`
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), LinearRegressionError> {
        if x.nrows() != y.len() {
            return Err(LinearRegressionError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(LinearRegressionError::EmptyDataset);
        }

        let design = if self.fit_intercept {
            let ones = Array2::ones((x.nrows(), 1));
            ndarray::concatenate(Axis(1), &[ones.view(), x.view()])
                .map_err(|e| LinearRegressionError::ComputationError(e.to_string()))?
        } else {
            x.clone()
        };

        let xt = design.t();
        let xtx = xt.dot(&design);
        let xty = xt.dot(y);

        let beta = solve_normal_equations(&xtx, &xty)?;

        if self.fit_intercept {
            self.intercept = Some(beta[0]);
            self.coefficients = Some(beta.slice(s![1..]).to_owned());
        } else {
            self.intercept = Some(0.0);
            self.coefficients = Some(beta);
        }

        let fitted = self.predict(x)?;
        self.r_squared = Some(RegressionMetrics::r_squared(y, &fitted));

        log::debug!(
            "Fitted OLS on {} samples, train R² = {:.4}",
            x.nrows(),
            self.r_squared.unwrap_or(f64::NAN)
        );

        Ok(())
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, LinearRegressionError> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(LinearRegressionError::NotFitted)?;
        let intercept = self.intercept.ok_or(LinearRegressionError::NotFitted)?;

        if x.ncols() != coefficients.len() {
            return Err(LinearRegressionError::DimensionMismatch {
                expected: coefficients.len(),
                got: x.ncols(),
            });
        }

        Ok(x.dot(coefficients) + intercept)
    }

    /// Coefficient of determination of the predictions on `x` against `y`
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64, LinearRegressionError> {
        let predictions = self.predict(x)?;
        if predictions.len() != y.len() {
            return Err(LinearRegressionError::DimensionMismatch {
                expected: predictions.len(),
                got: y.len(),
            });
        }
        Ok(RegressionMetrics::r_squared(y, &predictions))
    }

    /// Get model summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("Linear Regression Summary\n");
        s.push_str("=========================\n\n");

        let Some(ref coef) = self.coefficients else {
            s.push_str("Model not fitted yet.\n");
            return s;
        };

        s.push_str(&format!("Intercept: {:.6}\n\n", self.intercept.unwrap_or(0.0)));
        s.push_str("Coefficients:\n");

        for (i, &c) in coef.iter().enumerate() {
            let name = self
                .feature_names
                .as_ref()
                .and_then(|names| names.get(i))
                .cloned()
                .unwrap_or_else(|| format!("Feature {}", i));
            s.push_str(&format!("  {:3}. {:20}: {:>12.6}\n", i + 1, name, c));
        }

        s.push_str(&format!("\nR-squared: {:.6}\n", self.r_squared.unwrap_or(0.0)));
        s
    }
}

fn solve_normal_equations(
    xtx: &Array2<f64>,
    xty: &Array1<f64>,
) -> Result<Array1<f64>, LinearRegressionError> {
    let n = xtx.nrows();
    let scale = (0..n).map(|i| xtx[[i, i]].abs()).fold(1.0, f64::max);

    for ridge in RIDGE_STEPS {
        let mut damped = xtx.clone();
        for i in 0..n {
            damped[[i, i]] += ridge * scale;
        }
        match cholesky_solve(&damped, xty) {
            Ok(beta) => return Ok(beta),
            Err(LinearRegressionError::SingularMatrix) => {
                log::debug!("Cholesky failed with ridge {:e}, increasing damping", ridge);
            }
            Err(e) => return Err(e),
        }
    }

    Err(LinearRegressionError::SingularMatrix)
}

/// Solve `a x = b` for symmetric positive definite `a`
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, LinearRegressionError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    // A = L * L^T
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return Err(LinearRegressionError::SingularMatrix);
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}
