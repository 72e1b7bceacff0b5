//! Regression metrics for scoring the price forecast on held-out rows

use ndarray::Array1;

/// Collection of regression metrics
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// R-squared (coefficient of determination)
    pub r2: f64,
    /// Mean Absolute Percentage Error, if any target is non-zero
    pub mape: Option<f64>,
    /// Number of samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Calculate all regression metrics
    pub fn calculate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mse = Self::mean_squared_error(y_true, y_pred);

        Self {
            mse,
            rmse: mse.sqrt(),
            mae: Self::mean_absolute_error(y_true, y_pred),
            r2: Self::r_squared(y_true, y_pred),
            mape: Self::mean_absolute_percentage_error(y_true, y_pred),
            n_samples: y_true.len(),
        }
    }

    /// Mean Squared Error: (1/n) * Σ(y_true - y_pred)²
    pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        if y_true.is_empty() {
            return 0.0;
        }
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum::<f64>()
            / n
    }

    /// Mean Absolute Error: (1/n) * Σ|y_true - y_pred|
    pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        if y_true.is_empty() {
            return 0.0;
        }
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).abs())
            .sum::<f64>()
            / n
    }

    /// R² = 1 - SS_res / SS_tot
    ///
    /// A constant target has no variance to explain and scores 0.
    pub fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let y_mean = y_true.mean().unwrap_or(0.0);

        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();

        let ss_tot: f64 = y_true.iter().map(|&t| (t - y_mean).powi(2)).sum();

        if ss_tot < 1e-10 {
            return 0.0;
        }

        1.0 - ss_res / ss_tot
    }

    /// MAPE = (100/n) * Σ|y_true - y_pred| / |y_true|, skipping zero targets
    pub fn mean_absolute_percentage_error(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
    ) -> Option<f64> {
        let ratios: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(&t, _)| t.abs() > 1e-10)
            .map(|(&t, &p)| ((t - p) / t).abs())
            .collect();

        if ratios.is_empty() {
            return None;
        }

        Some(ratios.iter().sum::<f64>() / ratios.len() as f64 * 100.0)
    }

    /// Multi-line report for logs
    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Samples: {}\n", self.n_samples));
        s.push_str(&format!("  MSE:   {:.6}\n", self.mse));
        s.push_str(&format!("  RMSE:  {:.6}\n", self.rmse));
        s.push_str(&format!("  MAE:   {:.6}\n", self.mae));
        if let Some(mape) = self.mape {
            s.push_str(&format!("  MAPE:  {:.2}%\n", mape));
        }
        s.push_str(&format!("  R²:    {:.6}\n", self.r2));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perfect_prediction() {
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let metrics = RegressionMetrics::calculate(&y, &y);

        assert_abs_diff_eq!(metrics.mse, 0.0);
        assert_abs_diff_eq!(metrics.r2, 1.0, epsilon = 1e-12);
        assert_eq!(metrics.mape, Some(0.0));
        assert_eq!(metrics.n_samples, 5);
    }

    #[test]
    fn test_errors() {
        let y_true = Array1::from_vec(vec![100.0, 200.0]);
        let y_pred = Array1::from_vec(vec![110.0, 180.0]);
        let metrics = RegressionMetrics::calculate(&y_true, &y_pred);

        assert_abs_diff_eq!(metrics.mse, 250.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.mae, 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.mape.unwrap(), 10.0, epsilon = 1e-12);
        // SS_tot = 2 * 50² = 5000, SS_res = 500
        assert_abs_diff_eq!(metrics.r2, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let y_true = Array1::from_vec(vec![3.0]);
        let y_pred = Array1::from_vec(vec![5.0]);
        assert_eq!(RegressionMetrics::r_squared(&y_true, &y_pred), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let empty = Array1::<f64>::zeros(0);
        let metrics = RegressionMetrics::calculate(&empty, &empty);
        assert_eq!(metrics.mse, 0.0);
        assert!(metrics.mape.is_none());
    }
}
