//! Close-price forecasting with linear regression
//!
//! Each row is labeled with the close `forecast_out` rows later. The model
//! is trained on the labeled rows, and the trailing unlabeled rows are
//! pushed through it to produce `forecast_out` predictions that are
//! appended as new calendar days.

use ndarray::{s, Array1};

use crate::config::{ForecastSettings, ScaleScope};
use crate::data::prices::{PriceTable, FEATURE_NAMES};
use crate::data::processor::{train_test_split, StandardScaler};
use crate::error::{AdvisorError, Result, Stage};
use crate::metrics::regression::RegressionMetrics;
use crate::models::linear::LinearRegression;

/// Fewest labeled rows that still leave one row for training and one for testing
const MIN_LABELED_ROWS: usize = 2;

/// Result of a forecast run
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    /// Original rows plus `forecast_out` appended prediction rows
    pub table: PriceTable,
    /// Number of forecast steps
    pub forecast_out: usize,
    /// Predicted closes, in date order
    pub forecast: Vec<f64>,
    /// R² on the test split
    pub accuracy: f64,
    /// All metrics on the test split
    pub metrics: RegressionMetrics,
    /// Fitted model
    pub model: LinearRegression,
}

impl ForecastOutcome {
    /// Close recorded `forecast_out` rows before the end of the original series
    pub fn reference_close(&self) -> Option<f64> {
        let n = self.table.original_len();
        let idx = n.checked_sub(self.forecast_out + 1)?;
        self.table.rows().get(idx).and_then(|r| r.close)
    }

    /// Last predicted close
    pub fn final_prediction(&self) -> Option<f64> {
        self.forecast.last().copied()
    }
}

/// Number of forecast steps for a history of `n_rows`
pub fn forecast_horizon(n_rows: usize, fraction: f64) -> usize {
    (fraction * n_rows as f64).ceil() as usize
}

/// Linear-regression forecaster
#[derive(Debug, Clone)]
pub struct Forecaster {
    settings: ForecastSettings,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(ForecastSettings::default())
    }
}

impl Forecaster {
    pub fn new(settings: ForecastSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Label, fit, score and extend `table` with predictions
    pub fn forecast(&self, mut table: PriceTable) -> Result<ForecastOutcome> {
        let n = table.original_len();
        if n == 0 {
            return Err(AdvisorError::insufficient(
                Stage::Forecast,
                "price history is empty",
            ));
        }

        let forecast_out = forecast_horizon(n, self.settings.forecast_fraction);
        let n_labeled = n.saturating_sub(forecast_out);
        if n_labeled < MIN_LABELED_ROWS {
            return Err(AdvisorError::insufficient(
                Stage::Forecast,
                format!(
                    "{} price rows leave {} labeled row(s), need at least {}",
                    n, n_labeled, MIN_LABELED_ROWS
                ),
            ));
        }

        table.shift_labels(forecast_out);

        let features = table.feature_matrix();
        let mut scaler = StandardScaler::new();
        match self.settings.scale_scope {
            ScaleScope::FullHistory => scaler.fit(&features),
            ScaleScope::LabeledOnly => scaler.fit(&features.slice(s![..n_labeled, ..]).to_owned()),
        }
        let scaled = scaler.transform(&features);

        let x_labeled = scaled.slice(s![..n_labeled, ..]).to_owned();
        let x_forecast = scaled.slice(s![n_labeled.., ..]).to_owned();
        let y = Array1::from_vec(table.labels());

        let split = train_test_split(
            &x_labeled,
            &y,
            self.settings.test_size,
            self.settings.split,
            self.settings.seed,
        );
        if split.x_train.nrows() == 0 || split.x_test.nrows() == 0 {
            return Err(AdvisorError::insufficient(
                Stage::Forecast,
                format!(
                    "split of {} labeled rows left an empty train or test set",
                    n_labeled
                ),
            ));
        }

        let mut model = LinearRegression::new(true).with_feature_names(&FEATURE_NAMES);
        model.fit(&split.x_train, &split.y_train)?;
        log::debug!("\n{}", model.summary());

        let test_pred = model.predict(&split.x_test)?;
        let metrics = RegressionMetrics::calculate(&split.y_test, &test_pred);
        let accuracy = metrics.r2;
        log::info!(
            "Trained on {} rows, tested on {} rows, accuracy (R²) = {:.4}",
            split.x_train.nrows(),
            split.x_test.nrows(),
            accuracy
        );
        log::debug!("Test metrics\n{}", metrics.report());

        let forecast = model.predict(&x_forecast)?.to_vec();
        table.append_forecast(&forecast);
        log::info!(
            "Forecast {} day(s) ahead, final prediction {:.4}",
            forecast_out,
            forecast.last().copied().unwrap_or(f64::NAN)
        );

        Ok(ForecastOutcome {
            table,
            forecast_out,
            forecast,
            accuracy,
            metrics,
            model,
        })
    }
}
