//! Daily price bars and the price table the forecaster works on

use chrono::{Duration, NaiveDate};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Feature columns in the order they enter the model
pub const FEATURE_NAMES: [&str; 4] = ["Close", "HighLoad", "Change", "Volume"];

/// One daily OHLCV bar as delivered by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Distance from close up to the high, in percent of close
    ///
    /// `None` when close is zero.
    pub fn high_load(&self) -> Option<f64> {
        percent_of(self.high - self.close, self.close)
    }

    /// Intraday change from open to close, in percent of open
    ///
    /// `None` when open is zero.
    pub fn change(&self) -> Option<f64> {
        percent_of(self.close - self.open, self.open)
    }
}

fn percent_of(delta: f64, base: f64) -> Option<f64> {
    if base == 0.0 || !base.is_finite() {
        return None;
    }
    let value = delta / base * 100.0;
    value.is_finite().then_some(value)
}

/// One row of the price table; `None` marks an undefined value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub high_load: Option<f64>,
    pub change: Option<f64>,
    pub volume: Option<f64>,
    /// Close price `forecast_out` rows later
    pub label: Option<f64>,
    pub prediction: Option<f64>,
}

impl PriceRow {
    fn from_bar(bar: &PriceBar) -> Option<Self> {
        Some(Self {
            date: bar.date,
            close: Some(bar.close),
            high_load: Some(bar.high_load()?),
            change: Some(bar.change()?),
            volume: Some(bar.volume),
            label: None,
            prediction: None,
        })
    }

    fn forecast(date: NaiveDate, prediction: f64) -> Self {
        Self {
            date,
            close: None,
            high_load: None,
            change: None,
            volume: None,
            label: None,
            prediction: Some(prediction),
        }
    }

    /// Feature values in `FEATURE_NAMES` order, if all are defined
    pub fn features(&self) -> Option<[f64; 4]> {
        Some([self.close?, self.high_load?, self.change?, self.volume?])
    }
}

/// Chronologically ordered price rows
///
/// The first `original_len` rows come from the provider; rows after them
/// are synthesized forecast rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
    original_len: usize,
}

impl PriceTable {
    /// Build the table from raw bars, deriving `HighLoad` and `Change`
    ///
    /// Bars are sorted by date and only the first bar of each date is kept.
    /// Bars whose derived features are undefined (zero open or close) are
    /// dropped.
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let mut sorted: Vec<&PriceBar> = bars.iter().collect();
        sorted.sort_by_key(|b| b.date);
        sorted.dedup_by(|later, kept| {
            let duplicate = later.date == kept.date;
            if duplicate {
                log::warn!("Skipping duplicate bar on {}", later.date);
            }
            duplicate
        });

        let rows: Vec<PriceRow> = sorted
            .into_iter()
            .filter_map(|bar| {
                let row = PriceRow::from_bar(bar);
                if row.is_none() {
                    log::warn!("Skipping bar on {}: zero open or close price", bar.date);
                }
                row
            })
            .collect();

        let original_len = rows.len();
        Self { rows, original_len }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows that came from the provider
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Rows appended by the forecaster
    pub fn forecast_rows(&self) -> &[PriceRow] {
        &self.rows[self.original_len..]
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Set `label[i] = close[i + shift]` over the original rows
    ///
    /// The trailing `shift` original rows get no label.
    pub fn shift_labels(&mut self, shift: usize) {
        let n = self.original_len;
        for i in 0..n {
            self.rows[i].label = if i + shift < n {
                self.rows[i + shift].close
            } else {
                None
            };
        }
    }

    /// Feature matrix (n_original x 4) in `FEATURE_NAMES` order
    pub fn feature_matrix(&self) -> Array2<f64> {
        let flat: Vec<f64> = self.rows[..self.original_len]
            .iter()
            .flat_map(|r| r.features().unwrap_or([f64::NAN; 4]))
            .collect();

        Array2::from_shape_vec((self.original_len, FEATURE_NAMES.len()), flat)
            .unwrap_or_else(|_| Array2::zeros((0, FEATURE_NAMES.len())))
    }

    /// Labels of the original rows that have one
    pub fn labels(&self) -> Vec<f64> {
        self.rows[..self.original_len]
            .iter()
            .filter_map(|r| r.label)
            .collect()
    }

    /// Append one row per prediction, each a calendar day after the last
    pub fn append_forecast(&mut self, predictions: &[f64]) {
        let Some(mut date) = self.last_date() else {
            return;
        };
        for &prediction in predictions {
            date += Duration::days(1);
            self.rows.push(PriceRow::forecast(date, prediction));
        }
    }
}
