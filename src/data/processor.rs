//! Feature scaling and train/test splitting
//!
//! Standardization mirrors the usual `StandardScaler`: population standard
//! deviation, and constant columns map to zero instead of dividing by zero.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitMode;

/// Column-wise standardization fitted on one matrix, applied to any other
#[derive(Debug, Default, Clone)]
pub struct StandardScaler {
    /// Means for each feature
    means: Option<Array1<f64>>,
    /// Standard deviations for each feature
    stds: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit on the rows of `x`; an empty matrix leaves the scaler unfitted
    pub fn fit(&mut self, x: &Array2<f64>) {
        self.means = x.mean_axis(Axis(0));
        self.stds = self.means.as_ref().map(|_| x.std_axis(Axis(0), 0.0));
    }

    pub fn is_fitted(&self) -> bool {
        self.means.is_some()
    }

    /// Standardize `x` with the fitted statistics
    ///
    /// Returns `x` unchanged if the scaler was never fitted.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let (Some(means), Some(stds)) = (self.means.as_ref(), self.stds.as_ref()) else {
            return x.clone();
        };

        let mut result = Array2::zeros(x.raw_dim());
        for (j, mut col) in result.columns_mut().into_iter().enumerate() {
            let std = stds[j];
            let mean = means[j];
            for (i, val) in col.iter_mut().enumerate() {
                *val = if std > 1e-10 {
                    (x[[i, j]] - mean) / std
                } else {
                    0.0
                };
            }
        }

        result
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Array2<f64> {
        self.fit(x);
        self.transform(x)
    }
}

/// Train and test partitions of a labeled dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Split `x`/`y` into train and test sets
///
/// The test set gets `ceil(test_size * n)` rows. In shuffled mode the row
/// order is permuted first, deterministically when a seed is given.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    mode: SplitMode,
    seed: Option<u64>,
) -> Split {
    let n = x.nrows();
    let n_test = ((test_size * n as f64).ceil() as usize).min(n);
    let n_train = n - n_test;

    let mut indices: Vec<usize> = (0..n).collect();
    if mode == SplitMode::Shuffled {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        indices.shuffle(&mut rng);
    }

    let (train_idx, test_idx) = indices.split_at(n_train);

    Split {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    }
}
