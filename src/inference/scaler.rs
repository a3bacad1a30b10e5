//! Feature Scaler - fitted normalization from training
//!
//! Maps a raw feature row into the range the classifier was trained on.
//! Parameters come from the exported scaler artifact.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::error::InferenceError;

/// Fitted scaler parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },

    /// Linear map of `[data_min, data_max]` onto `feature_range`
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: (f64, f64),
    },
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl FeatureScaler {
    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FeatureScaler::Standard { .. } => "StandardScaler",
            FeatureScaler::MinMax { .. } => "MinMaxScaler",
        }
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            FeatureScaler::Standard { mean, .. } => mean.len(),
            FeatureScaler::MinMax { data_min, .. } => data_min.len(),
        }
    }

    /// Check that parameter vectors agree with each other
    pub fn validate(&self) -> Result<(), String> {
        let (a, b, label) = match self {
            FeatureScaler::Standard { mean, scale } => (mean.len(), scale.len(), "mean/scale"),
            FeatureScaler::MinMax { data_min, data_max, .. } => {
                (data_min.len(), data_max.len(), "data_min/data_max")
            }
        };
        if a != b {
            return Err(format!("{} lengths differ ({} vs {})", label, a, b));
        }
        if a == 0 {
            return Err("scaler has no fitted features".to_string());
        }
        Ok(())
    }

    /// Transform one row
    pub fn transform(&self, row: ArrayView1<f64>) -> Result<Array1<f64>, InferenceError> {
        let expected = self.n_features();
        if row.len() != expected {
            return Err(InferenceError::WidthMismatch {
                component: self.name(),
                expected,
                actual: row.len(),
            });
        }

        let scaled: Array1<f64> = match self {
            FeatureScaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(&x, (&m, &s))| (x - m) / nonzero(s))
                .collect(),
            FeatureScaler::MinMax { data_min, data_max, feature_range } => {
                let (lo, hi) = *feature_range;
                row.iter()
                    .zip(data_min.iter().zip(data_max.iter()))
                    .map(|(&x, (&min, &max))| lo + (x - min) * (hi - lo) / nonzero(max - min))
                    .collect()
            }
        };

        Ok(scaled)
    }
}

/// Constant features were fitted with a zero spread; leave them unscaled.
fn nonzero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}
