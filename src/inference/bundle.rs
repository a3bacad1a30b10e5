//! Model Bundle - classifier, scaler and feature names loaded together
//!
//! The bundle is built once at startup and never mutated. `SharedModel`
//! is the write-once slot handlers read it from; its fill state is the
//! service's readiness flag.

use std::sync::Arc;

use ndarray::{Array1, Array2, Axis};
use once_cell::sync::OnceCell;

use super::classifier::Classifier;
use super::error::{InferenceError, LoadError};
use super::layout::{ANOMALY_CLASS, FEATURE_COUNT, LATEST_STEP};
use super::scaler::FeatureScaler;

// ============================================================================
// BUNDLE
// ============================================================================

/// Mutually consistent model artifacts
pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    scaler: FeatureScaler,
    feature_names: Vec<String>,
}

/// Result of scoring one sequence
#[derive(Debug, Clone)]
pub struct Prediction {
    pub anomaly_score: f64,
    pub feature_importance: Option<Vec<f64>>,
}

impl ModelBundle {
    /// Assemble a bundle, refusing artifacts whose widths disagree
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: FeatureScaler,
        feature_names: Vec<String>,
    ) -> Result<Self, LoadError> {
        let widths = [
            ("scaler", scaler.n_features()),
            ("classifier", classifier.n_features()),
            ("feature names", feature_names.len()),
        ];
        if let Some((what, width)) = widths.iter().find(|(_, w)| *w != FEATURE_COUNT) {
            return Err(LoadError::Inconsistent(format!(
                "{} width is {}, expected {} (scaler={}, classifier={}, feature names={})",
                what, width, FEATURE_COUNT, widths[0].1, widths[1].1, widths[2].1
            )));
        }
        if let Some(imp) = classifier.feature_importances() {
            if imp.len() != FEATURE_COUNT {
                return Err(LoadError::Inconsistent(format!(
                    "classifier exposes {} feature importances, expected {}",
                    imp.len(),
                    FEATURE_COUNT
                )));
            }
        }

        Ok(Self {
            classifier,
            scaler,
            feature_names,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn has_feature_importances(&self) -> bool {
        self.classifier.feature_importances().is_some()
    }

    /// Score a validated `SEQUENCE_LENGTH x FEATURE_COUNT` window.
    /// Only the most recent time-step is used.
    pub fn score(&self, sequence: &Array2<f64>) -> Result<Prediction, InferenceError> {
        let latest = sequence.index_axis(Axis(0), LATEST_STEP);

        let scaled = self.scaler.transform(latest)?;
        ensure_finite(&scaled, self.scaler.name())?;
        let proba = self.classifier.predict_proba(scaled.view())?;
        ensure_finite(&proba, self.classifier.name())?;

        let anomaly_score = match proba.len() {
            0 => return Err(InferenceError::EmptyDistribution),
            1 => proba[0],
            _ => proba[ANOMALY_CLASS],
        };

        Ok(Prediction {
            anomaly_score,
            feature_importance: self.classifier.feature_importances().map(<[f64]>::to_vec),
        })
    }
}

/// Every scaled value and probability must be finite
fn ensure_finite(values: &Array1<f64>, component: &'static str) -> Result<(), InferenceError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(InferenceError::NonFinite { component })
    }
}

// ============================================================================
// SHARED STATE
// ============================================================================

/// Write-once holder for the loaded bundle
#[derive(Clone, Default)]
pub struct SharedModel {
    cell: Arc<OnceCell<ModelBundle>>,
}

impl SharedModel {
    /// Empty slot; the service reports not ready until `install` succeeds
    pub fn empty() -> Self {
        Self::default()
    }

    /// Slot already holding a bundle
    pub fn loaded(bundle: ModelBundle) -> Self {
        let shared = Self::empty();
        // A fresh cell cannot already be set.
        let _ = shared.cell.set(bundle);
        shared
    }

    /// Install the bundle. Returns it back if one is already installed.
    pub fn install(&self, bundle: ModelBundle) -> Result<(), ModelBundle> {
        self.cell.set(bundle)
    }

    /// Readiness flag
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Option<&ModelBundle> {
        self.cell.get()
    }
}
