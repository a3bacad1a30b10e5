//! Classifier - probability estimation interface
//!
//! Classifier kinds differ in what they expose. Whether a model carries
//! feature importances is fixed when the artifact is decoded, never probed
//! per request.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::error::InferenceError;
use super::forest::{ForestArtifact, RandomForestClassifier};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trait for loaded classifiers (random forest, linear, test doubles)
pub trait Classifier: Send + Sync {
    /// Model family name, used in logs and error messages
    fn name(&self) -> &'static str;

    /// Width of the input row
    fn n_features(&self) -> usize;

    /// Class probability distribution for one scaled row
    fn predict_proba(&self, row: ArrayView1<f64>) -> Result<Array1<f64>, InferenceError>;

    /// Per-feature importance weights, if this model family has them
    fn feature_importances(&self) -> Option<&[f64]>;

    /// Reject rows of the wrong width
    fn check_width(&self, row: &ArrayView1<f64>) -> Result<(), InferenceError> {
        if row.len() != self.n_features() {
            return Err(InferenceError::WidthMismatch {
                component: self.name(),
                expected: self.n_features(),
                actual: row.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// Classifier artifact as exported by the training toolchain
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    RandomForest(ForestArtifact),
    LogisticRegression(LogisticRegression),
}

impl ClassifierArtifact {
    /// Validate the decoded artifact and build the runtime classifier
    pub fn build(self) -> Result<Box<dyn Classifier>, String> {
        match self {
            ClassifierArtifact::RandomForest(forest) => {
                Ok(Box::new(RandomForestClassifier::from_artifact(forest)?))
            }
            ClassifierArtifact::LogisticRegression(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
        }
    }
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

/// Binary logistic regression. Exposes no feature importances.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn validate(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("logistic regression has no coefficients".to_string());
        }
        if self.coef.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("logistic regression has non-finite coefficients".to_string());
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "LogisticRegression"
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict_proba(&self, row: ArrayView1<f64>) -> Result<Array1<f64>, InferenceError> {
        self.check_width(&row)?;

        let z = row.iter().zip(&self.coef).map(|(x, c)| x * c).sum::<f64>() + self.intercept;
        let p = 1.0 / (1.0 + (-z).exp());

        Ok(Array1::from(vec![1.0 - p, p]))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }
}
