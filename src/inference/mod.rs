//! Inference - model artifacts and scoring
//!
//! Loading is separated from serving: the loader builds a `ModelBundle`
//! once, handlers only read it.

pub mod bundle;
pub mod classifier;
pub mod error;
pub mod forest;
pub mod layout;
pub mod loader;
pub mod scaler;

// Re-export common types
pub use bundle::{ModelBundle, Prediction, SharedModel};
pub use classifier::{Classifier, ClassifierArtifact, LogisticRegression};
pub use error::{InferenceError, LoadError};
pub use forest::RandomForestClassifier;
pub use layout::{FEATURE_COUNT, SEQUENCE_LENGTH};
pub use scaler::FeatureScaler;
