//! Input Layout - fixed sequence shape and artifact names
//!
//! The model was trained on 145 features per time-step and the scoring
//! endpoint accepts a window of 24 time-steps. Only the last one is scored.

// ============================================================================
// SHAPE
// ============================================================================

/// Time-steps per request window
pub const SEQUENCE_LENGTH: usize = 24;

/// Features per time-step
pub const FEATURE_COUNT: usize = 145;

/// Index of the most recent time-step
pub const LATEST_STEP: usize = SEQUENCE_LENGTH - 1;

/// Class index treated as "anomaly" in a multi-class distribution
pub const ANOMALY_CLASS: usize = 1;

// ============================================================================
// ARTIFACTS
// ============================================================================

/// Classifier artifact. Its presence selects the model directory.
pub const CLASSIFIER_FILE: &str = "random_forest_model.pkl";

/// Fitted feature scaler
pub const SCALER_FILE: &str = "feature_scaler.pkl";

/// Ordered feature names
pub const FEATURE_NAMES_FILE: &str = "feature_names.pkl";

/// Directory name searched under each candidate base path
pub const MODELS_DIR_NAME: &str = "models";

/// Absolute fallback used by container deployments
pub const FALLBACK_MODELS_DIR: &str = "/app/models";
