//! Inference errors

use std::path::PathBuf;

use thiserror::Error;

/// Startup failure while locating or decoding model artifacts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model files not found. Checked: {}", format_candidates(.candidates))]
    NotFound { candidates: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("inconsistent model bundle: {0}")]
    Inconsistent(String),
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    let paths: Vec<String> = candidates
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect();
    format!("[{}]", paths.join(", "))
}

/// Failure inside the scaler or classifier for a single row.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("X has {actual} features, but {component} is expecting {expected} features as input")]
    WidthMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("classifier returned an empty probability distribution")]
    EmptyDistribution,

    #[error("{component} produced a non-finite value: input contains infinity or a value too large for float64")]
    NonFinite { component: &'static str },
}
