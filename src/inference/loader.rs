//! Artifact Loader - locate and decode model artifacts at startup
//!
//! Candidate directories are scanned in order and the first one holding
//! the classifier artifact wins. Artifacts are never merged across
//! directories.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use super::bundle::ModelBundle;
use super::classifier::ClassifierArtifact;
use super::error::LoadError;
use super::layout::{
    CLASSIFIER_FILE, FALLBACK_MODELS_DIR, FEATURE_NAMES_FILE, MODELS_DIR_NAME, SCALER_FILE,
};
use super::scaler::FeatureScaler;

/// Ancestors of the executable path searched for a `models` directory,
/// farthest first.
const EXE_ANCESTOR_OFFSETS: [usize; 3] = [3, 2, 1];

// ============================================================================
// CANDIDATES
// ============================================================================

/// Candidate directories for this process
pub fn candidate_dirs(override_dir: Option<&Path>) -> Vec<PathBuf> {
    let exe = std::env::current_exe().ok();
    let cwd = std::env::current_dir().ok();
    candidate_dirs_from(override_dir, exe.as_deref(), cwd.as_deref())
}

/// Candidate directories, in search order:
/// explicit override, executable ancestors, cwd parent, cwd, fallback.
pub fn candidate_dirs_from(
    override_dir: Option<&Path>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(dir) = override_dir {
        dirs.push(dir.to_path_buf());
    }

    if let Some(exe) = exe {
        for offset in EXE_ANCESTOR_OFFSETS {
            if let Some(base) = exe.ancestors().nth(offset) {
                dirs.push(base.join(MODELS_DIR_NAME));
            }
        }
    }

    if let Some(cwd) = cwd {
        if let Some(parent) = cwd.parent() {
            dirs.push(parent.join(MODELS_DIR_NAME));
        }
        dirs.push(cwd.join(MODELS_DIR_NAME));
    }

    dirs.push(PathBuf::from(FALLBACK_MODELS_DIR));
    dirs
}

/// First candidate containing the classifier artifact
pub fn find_models_dir(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .find(|dir| dir.join(CLASSIFIER_FILE).is_file())
        .map(PathBuf::as_path)
}

// ============================================================================
// LOADING
// ============================================================================

/// Search the candidates and load the first match
pub fn load(candidates: &[PathBuf]) -> Result<ModelBundle, LoadError> {
    let dir = find_models_dir(candidates).ok_or_else(|| LoadError::NotFound {
        candidates: candidates.to_vec(),
    })?;

    load_dir(dir)
}

/// Load classifier, scaler and feature names from one directory, in that order
pub fn load_dir(dir: &Path) -> Result<ModelBundle, LoadError> {
    tracing::info!("Loading model artifacts from: {}", dir.display());

    let classifier_path = dir.join(CLASSIFIER_FILE);
    let artifact: ClassifierArtifact = read_artifact(&classifier_path)?;
    let classifier = artifact.build().map_err(|reason| LoadError::Invalid {
        path: classifier_path.clone(),
        reason,
    })?;

    let scaler_path = dir.join(SCALER_FILE);
    let scaler: FeatureScaler = read_artifact(&scaler_path)?;
    scaler.validate().map_err(|reason| LoadError::Invalid {
        path: scaler_path.clone(),
        reason,
    })?;

    let names_path = dir.join(FEATURE_NAMES_FILE);
    let feature_names: Vec<String> = read_artifact(&names_path)?;

    let bundle = ModelBundle::new(classifier, scaler, feature_names)?;

    tracing::info!(
        classifier = bundle.classifier_name(),
        feature_importances = bundle.has_feature_importances(),
        "Model loaded successfully. Features: {}",
        bundle.feature_names().len()
    );

    Ok(bundle)
}

/// Read and decode one artifact, logging its checksum
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        sha256 = %hex::encode(Sha256::digest(&bytes)),
        size = bytes.len(),
        "Read artifact {}",
        path.display()
    );

    serde_json::from_slice(&bytes).map_err(|source| LoadError::Format {
        path: path.to_path_buf(),
        source,
    })
}
