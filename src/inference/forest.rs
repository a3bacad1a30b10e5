//! Random Forest - fitted tree ensemble
//!
//! Trees arrive in the flat parallel-array layout of a fitted CART tree.
//! They are validated once and converted into an explicit node table, so
//! traversal at request time cannot run off the table or loop.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::classifier::Classifier;
use super::error::InferenceError;

/// Marks a leaf in `children_left` / `children_right`
const TREE_LEAF: i64 = -1;

// ============================================================================
// ARTIFACT
// ============================================================================

/// Exported forest
#[derive(Debug, Clone, Deserialize)]
pub struct ForestArtifact {
    pub n_features: usize,
    pub n_classes: usize,
    pub estimators: Vec<TreeArtifact>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

/// Exported tree, one entry per node in every array
#[derive(Debug, Clone, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Class counts (or weights) per node
    pub value: Vec<Vec<f64>>,
    #[serde(default)]
    pub impurity: Option<Vec<f64>>,
    #[serde(default)]
    pub weighted_n_node_samples: Option<Vec<f64>>,
}

// ============================================================================
// RUNTIME TREE
// ============================================================================

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        proba: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_artifact(
        idx: usize,
        t: &TreeArtifact,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, String> {
        let n = t.children_left.len();
        if n == 0 {
            return Err(format!("tree {} has no nodes", idx));
        }
        let lengths = [
            t.children_right.len(),
            t.feature.len(),
            t.threshold.len(),
            t.value.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(format!("tree {} node arrays have different lengths", idx));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let counts = &t.value[i];
            if counts.len() != n_classes {
                return Err(format!(
                    "tree {} node {} has {} class values, expected {}",
                    idx,
                    i,
                    counts.len(),
                    n_classes
                ));
            }

            let (left, right) = (t.children_left[i], t.children_right[i]);
            if left == TREE_LEAF {
                nodes.push(Node::Leaf { proba: normalize(counts) });
                continue;
            }

            // Children are numbered after their parent in a fitted tree,
            // which also rules out cycles.
            let child = |c: i64| -> Result<usize, String> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| format!("tree {} node {} has invalid child {}", idx, i, c))
            };
            let feature = usize::try_from(t.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    format!("tree {} node {} splits on unknown feature {}", idx, i, t.feature[i])
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: t.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_proba(&self, row: &ArrayView1<f64>) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf { proba } => return proba,
                Node::Split { feature, threshold, left, right } => {
                    i = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Class counts to a distribution. An all-zero row stays all-zero.
fn normalize(counts: &[f64]) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    let total = if total == 0.0 { 1.0 } else { total };
    counts.iter().map(|c| c / total).collect()
}

/// Mean decrease in impurity for one tree, normalized to sum 1.
/// `None` when the artifact does not carry impurity statistics.
fn tree_importances(t: &TreeArtifact, n_features: usize) -> Option<Vec<f64>> {
    let impurity = t.impurity.as_ref()?;
    let weights = t.weighted_n_node_samples.as_ref()?;
    let n = t.children_left.len();
    if impurity.len() != n || weights.len() != n {
        return None;
    }

    let mut imp = vec![0.0; n_features];
    for i in 0..n {
        if t.children_left[i] == TREE_LEAF {
            continue;
        }
        let (l, r) = (t.children_left[i] as usize, t.children_right[i] as usize);
        imp[t.feature[i] as usize] += weights[i] * impurity[i]
            - weights[l] * impurity[l]
            - weights[r] * impurity[r];
    }

    let total: f64 = imp.iter().sum();
    if total > 0.0 {
        imp.iter_mut().for_each(|v| *v /= total);
    }
    Some(imp)
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Random forest classifier: mean of per-tree leaf distributions
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    n_features: usize,
    n_classes: usize,
    trees: Vec<Tree>,
    feature_importances: Option<Vec<f64>>,
}

impl RandomForestClassifier {
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, String> {
        let ForestArtifact { n_features, n_classes, estimators, feature_importances } = artifact;

        if n_features == 0 || n_classes == 0 {
            return Err("forest must have at least one feature and one class".to_string());
        }
        if estimators.is_empty() {
            return Err("forest has no estimators".to_string());
        }

        let trees = estimators
            .iter()
            .enumerate()
            .map(|(i, t)| Tree::from_artifact(i, t, n_features, n_classes))
            .collect::<Result<Vec<_>, _>>()?;

        let feature_importances = match feature_importances {
            Some(imp) if imp.len() != n_features => {
                return Err(format!(
                    "feature_importances has {} entries, expected {}",
                    imp.len(),
                    n_features
                ));
            }
            Some(imp) => Some(imp),
            None => derive_importances(&estimators, n_features),
        };

        Ok(Self { n_features, n_classes, trees, feature_importances })
    }
}

/// Average of per-tree importances over trees that split at least once
fn derive_importances(estimators: &[TreeArtifact], n_features: usize) -> Option<Vec<f64>> {
    let mut sum = vec![0.0; n_features];
    let mut counted = 0usize;

    for t in estimators {
        let imp = tree_importances(t, n_features)?;
        if t.children_left.len() > 1 {
            sum.iter_mut().zip(&imp).for_each(|(s, v)| *s += v);
            counted += 1;
        }
    }

    if counted == 0 {
        return Some(sum);
    }
    let total: f64 = sum.iter().sum();
    if total > 0.0 {
        sum.iter_mut().for_each(|v| *v /= total);
    }
    Some(sum)
}

impl Classifier for RandomForestClassifier {
    fn name(&self) -> &'static str {
        "RandomForestClassifier"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: ArrayView1<f64>) -> Result<Array1<f64>, InferenceError> {
        self.check_width(&row)?;

        let mut proba = Array1::<f64>::zeros(self.n_classes);
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_proba(&row)) {
                *acc += p;
            }
        }
        proba /= self.trees.len() as f64;

        Ok(proba)
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }
}
