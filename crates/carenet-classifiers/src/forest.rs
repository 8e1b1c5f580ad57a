//! Random-forest classifier deserialized from a JSON artifact
//!
//! The artifact is produced offline by the training job. Each tree routes a
//! sample left when `x[feature] <= threshold` and right otherwise; the
//! forest probability is the mean of the reached leaf distributions.

use carenet_core::{Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassProbabilities, RiskClassifier};

/// Tolerance for leaf distributions summing to one
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// A node of a serialized decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// Terminal node holding a class distribution
    Leaf { class_probs: Vec<f64> },

    /// Internal node splitting on a single feature
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Build a leaf node
    pub fn leaf(class_probs: Vec<f64>) -> Self {
        Self::Leaf { class_probs }
    }

    /// Build a split node
    pub fn split(feature: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        Self::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Walk the tree to the leaf reached by `features`
    fn leaf_for(&self, features: &[f64]) -> &[f64] {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { class_probs } => return class_probs,
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Leaf { class_probs } => {
                    if class_probs.len() != n_classes {
                        return Err(Error::artifact(format!(
                            "leaf has {} class probabilities, expected {}",
                            class_probs.len(),
                            n_classes
                        )));
                    }
                    if class_probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
                        return Err(Error::artifact("leaf holds an invalid probability"));
                    }
                    let sum: f64 = class_probs.iter().sum();
                    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                        return Err(Error::artifact(format!(
                            "leaf probabilities sum to {}, expected 1",
                            sum
                        )));
                    }
                }
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(Error::artifact(format!(
                            "split on feature index {} but model has {} features",
                            feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(Error::artifact("split threshold is not finite"));
                    }
                    stack.push(&**left);
                    stack.push(&**right);
                }
            }
        }
        Ok(())
    }
}

/// Binary tree-ensemble classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    /// Model name or version tag
    #[serde(default = "default_name")]
    name: String,

    /// Number of classes; the risk contract is binary
    n_classes: usize,

    /// Number of input features
    n_features: usize,

    /// Normalized impurity-based importances, one per feature
    feature_importances: Vec<f64>,

    /// Trees in the ensemble
    trees: Vec<TreeNode>,
}

fn default_name() -> String {
    "dropout-forest".to_string()
}

impl ForestClassifier {
    /// Build and validate a forest
    pub fn new(
        name: impl Into<String>,
        n_features: usize,
        feature_importances: Vec<f64>,
        trees: Vec<TreeNode>,
    ) -> Result<Self> {
        let forest = Self {
            name: name.into(),
            n_classes: 2,
            n_features,
            feature_importances,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Parse and validate a forest from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        let forest: Self = serde_json::from_str(json)
            .map_err(|e| Error::artifact(format!("malformed classifier artifact: {}", e)))?;
        forest.validate()?;
        Ok(forest)
    }

    /// Check structural invariants of the artifact
    pub fn validate(&self) -> Result<()> {
        if self.n_classes != 2 {
            return Err(Error::artifact(format!(
                "expected a binary classifier, artifact has {} classes",
                self.n_classes
            )));
        }
        if self.trees.is_empty() {
            return Err(Error::artifact("classifier artifact contains no trees"));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(Error::artifact(format!(
                "{} feature importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        if self.feature_importances.iter().any(|v| !v.is_finite()) {
            return Err(Error::artifact("feature importance is not finite"));
        }
        for tree in &self.trees {
            tree.validate(self.n_features, self.n_classes)?;
        }
        Ok(())
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl RiskClassifier for ForestClassifier {
    fn predict_probability(&self, features: &FeatureVector) -> Result<ClassProbabilities> {
        let x = features.values();
        if x.len() != self.n_features {
            return Err(Error::feature(format!(
                "feature vector has {} values, classifier expects {}",
                x.len(),
                self.n_features
            )));
        }

        let mut totals = [0.0f64; 2];
        for tree in &self.trees {
            let leaf = tree.leaf_for(x);
            totals[0] += leaf[0];
            totals[1] += leaf[1];
        }

        let n = self.trees.len() as f64;
        ClassProbabilities::new(totals[0] / n, totals[1] / n)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    fn name(&self) -> &str {
        &self.name
    }
}
