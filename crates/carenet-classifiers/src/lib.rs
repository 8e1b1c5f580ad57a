//! CARE-NET Classifiers
//!
//! Dropout-risk classification over fixed-order patient feature vectors.
//!
//! This crate provides:
//! - The [`RiskClassifier`] contract consumed by the assessment pipeline
//! - A tree-ensemble classifier loaded from a JSON artifact
//! - Artifact stores and the process-wide [`ModelRegistry`]
//!
//! Inference is a bounded in-memory computation; the only I/O is the
//! one-time artifact load.

pub mod artifact;
pub mod classifier;
pub mod forest;
pub mod registry;

pub use artifact::{ArtifactStore, FileArtifactStore, ModelArtifact, StaticArtifactStore};
pub use classifier::{ClassProbabilities, RiskClassifier};
pub use forest::{ForestClassifier, TreeNode};
pub use registry::ModelRegistry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifact::{ArtifactStore, FileArtifactStore, ModelArtifact};
    pub use crate::classifier::{ClassProbabilities, RiskClassifier};
    pub use crate::forest::ForestClassifier;
    pub use crate::registry::ModelRegistry;
}
