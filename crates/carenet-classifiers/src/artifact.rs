//! Model artifacts and the stores they are loaded from

use async_trait::async_trait;
use carenet_core::{round_to, Error, FeatureImportance, FeatureManifest, Result};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::classifier::RiskClassifier;
use crate::forest::ForestClassifier;

/// A loaded classifier together with the feature manifest it was trained on.
///
/// Immutable once built; cheap to clone.
#[derive(Clone)]
pub struct ModelArtifact {
    classifier: Arc<dyn RiskClassifier>,
    manifest: FeatureManifest,
}

impl ModelArtifact {
    /// Pair a classifier with its manifest, checking that they agree
    pub fn new(classifier: Arc<dyn RiskClassifier>, manifest: FeatureManifest) -> Result<Self> {
        if classifier.n_features() != manifest.len() {
            return Err(Error::artifact(format!(
                "classifier '{}' expects {} features but manifest lists {}",
                classifier.name(),
                classifier.n_features(),
                manifest.len()
            )));
        }
        if classifier.feature_importances().len() != manifest.len() {
            return Err(Error::artifact(format!(
                "classifier '{}' reports {} importances for {} manifest features",
                classifier.name(),
                classifier.feature_importances().len(),
                manifest.len()
            )));
        }

        Ok(Self {
            classifier,
            manifest,
        })
    }

    pub fn classifier(&self) -> &Arc<dyn RiskClassifier> {
        &self.classifier
    }

    pub fn manifest(&self) -> &FeatureManifest {
        &self.manifest
    }

    /// Feature importances paired with manifest names, rounded to four
    /// decimals and sorted from most to least important. Equal scores keep
    /// manifest order.
    pub fn feature_importance(&self) -> Vec<FeatureImportance> {
        let mut pairs: Vec<FeatureImportance> = self
            .manifest
            .names()
            .zip(self.classifier.feature_importances())
            .map(|(name, importance)| FeatureImportance {
                feature: name.to_string(),
                importance: round_to(*importance, 4),
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(Ordering::Equal)
        });
        pairs
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("classifier", &self.classifier.name())
            .field("manifest", &self.manifest)
            .finish()
    }
}

/// Durable storage holding a classifier artifact and its manifest
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Load both halves of the artifact; either failing fails the load
    async fn load(&self) -> Result<ModelArtifact>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Artifact store backed by two JSON files on disk
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    model_path: PathBuf,
    feature_names_path: PathBuf,
}

impl FileArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>, feature_names_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            feature_names_path: feature_names_path.into(),
        }
    }
}

async fn read_artifact_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::artifact(format!("failed to read {}: {}", path.display(), e)))
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn load(&self) -> Result<ModelArtifact> {
        debug!("Reading classifier artifact from {:?}", self.model_path);
        let model_json = read_artifact_file(&self.model_path).await?;
        let forest = ForestClassifier::from_json(&model_json)?;

        debug!("Reading feature manifest from {:?}", self.feature_names_path);
        let manifest_json = read_artifact_file(&self.feature_names_path).await?;
        let manifest: FeatureManifest = serde_json::from_str(&manifest_json)
            .map_err(|e| Error::artifact(format!("malformed feature manifest: {}", e)))?;

        ModelArtifact::new(Arc::new(forest), manifest)
    }

    fn describe(&self) -> String {
        format!(
            "{} + {}",
            self.model_path.display(),
            self.feature_names_path.display()
        )
    }
}

/// Store that hands out an artifact already held in memory
#[derive(Debug, Clone)]
pub struct StaticArtifactStore {
    artifact: ModelArtifact,
}

impl StaticArtifactStore {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }
}

#[async_trait]
impl ArtifactStore for StaticArtifactStore {
    async fn load(&self) -> Result<ModelArtifact> {
        Ok(self.artifact.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory classifier '{}'", self.artifact.classifier.name())
    }
}
