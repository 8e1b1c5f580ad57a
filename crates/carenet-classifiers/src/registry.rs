//! Process-wide registry owning the loaded model artifact
//!
//! The registry starts Unloaded and moves to Loaded on the first successful
//! [`ModelRegistry::ensure_loaded`] call, either at startup or on the first
//! request. Concurrent first callers share a single load. A failed load
//! leaves the registry Unloaded so the next caller retries. There is no
//! reload path: once loaded the artifact lives until the process exits.

use carenet_core::{Error, FeatureImportance, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::artifact::{ArtifactStore, ModelArtifact};

/// Lazily-initialized holder of the shared [`ModelArtifact`]
pub struct ModelRegistry {
    store: Arc<dyn ArtifactStore>,
    artifact: OnceCell<Arc<ModelArtifact>>,
}

impl ModelRegistry {
    /// Create an unloaded registry backed by `store`
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            artifact: OnceCell::new(),
        }
    }

    /// Load the artifact if needed and return a shared handle to it
    pub async fn ensure_loaded(&self) -> Result<Arc<ModelArtifact>> {
        let artifact = self
            .artifact
            .get_or_try_init(|| async {
                info!("Loading model artifact from {}", self.store.describe());
                match self.store.load().await {
                    Ok(artifact) => {
                        info!(
                            classifier = artifact.classifier().name(),
                            features = artifact.manifest().len(),
                            "✓ Model artifact loaded"
                        );
                        Ok(Arc::new(artifact))
                    }
                    Err(e) => {
                        warn!("✗ Failed to load model artifact: {}", e);
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(artifact))
    }

    /// Whether the registry is in the Loaded state
    pub fn is_loaded(&self) -> bool {
        self.artifact.initialized()
    }

    /// The loaded artifact, if any
    pub fn get(&self) -> Option<Arc<ModelArtifact>> {
        self.artifact.get().cloned()
    }

    /// Importance per manifest feature, most important first.
    ///
    /// Only valid once loaded.
    pub fn feature_importance(&self) -> Result<Vec<FeatureImportance>> {
        self.get()
            .map(|artifact| artifact.feature_importance())
            .ok_or_else(|| Error::classifier("model not loaded"))
    }
}
