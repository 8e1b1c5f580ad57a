use carenet_classifiers::{FileArtifactStore, ModelRegistry};
use carenet_policy::RiskInterpreter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use crate::predictor::Predictor;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,

    /// Assessment pipeline over the shared model registry
    pub predictor: Arc<Predictor>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state from configuration.
    ///
    /// The model itself is not loaded here.
    pub fn new(config: ServiceConfig, metrics_handle: PrometheusHandle) -> anyhow::Result<Self> {
        let store = FileArtifactStore::new(&config.model_path, &config.feature_names_path);
        let registry = Arc::new(ModelRegistry::new(Arc::new(store)));

        let interpreter = RiskInterpreter::from_optional_file(config.reasons_policy.as_deref())?;
        info!(
            "Reason policy '{}' active with {} rules",
            interpreter.policy().name,
            interpreter.policy().rules.len()
        );

        Ok(Self::with_predictor(
            config,
            Predictor::new(registry, interpreter),
            metrics_handle,
        ))
    }

    /// Build state around an existing predictor
    pub fn with_predictor(
        config: ServiceConfig,
        predictor: Predictor,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            predictor: Arc::new(predictor),
            metrics_handle,
        }
    }
}
