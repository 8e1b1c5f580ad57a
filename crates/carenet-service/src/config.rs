//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Serialized classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Ordered feature-name manifest for the classifier
    #[serde(default = "default_feature_names_path")]
    pub feature_names_path: PathBuf,

    /// Load the model at startup instead of on the first request
    #[serde(default = "default_true")]
    pub preload: bool,

    /// Optional YAML reason policy; built-in rules when absent
    #[serde(default)]
    pub reasons_policy: Option<PathBuf>,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Cross-origin settings
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServiceConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model_path = model.clone();
        }

        if let Some(feature_names) = &cli.feature_names {
            config.feature_names_path = feature_names.clone();
        }

        if let Some(policy) = &cli.reasons_policy {
            config.reasons_policy = Some(policy.clone());
        }

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if cli.lazy {
            config.preload = false;
        }

        Ok(config)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            feature_names_path: default_feature_names_path(),
            preload: true,
            reasons_policy: None,
            listen: default_listen(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Accept requests from any origin
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,

    /// Origins accepted when `allow_any_origin` is off
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: Vec::new(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/dropout_model.json")
}

fn default_feature_names_path() -> PathBuf {
    PathBuf::from("models/feature_names.json")
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_true() -> bool {
    true
}
