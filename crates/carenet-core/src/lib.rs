//! CARE-NET Core
//!
//! Core types and utilities shared across CARE-NET components.
//!
//! This crate provides:
//! - Patient feature records, feature manifests, and ordered feature vectors
//! - Risk assessment and feature importance response types
//! - Error types and result handling

pub mod error;
pub mod features;
pub mod types;

pub use error::{Error, Result};
pub use features::{FeatureField, FeatureManifest, FeatureVector, PatientFeatures};
pub use types::{
    probability_percent, round_to, FeatureImportance, RiskAssessment, RiskLevel,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::features::{FeatureField, FeatureManifest, FeatureVector, PatientFeatures};
    pub use crate::types::{FeatureImportance, RiskAssessment, RiskLevel};
}
