//! Request to assessment pipeline
//!
//! Features are encoded in manifest order, classified, and the positive
//! class probability is rounded to one decimal percent before the tier is
//! derived. The rounded value is the one reported, so tier and displayed
//! probability always agree.

use carenet_classifiers::{ClassProbabilities, ModelRegistry};
use carenet_core::{
    probability_percent, FeatureImportance, PatientFeatures, Result, RiskAssessment,
};
use carenet_policy::RiskInterpreter;
use std::sync::Arc;
use tracing::debug;

/// Combines the model registry and the risk interpreter
pub struct Predictor {
    registry: Arc<ModelRegistry>,
    interpreter: RiskInterpreter,
}

impl Predictor {
    pub fn new(registry: Arc<ModelRegistry>, interpreter: RiskInterpreter) -> Self {
        Self {
            registry,
            interpreter,
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Produce a full risk assessment, loading the model on first use
    pub async fn assess(&self, features: &PatientFeatures) -> Result<RiskAssessment> {
        let artifact = self.registry.ensure_loaded().await?;
        let classifier = artifact.classifier();

        let vector = features.to_vector(artifact.manifest());
        let dropout_risk = classifier.predict(&vector)?;
        let probabilities = classifier.predict_probability(&vector)?;

        debug!(
            classifier = classifier.name(),
            dropout_risk,
            positive = probabilities.positive(),
            "Classified feature vector"
        );

        Ok(assemble(features, dropout_risk, probabilities, &self.interpreter))
    }

    /// Feature importances, loading the model on first use
    pub async fn feature_importance(&self) -> Result<Vec<FeatureImportance>> {
        self.registry.ensure_loaded().await?;
        self.registry.feature_importance()
    }
}

/// Compose classifier output and interpreter output into one record
pub fn assemble(
    features: &PatientFeatures,
    dropout_risk: u8,
    probabilities: ClassProbabilities,
    interpreter: &RiskInterpreter,
) -> RiskAssessment {
    let risk_probability = probability_percent(probabilities.positive());
    let interpretation = interpreter.interpret(risk_probability, features);

    RiskAssessment {
        dropout_risk,
        risk_probability,
        risk_level: interpretation.risk_level,
        primary_reasons: interpretation.primary_reasons,
        recommendation: interpretation.recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carenet_classifiers::{ModelArtifact, RiskClassifier, StaticArtifactStore};
    use carenet_core::{FeatureField, FeatureManifest, FeatureVector, RiskLevel};
    use carenet_policy::{recommendation, NO_RISK_FACTORS};

    /// Classifier returning a fixed positive-class probability
    struct FixedClassifier {
        positive: f64,
        importances: Vec<f64>,
    }

    impl FixedClassifier {
        fn new(positive: f64) -> Self {
            Self {
                positive,
                importances: vec![1.0 / 7.0; 7],
            }
        }
    }

    impl RiskClassifier for FixedClassifier {
        fn predict_probability(&self, features: &FeatureVector) -> Result<ClassProbabilities> {
            assert_eq!(features.len(), 7);
            ClassProbabilities::new(1.0 - self.positive, self.positive)
        }

        fn n_features(&self) -> usize {
            7
        }

        fn feature_importances(&self) -> &[f64] {
            &self.importances
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn predictor(positive: f64) -> Predictor {
        let artifact = ModelArtifact::new(
            Arc::new(FixedClassifier::new(positive)),
            FeatureManifest::standard(),
        )
        .unwrap();
        let registry = ModelRegistry::new(Arc::new(StaticArtifactStore::new(artifact)));
        Predictor::new(Arc::new(registry), RiskInterpreter::default())
    }

    #[tokio::test]
    async fn test_defaults_with_high_probability() {
        let assessment = predictor(0.75)
            .assess(&PatientFeatures::default())
            .await
            .unwrap();

        assert_eq!(assessment.dropout_risk, 1);
        assert_eq!(assessment.risk_probability, 75.0);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.recommendation, recommendation(RiskLevel::High));
        assert_eq!(
            assessment.primary_reasons,
            vec!["No follow-up communication received"]
        );
    }

    #[tokio::test]
    async fn test_tier_uses_rounded_probability() {
        // 0.70049 -> 70.0 after rounding, which is Medium, not High
        let assessment = predictor(0.70049)
            .assess(&PatientFeatures::default())
            .await
            .unwrap();
        assert_eq!(assessment.risk_probability, 70.0);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);

        let assessment = predictor(0.40051)
            .assess(&PatientFeatures::default())
            .await
            .unwrap();
        assert_eq!(assessment.risk_probability, 40.1);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_tier_at_stored_half_boundaries() {
        let assessment = predictor(0.7005)
            .assess(&PatientFeatures::default())
            .await
            .unwrap();
        assert_eq!(assessment.risk_probability, 70.0);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);

        let assessment = predictor(0.4005)
            .assess(&PatientFeatures::default())
            .await
            .unwrap();
        assert_eq!(assessment.risk_probability, 40.1);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_label_agrees_with_probabilities() {
        for (positive, label) in [(0.2, 0), (0.5, 0), (0.51, 1), (0.9, 1)] {
            let assessment = predictor(positive)
                .assess(&PatientFeatures::default())
                .await
                .unwrap();
            assert_eq!(assessment.dropout_risk, label, "positive = {}", positive);
        }
    }

    #[tokio::test]
    async fn test_low_risk_with_no_factors() {
        let features = PatientFeatures::default().with(FeatureField::FollowUpCallsReceived, 3.0);
        let assessment = predictor(0.08).assess(&features).await.unwrap();

        assert_eq!(assessment.dropout_risk, 0);
        assert_eq!(assessment.risk_probability, 8.0);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.primary_reasons, vec![NO_RISK_FACTORS]);
    }

    #[tokio::test]
    async fn test_feature_importance_triggers_load() {
        let predictor = predictor(0.5);
        assert!(!predictor.registry().is_loaded());

        let importance = predictor.feature_importance().await.unwrap();
        assert_eq!(importance.len(), 7);
        assert!(predictor.registry().is_loaded());
    }

    #[test]
    fn test_assemble_is_consistent() {
        let interpreter = RiskInterpreter::default();
        let features = PatientFeatures::default().with(FeatureField::MissedAppointments, 5.0);
        let probabilities = ClassProbabilities::new(0.55, 0.45).unwrap();

        let assessment = assemble(&features, 0, probabilities, &interpreter);
        assert_eq!(assessment.risk_probability, 45.0);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert_eq!(assessment.recommendation, recommendation(RiskLevel::Medium));
        assert_eq!(assessment.primary_reasons[0], "Multiple missed appointments");
    }
}
