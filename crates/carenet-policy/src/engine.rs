//! Risk interpretation: tiering, reasons, and recommendations
//!
//! The three parts are independent. The tier depends only on the
//! probability, the reasons only on the raw feature record, and the
//! recommendation only on the tier.

use carenet_core::{PatientFeatures, RiskLevel};
use std::path::Path;
use tracing::info;

use crate::ReasonPolicy;

/// Lower edge (exclusive) of the High tier, in percent
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;

/// Lower edge (exclusive) of the Medium tier, in percent
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

/// Tier for a probability percentage: `(70, 100]` High, `(40, 70]` Medium,
/// everything else Low
pub fn risk_level(probability_percent: f64) -> RiskLevel {
    if probability_percent > HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if probability_percent > MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Canned follow-up action for a tier
pub fn recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => {
            "Immediate intervention required. Assign ASHA worker and enroll in financial scheme."
        }
        RiskLevel::Medium => "Schedule follow-up within 7 days and assess scheme eligibility.",
        RiskLevel::Low => "Continue regular monitoring. Next check-in in 30 days.",
    }
}

/// Output of interpreting one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub risk_level: RiskLevel,
    pub primary_reasons: Vec<String>,
    pub recommendation: String,
}

/// Rule-based interpreter layered on top of the classifier
#[derive(Debug, Clone, Default)]
pub struct RiskInterpreter {
    policy: ReasonPolicy,
}

impl RiskInterpreter {
    pub fn new(policy: ReasonPolicy) -> Self {
        Self { policy }
    }

    /// Interpreter using the built-in rules, or the YAML policy at `path`
    pub fn from_optional_file(path: Option<&Path>) -> carenet_core::Result<Self> {
        let policy = match path {
            Some(path) => {
                let policy = ReasonPolicy::from_file(path)?;
                info!(
                    "Loaded reason policy '{}' with {} rules from {:?}",
                    policy.name,
                    policy.rules.len(),
                    path
                );
                policy
            }
            None => ReasonPolicy::default(),
        };
        Ok(Self::new(policy))
    }

    pub fn policy(&self) -> &ReasonPolicy {
        &self.policy
    }

    /// Tier, reasons, and recommendation for a rounded probability percentage
    pub fn interpret(
        &self,
        probability_percent: f64,
        features: &PatientFeatures,
    ) -> Interpretation {
        let level = risk_level(probability_percent);
        Interpretation {
            risk_level: level,
            primary_reasons: self.policy.primary_reasons(features),
            recommendation: recommendation(level).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NO_RISK_FACTORS;
    use carenet_core::FeatureField;
    use proptest::prelude::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(risk_level(70.0), RiskLevel::Medium);
        assert_eq!(risk_level(70.1), RiskLevel::High);
        assert_eq!(risk_level(40.0), RiskLevel::Low);
        assert_eq!(risk_level(40.1), RiskLevel::Medium);
        assert_eq!(risk_level(0.0), RiskLevel::Low);
        assert_eq!(risk_level(100.0), RiskLevel::High);
    }

    #[test]
    fn test_recommendations() {
        assert!(recommendation(RiskLevel::High).contains("ASHA worker"));
        assert!(recommendation(RiskLevel::Medium).contains("7 days"));
        assert!(recommendation(RiskLevel::Low).contains("30 days"));
    }

    #[test]
    fn test_interpret_combines_independent_parts() {
        let interpreter = RiskInterpreter::default();
        let features = PatientFeatures::default().with(FeatureField::FollowUpCallsReceived, 2.0);

        // High tier with no firing rules: reasons do not follow the tier
        let high = interpreter.interpret(91.3, &features);
        assert_eq!(high.risk_level, RiskLevel::High);
        assert_eq!(high.primary_reasons, vec![NO_RISK_FACTORS]);
        assert_eq!(high.recommendation, recommendation(RiskLevel::High));

        let missed = features.with(FeatureField::MissedAppointments, 6.0);
        let low = interpreter.interpret(12.0, &missed);
        assert_eq!(low.risk_level, RiskLevel::Low);
        assert_eq!(low.primary_reasons, vec!["Multiple missed appointments"]);
    }

    #[test]
    fn test_from_optional_file() {
        let default = RiskInterpreter::from_optional_file(None).unwrap();
        assert_eq!(default.policy().rules.len(), 5);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reasons.yaml");
        std::fs::write(
            &path,
            r#"
name: single
rules:
  - name: r
    message: m
    trigger: {type: threshold, field: scheme_enrolled, op: eq, value: 1}
"#,
        )
        .unwrap();

        let custom = RiskInterpreter::from_optional_file(Some(path.as_path())).unwrap();
        assert_eq!(custom.policy().name, "single");

        let missing = dir.path().join("missing.yaml");
        assert!(RiskInterpreter::from_optional_file(Some(missing.as_path())).is_err());
    }

    proptest! {
        #[test]
        fn prop_tier_is_total_and_monotonic(a in 0u32..=1000, b in 0u32..=1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = lo as f64 / 10.0;
            let hi = hi as f64 / 10.0;

            let rank = |level: RiskLevel| match level {
                RiskLevel::Low => 0,
                RiskLevel::Medium => 1,
                RiskLevel::High => 2,
            };
            prop_assert!(rank(risk_level(lo)) <= rank(risk_level(hi)));

            let expected = if hi > 70.0 {
                RiskLevel::High
            } else if hi > 40.0 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            prop_assert_eq!(risk_level(hi), expected);
        }
    }
}
