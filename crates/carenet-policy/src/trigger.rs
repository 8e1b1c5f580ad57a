//! Reason rule trigger definitions

use carenet_core::{FeatureField, PatientFeatures};
use serde::{Deserialize, Serialize};

/// Trigger condition for a reason rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Compare one patient attribute against a constant
    Threshold {
        /// Attribute to read
        field: FeatureField,

        /// Comparison operator
        op: Comparison,

        /// Constant on the right-hand side
        value: f64,
    },

    /// Composite trigger (AND/OR logic)
    Composite {
        /// Logic operator
        operator: CompositeOperator,

        /// Sub-triggers
        triggers: Vec<Trigger>,
    },
}

impl Trigger {
    /// Shorthand for a threshold trigger
    pub fn threshold(field: FeatureField, op: Comparison, value: f64) -> Self {
        Self::Threshold { field, op, value }
    }

    /// All sub-triggers must fire
    pub fn all(triggers: Vec<Trigger>) -> Self {
        Self::Composite {
            operator: CompositeOperator::And,
            triggers,
        }
    }

    /// Any sub-trigger must fire
    pub fn any(triggers: Vec<Trigger>) -> Self {
        Self::Composite {
            operator: CompositeOperator::Or,
            triggers,
        }
    }

    /// Evaluate the trigger against a feature record
    pub fn fires(&self, features: &PatientFeatures) -> bool {
        match self {
            Self::Threshold { field, op, value } => op.apply(features.get(*field), *value),
            Self::Composite {
                operator: CompositeOperator::And,
                triggers,
            } => triggers.iter().all(|t| t.fires(features)),
            Self::Composite {
                operator: CompositeOperator::Or,
                triggers,
            } => triggers.iter().any(|t| t.fires(features)),
        }
    }
}

/// Comparison operator for threshold triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl Comparison {
    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }
}

/// Operator for composite triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeOperator {
    And,
    Or,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_trigger_json() {
        let json = r#"{
            "type": "threshold",
            "field": "missed_appointments",
            "op": "gt",
            "value": 3
        }"#;
        let trigger: Trigger = serde_json::from_str(json).unwrap();

        assert_eq!(
            trigger,
            Trigger::threshold(FeatureField::MissedAppointments, Comparison::Gt, 3.0)
        );
    }

    #[test]
    fn test_composite_and() {
        let trigger = Trigger::all(vec![
            Trigger::threshold(FeatureField::FinancialScore, Comparison::Lt, 4.0),
            Trigger::threshold(FeatureField::SchemeEnrolled, Comparison::Eq, 0.0),
        ]);

        let poor = PatientFeatures::default().with(FeatureField::FinancialScore, 2.0);
        assert!(trigger.fires(&poor));
        assert!(!trigger.fires(&poor.with(FeatureField::SchemeEnrolled, 1.0)));
        assert!(!trigger.fires(&PatientFeatures::default()));
    }

    #[test]
    fn test_composite_or() {
        let trigger = Trigger::any(vec![
            Trigger::threshold(FeatureField::HospitalDelayDays, Comparison::Ge, 30.0),
            Trigger::threshold(FeatureField::TreatmentStage, Comparison::Ne, 1.0),
        ]);

        assert!(!trigger.fires(&PatientFeatures::default()));
        assert!(trigger.fires(&PatientFeatures::default().with(FeatureField::TreatmentStage, 3.0)));
    }

    #[test]
    fn test_comparisons_are_strict_where_named() {
        assert!(!Comparison::Gt.apply(3.0, 3.0));
        assert!(Comparison::Ge.apply(3.0, 3.0));
        assert!(!Comparison::Lt.apply(4.0, 4.0));
        assert!(Comparison::Le.apply(4.0, 4.0));
    }
}
