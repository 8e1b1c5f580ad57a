//! Reason policies and rule definitions

use carenet_core::{Error, FeatureField, PatientFeatures, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::trigger::{Comparison, Trigger};

/// Sentinel reported when no rule fires
pub const NO_RISK_FACTORS: &str = "No major risk factors identified";

/// An ordered set of reason rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonPolicy {
    /// Policy name
    pub name: String,

    /// Description of what this policy explains
    #[serde(default)]
    pub description: String,

    /// Rules, evaluated and reported in this order
    pub rules: Vec<Rule>,
}

impl ReasonPolicy {
    /// Load a policy from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::policy(format!("invalid reason policy: {}", e)))
    }

    /// Load a policy from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::policy(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Messages of every enabled rule that fires, in rule order.
    ///
    /// Never empty: falls back to [`NO_RISK_FACTORS`].
    pub fn primary_reasons(&self, features: &PatientFeatures) -> Vec<String> {
        let reasons: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| rule.enabled && rule.trigger.fires(features))
            .map(|rule| rule.message.clone())
            .collect();

        if reasons.is_empty() {
            vec![NO_RISK_FACTORS.to_string()]
        } else {
            reasons
        }
    }
}

impl Default for ReasonPolicy {
    /// The five built-in dropout risk factors
    fn default() -> Self {
        use Comparison::{Eq, Gt, Lt};
        use FeatureField as F;

        Self {
            name: "dropout-risk-factors".to_string(),
            description: "Threshold rules explaining treatment dropout risk".to_string(),
            rules: vec![
                Rule::new(
                    "missed-appointments",
                    "Multiple missed appointments",
                    Trigger::threshold(F::MissedAppointments, Gt, 3.0),
                ),
                Rule::new(
                    "financial-barrier",
                    "Financial barrier with no scheme support",
                    Trigger::all(vec![
                        Trigger::threshold(F::FinancialScore, Lt, 4.0),
                        Trigger::threshold(F::SchemeEnrolled, Eq, 0.0),
                    ]),
                ),
                Rule::new(
                    "treatment-gap",
                    "Extended treatment gap (over 90 days)",
                    Trigger::threshold(F::DaysSinceLastVisit, Gt, 90.0),
                ),
                Rule::new(
                    "no-follow-up",
                    "No follow-up communication received",
                    Trigger::threshold(F::FollowUpCallsReceived, Eq, 0.0),
                ),
                Rule::new(
                    "hospital-delay",
                    "Significant hospital processing delays",
                    Trigger::threshold(F::HospitalDelayDays, Gt, 14.0),
                ),
            ],
        }
    }
}

/// A single rule within a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier
    pub name: String,

    /// Message reported when the rule fires
    pub message: String,

    /// Trigger condition
    pub trigger: Trigger,

    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, message: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            trigger,
            enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}
