//! Core assessment types for CARE-NET

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse dropout-risk tier derived from a probability percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured response for a single patient prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Predicted class, 0 (stays) or 1 (drops out)
    pub dropout_risk: u8,

    /// Positive-class probability as a percentage, one decimal place
    pub risk_probability: f64,

    /// Tier computed from `risk_probability`
    pub risk_level: RiskLevel,

    /// Triggered risk factors, never empty
    pub primary_reasons: Vec<String>,

    /// Canned action for the tier
    pub recommendation: String,
}

/// Importance of a single feature in the loaded classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Round to a fixed number of decimal places.
///
/// Rounds the exact binary value, so `70.05` (stored just below the half)
/// becomes `70.0`. Scaling by a power of ten first would round it up.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Convert a probability in `[0, 1]` to a percentage rounded to one decimal
pub fn probability_percent(probability: f64) -> f64 {
    round_to(probability * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_serializes_as_title_case() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"High\"");
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_probability_percent() {
        assert_eq!(probability_percent(0.0), 0.0);
        assert_eq!(probability_percent(1.0), 100.0);
        assert_eq!(probability_percent(0.7), 70.0);
        assert_eq!(probability_percent(0.70123), 70.1);
        assert_eq!(probability_percent(0.40049), 40.0);
    }

    #[test]
    fn test_probability_percent_rounds_stored_value() {
        // 0.7005 * 100 is stored as 70.04999..., 0.4005 * 100 as 40.05000...
        assert_eq!(probability_percent(0.7005), 70.0);
        assert_eq!(probability_percent(0.4005), 40.1);
        assert_eq!(round_to(70.05, 1), 70.0);
    }

    #[test]
    fn test_round_to_four_decimals() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(0.5, 4), 0.5);
    }

    #[test]
    fn test_assessment_wire_shape() {
        let assessment = RiskAssessment {
            dropout_risk: 1,
            risk_probability: 82.7,
            risk_level: RiskLevel::High,
            primary_reasons: vec!["Multiple missed appointments".to_string()],
            recommendation: "act".to_string(),
        };

        let value = serde_json::to_value(&assessment).unwrap();
        assert_eq!(value["dropout_risk"], 1);
        assert_eq!(value["risk_probability"], 82.7);
        assert_eq!(value["risk_level"], "High");
        assert_eq!(value["primary_reasons"][0], "Multiple missed appointments");
    }
}
