//! Classifier trait and common types

use carenet_core::{Error, FeatureVector, Result};

/// Trait for binary dropout-risk classifiers.
///
/// Implementations are pure functions of the feature vector and are shared
/// read-only across concurrent requests.
pub trait RiskClassifier: Send + Sync {
    /// Probability distribution over classes `{0, 1}`
    fn predict_probability(&self, features: &FeatureVector) -> Result<ClassProbabilities>;

    /// Predicted class label, 0 or 1
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        Ok(self.predict_probability(features)?.label())
    }

    /// Number of features the classifier was trained on
    fn n_features(&self) -> usize;

    /// Per-feature importance scores in training-column order
    fn feature_importances(&self) -> &[f64];

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Probability distribution over the two classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities([f64; 2]);

impl ClassProbabilities {
    /// Build a distribution, rejecting negative or non-finite entries
    pub fn new(negative: f64, positive: f64) -> Result<Self> {
        for p in [negative, positive] {
            if !p.is_finite() || p < 0.0 {
                return Err(Error::classifier(format!(
                    "invalid class probability {}",
                    p
                )));
            }
        }
        Ok(Self([negative, positive]))
    }

    /// Probability of class 0
    pub fn negative(&self) -> f64 {
        self.0[0]
    }

    /// Probability of class 1 (dropout)
    pub fn positive(&self) -> f64 {
        self.0[1]
    }

    /// Arg-max label; ties resolve to class 0
    pub fn label(&self) -> u8 {
        if self.positive() > self.negative() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_argmax() {
        assert_eq!(ClassProbabilities::new(0.2, 0.8).unwrap().label(), 1);
        assert_eq!(ClassProbabilities::new(0.8, 0.2).unwrap().label(), 0);
        assert_eq!(ClassProbabilities::new(0.5, 0.5).unwrap().label(), 0);
    }

    #[test]
    fn test_rejects_invalid_probabilities() {
        assert!(ClassProbabilities::new(-0.1, 1.1).is_err());
        assert!(ClassProbabilities::new(f64::NAN, 0.5).is_err());
    }
}
