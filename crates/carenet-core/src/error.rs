//! Error types for CARE-NET

/// Result type alias using CARE-NET's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for CARE-NET operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Feature extraction or schema mismatch errors
    #[error("feature error: {0}")]
    Feature(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Artifact loading and validation errors
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Reason policy errors
    #[error("policy error: {0}")]
    Policy(String),
}

impl Error {
    /// Create a new feature error
    pub fn feature(msg: impl Into<String>) -> Self {
        Self::Feature(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new policy error
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Feature(_) => "feature",
            Self::Classifier(_) => "classifier",
            Self::Artifact(_) => "artifact",
            Self::Policy(_) => "policy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_message() {
        let err = Error::artifact("missing trees");
        assert_eq!(err.to_string(), "artifact error: missing trees");
        assert_eq!(err.kind(), "artifact");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(Error::feature("x").kind(), "feature");
        assert_eq!(Error::classifier("x").kind(), "classifier");
        assert_eq!(Error::policy("x").kind(), "policy");
    }
}
