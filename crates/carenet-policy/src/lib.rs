//! CARE-NET Risk Interpreter
//!
//! Deterministic reasoning layered on top of the statistical classifier.
//!
//! Given a rounded probability and the raw feature record it derives:
//! - A risk tier (Low / Medium / High) from fixed probability thresholds
//! - The contributing risk factors, from an ordered list of threshold rules
//! - A recommended action for the tier
//!
//! Reason rules are data and can be loaded from YAML.

pub mod engine;
pub mod rule;
pub mod trigger;

pub use engine::{
    recommendation, risk_level, Interpretation, RiskInterpreter, HIGH_RISK_THRESHOLD,
    MEDIUM_RISK_THRESHOLD,
};
pub use rule::{ReasonPolicy, Rule, NO_RISK_FACTORS};
pub use trigger::{Comparison, CompositeOperator, Trigger};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{recommendation, risk_level, Interpretation, RiskInterpreter};
    pub use crate::rule::{ReasonPolicy, Rule};
    pub use crate::trigger::{Comparison, Trigger};
}
