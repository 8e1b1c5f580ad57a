//! Patient feature records and the fixed-order vectors fed to classifiers
//!
//! A request carries any subset of the seven known attributes. Missing
//! attributes take their documented default, unknown keys are ignored, and
//! values are passed through without range checks. The order of the numeric
//! vector is dictated by the [`FeatureManifest`] the classifier was trained
//! with, never by the order of fields in the request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One of the seven named patient attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    MissedAppointments,
    DaysSinceLastVisit,
    FinancialScore,
    TreatmentStage,
    FollowUpCallsReceived,
    HospitalDelayDays,
    SchemeEnrolled,
}

impl FeatureField {
    /// All fields in training-schema order
    pub const ALL: [FeatureField; 7] = [
        Self::MissedAppointments,
        Self::DaysSinceLastVisit,
        Self::FinancialScore,
        Self::TreatmentStage,
        Self::FollowUpCallsReceived,
        Self::HospitalDelayDays,
        Self::SchemeEnrolled,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissedAppointments => "missed_appointments",
            Self::DaysSinceLastVisit => "days_since_last_visit",
            Self::FinancialScore => "financial_score",
            Self::TreatmentStage => "treatment_stage",
            Self::FollowUpCallsReceived => "follow_up_calls_received",
            Self::HospitalDelayDays => "hospital_delay_days",
            Self::SchemeEnrolled => "scheme_enrolled",
        }
    }

    /// Value used when the attribute is absent from a request
    pub fn default_value(&self) -> f64 {
        match self {
            Self::FinancialScore => 5.0,
            Self::TreatmentStage => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::feature(format!("unknown feature '{}'", s)))
    }
}

/// Patient engagement attributes with defaults applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientFeatures {
    pub missed_appointments: f64,
    pub days_since_last_visit: f64,
    pub financial_score: f64,
    pub treatment_stage: f64,
    pub follow_up_calls_received: f64,
    pub hospital_delay_days: f64,
    pub scheme_enrolled: f64,
}

impl Default for PatientFeatures {
    fn default() -> Self {
        RawPatientFeatures::default().into()
    }
}

impl PatientFeatures {
    /// Extract a feature record from an arbitrary JSON object.
    ///
    /// Unknown keys are ignored and `null` counts as absent. A known key
    /// holding a non-numeric value is a feature error.
    pub fn extract(raw: &serde_json::Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(Error::feature("expected a JSON object of patient features"));
        }

        let parsed = RawPatientFeatures::deserialize(raw)
            .map_err(|e| Error::feature(format!("invalid feature value: {}", e)))?;

        Ok(parsed.into())
    }

    /// Read a single attribute
    pub fn get(&self, field: FeatureField) -> f64 {
        match field {
            FeatureField::MissedAppointments => self.missed_appointments,
            FeatureField::DaysSinceLastVisit => self.days_since_last_visit,
            FeatureField::FinancialScore => self.financial_score,
            FeatureField::TreatmentStage => self.treatment_stage,
            FeatureField::FollowUpCallsReceived => self.follow_up_calls_received,
            FeatureField::HospitalDelayDays => self.hospital_delay_days,
            FeatureField::SchemeEnrolled => self.scheme_enrolled,
        }
    }

    /// Set a single attribute
    pub fn with(mut self, field: FeatureField, value: f64) -> Self {
        let slot = match field {
            FeatureField::MissedAppointments => &mut self.missed_appointments,
            FeatureField::DaysSinceLastVisit => &mut self.days_since_last_visit,
            FeatureField::FinancialScore => &mut self.financial_score,
            FeatureField::TreatmentStage => &mut self.treatment_stage,
            FeatureField::FollowUpCallsReceived => &mut self.follow_up_calls_received,
            FeatureField::HospitalDelayDays => &mut self.hospital_delay_days,
            FeatureField::SchemeEnrolled => &mut self.scheme_enrolled,
        };
        *slot = value;
        self
    }

    /// Encode the record in manifest order
    pub fn to_vector(&self, manifest: &FeatureManifest) -> FeatureVector {
        FeatureVector(manifest.fields().iter().map(|f| self.get(*f)).collect())
    }
}

/// Wire form of [`PatientFeatures`] where every attribute is optional
#[derive(Debug, Default, Deserialize)]
struct RawPatientFeatures {
    #[serde(default, deserialize_with = "numeric_or_flag")]
    missed_appointments: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_flag")]
    days_since_last_visit: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_flag")]
    financial_score: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_flag")]
    treatment_stage: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_flag")]
    follow_up_calls_received: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_flag")]
    hospital_delay_days: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_flag")]
    scheme_enrolled: Option<f64>,
}

/// A feature value as sent by clients: a number, or a boolean flag
#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Number(f64),
    Flag(bool),
}

/// Booleans read as 1 and 0; `null` reads as absent
fn numeric_or_flag<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<WireValue>::deserialize(deserializer)?.map(|value| match value {
        WireValue::Number(n) => n,
        WireValue::Flag(true) => 1.0,
        WireValue::Flag(false) => 0.0,
    }))
}

impl From<RawPatientFeatures> for PatientFeatures {
    fn from(raw: RawPatientFeatures) -> Self {
        use FeatureField as F;
        let or_default = |v: Option<f64>, f: F| v.unwrap_or_else(|| f.default_value());

        Self {
            missed_appointments: or_default(raw.missed_appointments, F::MissedAppointments),
            days_since_last_visit: or_default(raw.days_since_last_visit, F::DaysSinceLastVisit),
            financial_score: or_default(raw.financial_score, F::FinancialScore),
            treatment_stage: or_default(raw.treatment_stage, F::TreatmentStage),
            follow_up_calls_received: or_default(
                raw.follow_up_calls_received,
                F::FollowUpCallsReceived,
            ),
            hospital_delay_days: or_default(raw.hospital_delay_days, F::HospitalDelayDays),
            scheme_enrolled: or_default(raw.scheme_enrolled, F::SchemeEnrolled),
        }
    }
}

impl<'de> Deserialize<'de> for PatientFeatures {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawPatientFeatures::deserialize(deserializer).map(Into::into)
    }
}

/// Ordered feature names a classifier was trained with.
///
/// Construction fails on empty lists, duplicates, or names that do not map
/// to a [`FeatureField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureManifest {
    fields: Vec<FeatureField>,
}

impl FeatureManifest {
    /// Build a manifest from feature names
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for name in names {
            let field: FeatureField = name.as_ref().parse()?;
            if fields.contains(&field) {
                return Err(Error::feature(format!(
                    "duplicate feature '{}' in manifest",
                    field
                )));
            }
            fields.push(field);
        }

        if fields.is_empty() {
            return Err(Error::feature("feature manifest is empty"));
        }

        Ok(Self { fields })
    }

    /// The seven-column schema used by the training pipeline
    pub fn standard() -> Self {
        Self {
            fields: FeatureField::ALL.to_vec(),
        }
    }

    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    /// Feature names in manifest order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<String>> for FeatureManifest {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<FeatureManifest> for Vec<String> {
    fn from(manifest: FeatureManifest) -> Self {
        manifest.names().map(str::to_string).collect()
    }
}

/// Numeric encoding of a [`PatientFeatures`] record in manifest order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
