//! The fixed 21-field feature schema and assembly from raw parameters

use crate::RawParameters;
use serde_json::Value as JsonValue;
use thiserror::Error;

pub const FEATURE_COUNT: usize = 21;

/// Feature order the scaler and classifier were fit with. Changing it
/// silently corrupts every prediction.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "obesity",
    "smoking",
    "alcohol_consumption",
    "physical_activity",
    "diet_score",
    "cholesterol_level",
    "triglyceride_level",
    "ldl_level",
    "hdl_level",
    "systolic_bp",
    "diastolic_bp",
    "air_pollution_exposure",
    "family_history",
    "stress_level",
    "healthcare_access",
    "emergency_response_time",
    "annual_income",
    "health_insurance",
    "state_name_encoded",
    "gender_Male",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Missing required fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Field '{field}' must be numeric, got {found}")]
    NotNumeric { field: &'static str, found: &'static str },
}

/// Schema fields absent from `params`, in feature order
pub fn missing_features(params: &RawParameters) -> Vec<&'static str> {
    FEATURE_NAMES
        .iter()
        .copied()
        .filter(|name| !params.contains_key(*name))
        .collect()
}

/// One assessment's features, ordered as [`FEATURE_NAMES`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Pick the schema fields out of `params` in schema order.
    ///
    /// Numbers are taken as-is and booleans as 1/0. Keys outside the schema
    /// are ignored; nothing is imputed.
    pub fn from_parameters(params: &RawParameters) -> Result<Self, FeatureError> {
        let missing = missing_features(params);
        if !missing.is_empty() {
            return Err(FeatureError::Missing(missing));
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            let value = params
                .get(*name)
                .ok_or_else(|| FeatureError::Missing(vec![*name]))?;
            *slot = numeric(name, value)?;
        }
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Render back into a raw parameter map
    pub fn to_parameters(&self) -> RawParameters {
        self.iter()
            .map(|(name, v)| (name.to_string(), JsonValue::from(v)))
            .collect()
    }
}

fn numeric(field: &'static str, value: &JsonValue) -> Result<f64, FeatureError> {
    let found = match value {
        JsonValue::Number(n) => match n.as_f64() {
            Some(x) => return Ok(x),
            None => "number",
        },
        JsonValue::Bool(b) => return Ok(if *b { 1.0 } else { 0.0 }),
        JsonValue::Null => "null",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    };
    Err(FeatureError::NotNumeric { field, found })
}
