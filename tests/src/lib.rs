//! Shared fixtures for the end-to-end tests.

use cardio_model::{MODEL_FILE, SCALER_FILE};
use cardio_risk::{RawParameters, FEATURE_NAMES};
use serde_json::{json, Value};
use std::path::Path;

/// A realistic patient record covering all 21 fields
pub fn sample_patient() -> RawParameters {
    let values = [
        67.0, 1.0, 1.0, 0.0, 0.0, 4.0, 245.0, 180.0, 160.0, 38.0, 148.0, 92.0, 1.0, 1.0, 7.0,
        0.0, 14.0, 42000.0, 1.0, 12.0, 1.0,
    ];
    FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect()
}

fn feature_names() -> Value {
    json!(FEATURE_NAMES)
}

/// Model that puts exactly `probability` on class "1" for every patient
pub fn constant_model(probability: f64) -> Value {
    json!({
        "kind": "logistic_regression",
        "classes": ["0", "1"],
        "coefficients": [vec![0.0; FEATURE_NAMES.len()]],
        "intercepts": [(probability / (1.0 - probability)).ln()],
        "feature_names": feature_names(),
        "metadata": {
            "name": "heart-attack-risk",
            "version": "1.2.0",
            "description": "constant fixture"
        }
    })
}

/// Model whose score grows with age and systolic pressure
pub fn age_bp_model() -> Value {
    let mut weights = vec![0.0; FEATURE_NAMES.len()];
    weights[0] = 0.9; // age
    weights[10] = 0.6; // systolic_bp
    json!({
        "kind": "logistic_regression",
        "classes": ["0", "1"],
        "coefficients": [weights],
        "intercepts": [-0.4],
        "feature_names": feature_names(),
    })
}

/// Standard scaler centred on a typical adult
pub fn standard_scaler() -> Value {
    let mut mean = vec![0.0; FEATURE_NAMES.len()];
    let mut scale = vec![1.0; FEATURE_NAMES.len()];
    mean[0] = 55.0;
    scale[0] = 12.0;
    mean[10] = 125.0;
    scale[10] = 15.0;
    json!({
        "kind": "standard",
        "mean": mean,
        "scale": scale,
        "feature_names": feature_names(),
    })
}

/// Write `model.json` and `scaler.json` into `dir`
pub fn write_artifacts(dir: &Path, model: &Value, scaler: &Value) -> std::io::Result<()> {
    std::fs::write(dir.join(MODEL_FILE), serde_json::to_vec_pretty(model)?)?;
    std::fs::write(dir.join(SCALER_FILE), serde_json::to_vec_pretty(scaler)?)?;
    Ok(())
}
