//! Fitted feature scalers read from `scaler.json`

use crate::artifact::{check_finite, check_width, ArtifactError, Scaler};
use serde::{Deserialize, Serialize};

/// Serialized form of `scaler.json`, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    pub fn into_scaler(self) -> Result<Box<dyn Scaler>, ArtifactError> {
        match self {
            ScalerArtifact::Standard(s) => {
                s.validate()?;
                Ok(Box::new(s))
            }
            ScalerArtifact::MinMax(s) => {
                s.validate()?;
                Ok(Box::new(s))
            }
        }
    }
}

/// Z-score standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            feature_names: None,
        }
    }

    /// Pass-through scaler of the given width
    pub fn identity(width: usize) -> Self {
        Self::new(vec![0.0; width], vec![1.0; width])
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        validate_params(&self.mean, &self.scale, self.feature_names.as_deref())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        check_width(self.mean.len(), features)?;
        let out: Vec<f64> = features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| {
                // constant training columns are stored with scale 0
                let s = if *s == 0.0 { 1.0 } else { *s };
                (x - m) / s
            })
            .collect();
        check_finite(&out)?;
        Ok(out)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn kind(&self) -> &str {
        "standard"
    }
}

/// Range scaling: `x * scale + min`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            min,
            scale,
            feature_names: None,
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        validate_params(&self.min, &self.scale, self.feature_names.as_deref())
    }
}

impl Scaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        check_width(self.min.len(), features)?;
        let out: Vec<f64> = features
            .iter()
            .zip(self.min.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| x * s + m)
            .collect();
        check_finite(&out)?;
        Ok(out)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn kind(&self) -> &str {
        "min_max"
    }
}

fn validate_params(
    offset: &[f64],
    scale: &[f64],
    names: Option<&[String]>,
) -> Result<(), ArtifactError> {
    if offset.is_empty() {
        return Err(ArtifactError::Invalid("scaler has no features".into()));
    }
    check_width(offset.len(), scale)?;
    check_finite(offset)?;
    check_finite(scale)?;
    if let Some(names) = names {
        if names.len() != offset.len() {
            return Err(ArtifactError::ShapeMismatch {
                expected: offset.len(),
                actual: names.len(),
            });
        }
    }
    Ok(())
}
