//! Classifier and scaler traits plus the error type shared by all artifacts

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or evaluating an artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to deserialize {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid artifact: {0}")]
    Invalid(String),
    #[error("Expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Non-finite value produced at feature index {0}")]
    NonFinite(usize),
}

/// Probability mass per class label, in the order the classifier reports them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    entries: Vec<(String, f64)>,
}

impl ClassProbabilities {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Probability assigned to `label`, if the classifier knows that label
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    /// The most probable class and its probability. Ties go to the earlier class.
    pub fn winner(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, p) in &self.entries {
            match best {
                Some((_, bp)) if *p <= bp => {}
                _ => best = Some((label.as_str(), *p)),
            }
        }
        best
    }

    pub fn max_probability(&self) -> Option<f64> {
        self.winner().map(|(_, p)| p)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, p)| (l.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A trained classifier
///
/// Implementations are immutable once constructed and shared across threads.
pub trait Classifier: Send + Sync {
    /// Class labels in the order the model was trained with
    fn classes(&self) -> &[String];

    /// Number of input features the model expects
    fn n_features(&self) -> usize;

    /// Full class-probability distribution for one scaled feature row
    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ArtifactError>;

    /// Most probable class label for one scaled feature row
    fn predict(&self, features: &[f64]) -> Result<String, ArtifactError> {
        let proba = self.predict_proba(features)?;
        proba
            .winner()
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| ArtifactError::Invalid("classifier has no classes".into()))
    }

    /// Feature names recorded at fit time, when the artifact carries them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn kind(&self) -> &str;
}

/// A fitted transform from raw feature values into the model's input space
pub trait Scaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ArtifactError>;

    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn kind(&self) -> &str;
}

pub(crate) fn check_width(expected: usize, features: &[f64]) -> Result<(), ArtifactError> {
    if features.len() != expected {
        return Err(ArtifactError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_finite(values: &[f64]) -> Result<(), ArtifactError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(ArtifactError::NonFinite(idx)),
        None => Ok(()),
    }
}
