//! Logistic-regression classifier artifact: `p = sigmoid(W·x + b)`

use crate::artifact::{check_finite, check_width, ArtifactError, ClassProbabilities, Classifier};
use crate::metadata::ArtifactMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serialized form of `model.json`, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
}

impl ModelArtifact {
    pub fn metadata(&self) -> Option<&ArtifactMetadata> {
        match self {
            ModelArtifact::LogisticRegression(m) => m.metadata.as_ref(),
        }
    }

    /// Validate the parameters and hand back a ready classifier
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, ArtifactError> {
        match self {
            ModelArtifact::LogisticRegression(m) => {
                m.validate()?;
                Ok(Box::new(m))
            }
        }
    }
}

/// Binary or multinomial logistic regression
///
/// For two classes a single coefficient row scores `classes[1]` through the
/// logistic function. With one row per class the scores go through softmax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArtifactMetadata>,
}

impl LogisticRegression {
    /// Two-class model with a single coefficient row
    pub fn binary(
        classes: [&str; 2],
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            coefficients: vec![coefficients],
            intercepts: vec![intercept],
            feature_names: None,
            metadata: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn with_metadata(mut self, metadata: ArtifactMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.len() < 2 {
            return Err(ArtifactError::Invalid(format!(
                "logistic regression needs at least 2 classes, got {}",
                self.classes.len()
            )));
        }
        let unique: HashSet<&str> = self.classes.iter().map(String::as_str).collect();
        if unique.len() != self.classes.len() {
            return Err(ArtifactError::Invalid("duplicate class labels".into()));
        }

        let rows = self.coefficients.len();
        let binary = self.classes.len() == 2 && rows == 1;
        if !binary && rows != self.classes.len() {
            return Err(ArtifactError::Invalid(format!(
                "{} coefficient rows for {} classes",
                rows,
                self.classes.len()
            )));
        }
        if self.intercepts.len() != rows {
            return Err(ArtifactError::Invalid(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                rows
            )));
        }

        let width = self.coefficients[0].len();
        if width == 0 {
            return Err(ArtifactError::Invalid("empty coefficient row".into()));
        }
        for row in &self.coefficients {
            check_width(width, row)?;
            check_finite(row)?;
        }
        check_finite(&self.intercepts)?;

        if let Some(names) = &self.feature_names {
            if names.len() != width {
                return Err(ArtifactError::ShapeMismatch {
                    expected: width,
                    actual: names.len(),
                });
            }
        }
        Ok(())
    }

    fn decision(&self, features: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(self.intercepts.iter())
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ArtifactError> {
        check_width(self.n_features(), features)?;
        check_finite(features)?;

        let scores = self.decision(features);
        let probs = if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&scores)
        };
        check_finite(&probs)?;

        Ok(ClassProbabilities::new(
            self.classes.iter().cloned().zip(probs).collect(),
        ))
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn kind(&self) -> &str {
        "logistic_regression"
    }
}

/// Logistic function, split by sign so large magnitudes do not overflow
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
