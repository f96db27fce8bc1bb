//! Raw parameters in, risk verdict out

use crate::features::{FeatureError, FeatureVector, FEATURE_NAMES};
use crate::verdict::{FallbackReason, RiskVerdict};
use crate::RawParameters;
use cardio_model::{ArtifactError, Artifacts, ModelLoader};
use std::path::Path;
use thiserror::Error;

/// Label the bundled training pipeline uses for the heart-attack class
pub const DEFAULT_POSITIVE_CLASS: &str = "1";

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model artifacts unavailable")]
    ArtifactUnavailable,
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Features(#[from] FeatureError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("classifier has no class labeled '{0}'")]
    UnknownClass(String),
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

impl PredictError {
    pub fn fallback_reason(&self) -> FallbackReason {
        match self {
            PredictError::ArtifactUnavailable => FallbackReason::ModelUnavailable,
            PredictError::Scoring(_) => FallbackReason::ScoringFailed,
        }
    }
}

/// Scores assessments against the loaded classifier.
///
/// Owns its [`ModelLoader`]; share one predictor (behind an `Arc`) between
/// all request handlers.
#[derive(Debug)]
pub struct RiskPredictor {
    loader: ModelLoader,
    positive_class: String,
}

impl RiskPredictor {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            loader,
            positive_class: DEFAULT_POSITIVE_CLASS.to_string(),
        }
    }

    /// Predictor over `model.json`/`scaler.json` in `dir`, checked against
    /// the 21-field schema on every load
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(ModelLoader::from_dir(dir).with_expected_features(&FEATURE_NAMES))
    }

    pub fn with_positive_class(mut self, label: impl Into<String>) -> Self {
        self.positive_class = label.into();
        self
    }

    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    pub fn positive_class(&self) -> &str {
        &self.positive_class
    }

    /// Always returns a complete verdict. Failures become a fallback verdict
    /// whose advisory text says what went wrong.
    pub fn predict(&self, params: &RawParameters) -> RiskVerdict {
        match self.try_predict(params) {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("returning fallback risk verdict: {e}");
                RiskVerdict::fallback(e.fallback_reason())
            }
        }
    }

    pub fn try_predict(&self, params: &RawParameters) -> Result<RiskVerdict, PredictError> {
        let artifacts = self
            .loader
            .ensure_loaded()
            .ok_or(PredictError::ArtifactUnavailable)?;
        let features = FeatureVector::from_parameters(params).map_err(ScoringError::from)?;
        Ok(self.score(&artifacts, &features)?)
    }

    /// Transform, score and map one feature vector with the given artifacts
    pub fn score(
        &self,
        artifacts: &Artifacts,
        features: &FeatureVector,
    ) -> Result<RiskVerdict, ScoringError> {
        let scaled = artifacts.scaler().transform(features.as_slice())?;
        let classifier = artifacts.classifier();
        let proba = classifier.predict_proba(&scaled)?;

        for (_, p) in proba.iter() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ScoringError::InvalidProbability(p));
            }
        }

        let risk_score = proba
            .get(&self.positive_class)
            .ok_or_else(|| ScoringError::UnknownClass(self.positive_class.clone()))?;
        let (predicted, confidence) = proba
            .winner()
            .ok_or_else(|| ScoringError::UnknownClass(self.positive_class.clone()))?;

        log::debug!(
            "scored assessment: class={predicted} risk_score={risk_score:.4} confidence={confidence:.4}"
        );
        Ok(RiskVerdict::from_scores(risk_score, confidence))
    }
}
