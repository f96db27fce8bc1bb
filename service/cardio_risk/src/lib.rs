//! Cardiovascular risk scoring for submitted health assessments
//!
//! [`RiskPredictor::predict`] turns the 21 raw assessment parameters into a
//! [`RiskVerdict`]. It never fails: when the model is missing or scoring
//! breaks, the caller gets a labeled fallback verdict instead.

pub mod features;
pub mod predictor;
pub mod verdict;

pub use features::{missing_features, FeatureError, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use predictor::{PredictError, RiskPredictor, ScoringError, DEFAULT_POSITIVE_CLASS};
pub use verdict::{FallbackReason, RiskLevel, RiskVerdict, HIGH_RISK_THRESHOLD};

/// Raw assessment parameters as submitted by the client
pub type RawParameters = serde_json::Map<String, serde_json::Value>;
