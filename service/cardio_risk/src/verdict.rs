//! Risk levels and the verdict returned for every assessment

use serde::{Deserialize, Serialize};

/// Scores strictly above this are High, everything else Low
pub const HIGH_RISK_THRESHOLD: f64 = 0.5;

pub const FALLBACK_RISK_SCORE: f64 = 0.3;
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Level for a model-produced score.
    ///
    /// Scored verdicts are only ever Low or High; Moderate is reserved for
    /// fallback verdicts.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a verdict is a placeholder rather than a model score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    ModelUnavailable,
    ScoringFailed,
}

impl FallbackReason {
    fn recommendations(&self) -> &'static [&'static str] {
        match self {
            FallbackReason::ModelUnavailable => &[
                "ML model unavailable - consult healthcare provider for assessment",
                "Regular health checkups are recommended",
            ],
            FallbackReason::ScoringFailed => &[
                "Prediction service temporarily unavailable",
                "Please try again or consult healthcare provider",
            ],
        }
    }

    fn risk_factors(&self) -> &'static [&'static str] {
        match self {
            FallbackReason::ModelUnavailable => &["Model temporarily unavailable"],
            FallbackReason::ScoringFailed => &["System error occurred"],
        }
    }
}

const MODEL_RECOMMENDATIONS: &[&str] = &["Consult a doctor for a full evaluation."];
const MODEL_RISK_FACTORS: &[&str] = &["Based on model analysis."];

/// The risk assessment attached to every stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    /// Probability of the high-risk class, in [0, 1]
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Probability of the winning class, in [0, 1]
    pub confidence_score: f64,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

impl RiskVerdict {
    pub fn from_scores(risk_score: f64, confidence_score: f64) -> Self {
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            confidence_score,
            recommendations: to_strings(MODEL_RECOMMENDATIONS),
            risk_factors: to_strings(MODEL_RISK_FACTORS),
            fallback: None,
        }
    }

    /// The placeholder verdict. Both failure paths share the same numbers and
    /// differ only in their advisory text.
    pub fn fallback(reason: FallbackReason) -> Self {
        Self {
            risk_score: FALLBACK_RISK_SCORE,
            risk_level: RiskLevel::Moderate,
            confidence_score: FALLBACK_CONFIDENCE,
            recommendations: to_strings(reason.recommendations()),
            risk_factors: to_strings(reason.risk_factors()),
            fallback: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
