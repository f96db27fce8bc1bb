use cardio_risk::{RawParameters, RiskLevel, RiskVerdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored health assessment and the verdict computed when it was submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub assessment_id: u64,
    pub user_id: u64,
    /// The parameters exactly as submitted
    pub assessment_data: RawParameters,
    pub prediction_result: Option<RiskVerdict>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn risk_score(&self) -> Option<f64> {
        self.prediction_result.as_ref().map(|v| v.risk_score)
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.prediction_result.as_ref().map(|v| v.risk_level)
    }
}

/// Everything the caller supplies; the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub user_id: u64,
    pub assessment_data: RawParameters,
    pub prediction_result: Option<RiskVerdict>,
}

impl NewAssessment {
    pub fn new(
        user_id: u64,
        assessment_data: RawParameters,
        prediction_result: Option<RiskVerdict>,
    ) -> Self {
        Self {
            user_id,
            assessment_data,
            prediction_result,
        }
    }

    pub(crate) fn into_assessment(self, assessment_id: u64, now: DateTime<Utc>) -> Assessment {
        Assessment {
            assessment_id,
            user_id: self.user_id,
            assessment_data: self.assessment_data,
            prediction_result: self.prediction_result,
            created_at: now,
            updated_at: now,
        }
    }
}
