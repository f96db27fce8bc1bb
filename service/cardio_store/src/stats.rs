use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::Assessment;

/// How many recent scores and dates the dashboard charts
pub const RISK_TREND_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_assessments: usize,
    pub latest_assessment: Option<Assessment>,
    pub risk_trend: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_dates: Option<Vec<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Summarize one user's assessments, given newest first.
///
/// Records without a verdict are counted but contribute no score. The
/// average covers every scored record, not just the charted ones.
pub fn dashboard_stats(assessments: &[Assessment]) -> DashboardStats {
    if assessments.is_empty() {
        return DashboardStats {
            total_assessments: 0,
            latest_assessment: None,
            risk_trend: Vec::new(),
            average_risk_score: None,
            assessment_dates: None,
            message: Some("No assessments found".to_string()),
        };
    }

    let scores: Vec<f64> = assessments.iter().filter_map(Assessment::risk_score).collect();
    let average = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    DashboardStats {
        total_assessments: assessments.len(),
        latest_assessment: assessments.first().cloned(),
        risk_trend: scores.iter().take(RISK_TREND_LEN).copied().collect(),
        average_risk_score: Some(average),
        assessment_dates: Some(
            assessments
                .iter()
                .take(RISK_TREND_LEN)
                .map(|a| a.created_at)
                .collect(),
        ),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewAssessment;
    use cardio_risk::RiskVerdict;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn record(id: u64, score: Option<f64>) -> Assessment {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        NewAssessment::new(1, Default::default(), score.map(|s| RiskVerdict::from_scores(s, 0.9)))
            .into_assessment(id, base + Duration::days(id as i64))
    }

    #[test]
    fn empty_history_reports_message() {
        let stats = dashboard_stats(&[]);
        assert_eq!(stats.total_assessments, 0);
        assert_eq!(stats.latest_assessment, None);
        assert!(stats.risk_trend.is_empty());
        assert_eq!(stats.message.as_deref(), Some("No assessments found"));

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("average_risk_score").is_none());
        assert!(json.get("assessment_dates").is_none());
    }

    #[test]
    fn trend_is_capped_but_average_is_not() {
        // newest first: ids 12 down to 1
        let records: Vec<Assessment> = (1..=12)
            .rev()
            .map(|id| record(id, Some(if id <= 2 { 1.0 } else { 0.0 })))
            .collect();
        let stats = dashboard_stats(&records);

        assert_eq!(stats.total_assessments, 12);
        assert_eq!(stats.latest_assessment.unwrap().assessment_id, 12);
        assert_eq!(stats.risk_trend, vec![0.0; RISK_TREND_LEN]);
        assert_eq!(stats.average_risk_score, Some(2.0 / 12.0));
        let dates = stats.assessment_dates.unwrap();
        assert_eq!(dates.len(), RISK_TREND_LEN);
        assert_eq!(dates[0], records[0].created_at);
        assert_eq!(stats.message, None);
    }

    #[test]
    fn unscored_records_are_counted_only() {
        let records = vec![record(2, None), record(1, Some(0.4))];
        let stats = dashboard_stats(&records);
        assert_eq!(stats.total_assessments, 2);
        assert_eq!(stats.risk_trend, vec![0.4]);
        assert_eq!(stats.average_risk_score, Some(0.4));
        assert_eq!(stats.assessment_dates.map(|d| d.len()), Some(2));
    }

    #[test]
    fn no_scores_average_to_zero() {
        let stats = dashboard_stats(&[record(1, None)]);
        assert_eq!(stats.average_risk_score, Some(0.0));
    }
}
