use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use cardio_risk::{missing_features, FeatureError, RawParameters};
use cardio_store::{dashboard_stats, Assessment, AssessmentStore, DashboardStats, NewAssessment};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
pub struct CreateAssessmentRequest {
    pub assessment_data: Option<RawParameters>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAssessment {
    pub message: &'static str,
    pub assessment_id: u64,
    pub assessment: Assessment,
    pub prediction: cardio_risk::RiskVerdict,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
}

impl ListParams {
    /// A positive integer limit; anything else means no limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentList {
    pub assessments: Vec<Assessment>,
    pub count: usize,
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Cardio Care API",
        "version": SERVICE_VERSION,
        "status": "running",
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let model = state.predictor.loader().status();
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "model": model,
        "version": SERVICE_VERSION,
    }))
}

pub async fn create_assessment(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    body: Result<Json<CreateAssessmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedAssessment>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let data = request
        .assessment_data
        .ok_or_else(|| ApiError::BadRequest("Assessment data is required".to_string()))?;

    let missing = missing_features(&data);
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(
            FeatureError::Missing(missing).to_string(),
        ));
    }

    // Scoring may reload artifacts from disk and the store may write a file.
    let created = tokio::task::spawn_blocking(move || {
        let verdict = state.predictor.predict(&data);
        let record = state
            .store
            .insert(NewAssessment::new(user_id, data, Some(verdict.clone())))?;
        Ok::<_, ApiError>((record, verdict))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("assessment task failed: {e}")))??;

    let (assessment, prediction) = created;
    log::info!(
        "user {} created assessment {} ({})",
        user_id,
        assessment.assessment_id,
        prediction.risk_level
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedAssessment {
            message: "Assessment created successfully",
            assessment_id: assessment.assessment_id,
            assessment,
            prediction,
        }),
    ))
}

pub async fn list_assessments(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<AssessmentList>, ApiError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let assessments = state.store.find_by_user(user_id, params.limit())?;
    Ok(Json(AssessmentList {
        count: assessments.len(),
        assessments,
    }))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(assessment_id) =
        id.map_err(|_| ApiError::BadRequest("Invalid assessment id".to_string()))?;
    let assessment = state
        .store
        .find_by_id_and_user(assessment_id, user_id)?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;
    Ok(Json(json!({ "assessment": assessment })))
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let assessments = state.store.find_by_user(user_id, None)?;
    Ok(Json(dashboard_stats(&assessments)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn limit(raw: Option<&str>) -> Option<usize> {
        ListParams {
            limit: raw.map(str::to_string),
        }
        .limit()
    }

    #[test]
    fn only_positive_limits_apply() {
        assert_eq!(limit(Some("5")), Some(5));
        assert_eq!(limit(Some("0")), None);
        assert_eq!(limit(Some("-2")), None);
        assert_eq!(limit(Some("abc")), None);
        assert_eq!(limit(None), None);
    }
}
