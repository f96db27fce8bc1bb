use cardio_model::{MODEL_FILE, SCALER_FILE};
use cardio_risk::{FallbackReason, RiskLevel, RiskPredictor, RiskVerdict};
use cardio_store::{dashboard_stats, AssessmentStore, FileStore, NewAssessment};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs::{remove_file, write};
use tempfile::tempdir;
use tests::{age_bp_model, constant_model, sample_patient, standard_scaler, write_artifacts};

fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn seventy_percent_model_scores_high() {
    init_test_logger();
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &constant_model(0.7), &standard_scaler()).unwrap();

    let predictor = RiskPredictor::from_dir(dir.path());
    let verdict = predictor.predict(&sample_patient());

    assert_close(verdict.risk_score, 0.7);
    assert_close(verdict.confidence_score, 0.7);
    assert_eq!(verdict.risk_level, RiskLevel::High);
    assert_eq!(verdict.fallback, None);
    assert_eq!(verdict.recommendations, vec!["Consult a doctor for a full evaluation."]);
    assert_eq!(verdict.risk_factors, vec!["Based on model analysis."]);

    let status = predictor.loader().status();
    assert!(status.loaded);
    assert_eq!(status.name.as_deref(), Some("heart-attack-risk"));
    assert_eq!(status.version.map(|v| v.to_string()), Some("1.2.0".to_string()));
    assert_eq!(status.load_attempts, 1);
}

#[test]
fn deleted_artifacts_yield_the_degraded_verdict() {
    init_test_logger();
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &constant_model(0.7), &standard_scaler()).unwrap();
    remove_file(dir.path().join(MODEL_FILE)).unwrap();
    remove_file(dir.path().join(SCALER_FILE)).unwrap();

    let predictor = RiskPredictor::from_dir(dir.path());
    assert!(predictor.loader().load().is_err());

    let verdict = predictor.predict(&sample_patient());
    assert_eq!(verdict, RiskVerdict::fallback(FallbackReason::ModelUnavailable));
    assert_eq!(
        serde_json::to_value(&verdict).unwrap(),
        json!({
            "risk_score": 0.3,
            "risk_level": "Moderate",
            "confidence_score": 0.6,
            "recommendations": [
                "ML model unavailable - consult healthcare provider for assessment",
                "Regular health checkups are recommended"
            ],
            "risk_factors": ["Model temporarily unavailable"],
            "fallback": "model_unavailable"
        })
    );

    let status = predictor.loader().status();
    assert!(!status.loaded);
    assert!(status.last_error.is_some());
}

#[test]
fn artifacts_restored_on_disk_are_picked_up_lazily() {
    init_test_logger();
    let dir = tempdir().unwrap();
    let predictor = RiskPredictor::from_dir(dir.path());
    assert!(predictor.predict(&sample_patient()).is_fallback());

    write_artifacts(dir.path(), &constant_model(0.2), &standard_scaler()).unwrap();
    let verdict = predictor.predict(&sample_patient());
    assert!(!verdict.is_fallback());
    assert_close(verdict.risk_score, 0.2);
    assert_eq!(verdict.risk_level, RiskLevel::Low);
}

#[test]
fn loaded_artifacts_outlive_their_files() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &constant_model(0.7), &standard_scaler()).unwrap();
    let predictor = RiskPredictor::from_dir(dir.path());
    predictor.loader().load().unwrap();

    remove_file(dir.path().join(MODEL_FILE)).unwrap();
    let verdict = predictor.predict(&sample_patient());
    assert!(!verdict.is_fallback());
    assert_eq!(predictor.loader().status().load_attempts, 1);
}

#[test]
fn missing_scaler_alone_blocks_loading() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &constant_model(0.7), &standard_scaler()).unwrap();
    remove_file(dir.path().join(SCALER_FILE)).unwrap();

    let predictor = RiskPredictor::from_dir(dir.path());
    assert!(predictor.loader().load().is_err());
    assert!(!predictor.loader().is_loaded());
    assert_eq!(
        predictor.predict(&sample_patient()).fallback,
        Some(FallbackReason::ModelUnavailable)
    );
}

#[test]
fn reordered_feature_names_are_refused() {
    let dir = tempdir().unwrap();
    let mut model = constant_model(0.7);
    let names = model["feature_names"].as_array_mut().unwrap();
    names.swap(0, 1);
    write_artifacts(dir.path(), &model, &standard_scaler()).unwrap();

    let predictor = RiskPredictor::from_dir(dir.path());
    let err = predictor.loader().load().unwrap_err();
    assert!(err.to_string().contains("age"), "{err}");
}

#[test]
fn corrupt_model_file_is_reported() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &constant_model(0.7), &standard_scaler()).unwrap();
    write(dir.path().join(MODEL_FILE), "{ \"kind\": \"random_forest\" }").unwrap();

    let predictor = RiskPredictor::from_dir(dir.path());
    assert!(predictor.loader().load().is_err());
    assert!(predictor.predict(&sample_patient()).is_fallback());
}

#[test]
fn malformed_value_falls_back_as_scoring_failure() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &constant_model(0.7), &standard_scaler()).unwrap();
    let predictor = RiskPredictor::from_dir(dir.path());

    let mut params = sample_patient();
    params.insert("cholesterol_level".into(), json!("high"));
    let verdict = predictor.predict(&params);
    assert_eq!(verdict, RiskVerdict::fallback(FallbackReason::ScoringFailed));
    assert_eq!(verdict.risk_factors, vec!["System error occurred"]);
}

#[test]
fn scaled_model_separates_patients() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), &age_bp_model(), &standard_scaler()).unwrap();
    let predictor = RiskPredictor::from_dir(dir.path());

    let older = predictor.predict(&sample_patient());
    assert_eq!(older.risk_level, RiskLevel::High);

    let mut younger = sample_patient();
    younger.insert("age".into(), json!(30));
    younger.insert("systolic_bp".into(), json!(110));
    let younger = predictor.predict(&younger);
    assert_eq!(younger.risk_level, RiskLevel::Low);
    assert!(younger.risk_score < older.risk_score);
    assert!(younger.confidence_score > 0.5);
}

#[test]
fn verdicts_are_stored_with_their_assessment() {
    let artifacts = tempdir().unwrap();
    let data = tempdir().unwrap();
    write_artifacts(artifacts.path(), &constant_model(0.7), &standard_scaler()).unwrap();
    let predictor = RiskPredictor::from_dir(artifacts.path());

    {
        let store = FileStore::open(data.path()).unwrap();
        for _ in 0..2 {
            let params = sample_patient();
            let verdict = predictor.predict(&params);
            store
                .insert(NewAssessment::new(21, params, Some(verdict)))
                .unwrap();
        }
    }

    let store = FileStore::open(data.path()).unwrap();
    let history = store.find_by_user(21, None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].assessment_data, sample_patient());
    assert_eq!(history[0].risk_level(), Some(RiskLevel::High));

    let stats = dashboard_stats(&history);
    assert_eq!(stats.total_assessments, 2);
    assert_close(stats.average_risk_score.unwrap(), 0.7);
}
