//! HTTP surface of the Cardio Care risk service.
//!
//! [`app`] builds the router; the binary in `main.rs` wires it to the
//! configured artifact directory, store and listener.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use cardio_risk::RiskPredictor;
use cardio_store::AssessmentStore;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use config::ServerConfig;
pub use error::ApiError;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<RiskPredictor>,
    pub store: Arc<dyn AssessmentStore>,
}

impl AppState {
    pub fn new(predictor: RiskPredictor, store: impl AssessmentStore + 'static) -> Self {
        Self {
            predictor: Arc::new(predictor),
            store: Arc::new(store),
        }
    }
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            if origin.trim() == "*" {
                log::warn!("ignoring wildcard CORS origin; list allowed origins explicitly");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("ignoring invalid CORS origin {origin:?}");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true)
}

pub fn app(state: AppState, origins: &[String]) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route(
            "/api/assessments",
            get(routes::list_assessments).post(routes::create_assessment),
        )
        .route("/api/assessments/:id", get(routes::get_assessment))
        .route("/api/dashboard/stats", get(routes::dashboard))
        .layer(cors_layer(origins))
        .with_state(state)
}
