//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use carenet_core::{FeatureImportance, PatientFeatures, RiskAssessment};
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, error, info_span, warn, Instrument};

use crate::config::CorsConfig;
use crate::state::AppState;

/// Error payload for bodies that are missing or not a JSON object
pub const MALFORMED_BODY_MESSAGE: &str = "Request body must be JSON";

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/feature-importance", get(feature_importance))
        .route("/metrics", get(metrics))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_any_origin {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Liveness probe; does not inspect the registry
async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok", "model": "loaded"}))
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RiskAssessment>, AppError> {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("predict", %request_id);

    run_prediction(&state, &body).instrument(span).await
}

async fn run_prediction(state: &AppState, body: &[u8]) -> Result<Json<RiskAssessment>, AppError> {
    let started = Instant::now();

    let raw = parse_body(body)?;
    let features = PatientFeatures::extract(&raw)?;
    debug!(?features, "Extracted patient features");

    let assessment = state.predictor.assess(&features).await?;

    let elapsed_us = started.elapsed().as_micros() as f64;
    metrics::counter!(
        "carenet_predictions_total",
        "risk_level" => assessment.risk_level.as_str()
    )
    .increment(1);
    metrics::histogram!("carenet_inference_latency_us").record(elapsed_us);

    debug!(
        risk_level = %assessment.risk_level,
        risk_probability = assessment.risk_probability,
        reasons = assessment.primary_reasons.len(),
        "Prediction complete"
    );

    Ok(Json(assessment))
}

/// Decode the request body into a JSON object
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.is_empty() {
        return Err(AppError::MalformedRequest);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) | Err(_) => Err(AppError::MalformedRequest),
    }
}

async fn feature_importance(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeatureImportance>>, AppError> {
    let importance = state.predictor.feature_importance().await?;
    Ok(Json(importance))
}

/// Error handling
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body absent, unparseable, or not a JSON object
    #[error("{}", MALFORMED_BODY_MESSAGE)]
    MalformedRequest,

    /// Any failure while extracting, classifying, or interpreting
    #[error(transparent)]
    Inference(#[from] carenet_core::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedRequest => {
                metrics::counter!("carenet_errors_total", "kind" => "malformed_request")
                    .increment(1);
                StatusCode::BAD_REQUEST
            }
            AppError::Inference(e) => {
                error!("Inference failed: {}", e);
                metrics::counter!("carenet_errors_total", "kind" => e.kind()).increment(1);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
