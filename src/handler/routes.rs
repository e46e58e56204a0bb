//! Route definitions for the Hazard Validation Agent
//!
//! - POST /normalize/hazard - normalize a raw hazard analysis
//! - POST /normalize/guidance - normalize a raw navigation guidance analysis
//! - GET /health - health check endpoint
//! - GET /vocabulary - closed vocabulary and alias table introspection
//! - GET /metrics - Prometheus text exposition
//!
//! The normalize endpoints accept the decoded generator output directly as
//! the request body and answer with the normalized record wrapped in the
//! standard response envelope. A schema violation answers 422 with
//! `details.retry_upstream = true`: the caller should treat it as a
//! transient upstream failure and may retry the generator call.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    ApiResponse, ErrorInfo, HealthResponse, HealthStatus, NormalizedPayload, ResponseMetadata,
    VocabularyResponse,
};
use crate::contracts::{GuidanceReport, HazardReport, SCHEMA_VERSION};
use crate::engine::{NormalizationEngine, ReportContract};
use crate::error::SchemaViolation;
use crate::taxonomy;
use crate::telemetry::{self, EngineMetricsRegistry, TelemetryError};

/// Handler state shared across all routes
#[derive(Clone)]
pub struct HandlerState {
    pub engine: NormalizationEngine,
    pub metrics: Arc<EngineMetricsRegistry>,
}

impl HandlerState {
    pub fn new() -> Result<Self, TelemetryError> {
        Ok(Self {
            engine: NormalizationEngine::new(),
            metrics: Arc::new(EngineMetricsRegistry::new()?),
        })
    }
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Schema(SchemaViolation),
    InternalError(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Schema(_) => "SCHEMA_VIOLATION",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_info = match &self {
            ApiError::BadRequest(msg) => ErrorInfo::new(self.error_code(), msg),
            ApiError::InternalError(msg) => ErrorInfo::new(self.error_code(), msg),
            ApiError::Schema(violation) => ErrorInfo::new(self.error_code(), violation.to_string())
                .with_details(serde_json::json!({
                    "field": violation.field(),
                    "constraint": violation.constraint(),
                    // an unusable generator response is a transient upstream
                    // failure; the caller may retry the model call
                    "retry_upstream": true,
                })),
        };

        let metadata = ResponseMetadata::new(uuid::Uuid::new_v4().to_string());
        let response = ApiResponse::<()>::error(error_info, metadata);

        (status, Json(response)).into_response()
    }
}

/// Create the router with all routes
pub fn create_router(state: HandlerState) -> Router {
    Router::new()
        .route("/normalize/hazard", post(normalize_hazard_record))
        .route("/normalize/guidance", post(normalize_guidance_record))
        .route("/health", get(health_check))
        .route("/vocabulary", get(vocabulary))
        .route("/metrics", get(metrics_text))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// POST /normalize/hazard - normalize a raw hazard analysis
pub async fn normalize_hazard_record(
    State(state): State<HandlerState>,
    Json(raw): Json<Value>,
) -> Result<Json<ApiResponse<NormalizedPayload>>, ApiError> {
    run_normalize::<HazardReport>(&state, &raw)
}

/// POST /normalize/guidance - normalize a raw guidance analysis
pub async fn normalize_guidance_record(
    State(state): State<HandlerState>,
    Json(raw): Json<Value>,
) -> Result<Json<ApiResponse<NormalizedPayload>>, ApiError> {
    run_normalize::<GuidanceReport>(&state, &raw)
}

/// Shared normalize handler body, parametrized over the record kind.
///
/// Deterministic and stateless; only the metrics registry observes it.
fn run_normalize<R: ReportContract + 'static>(
    state: &HandlerState,
    raw: &Value,
) -> Result<Json<ApiResponse<NormalizedPayload>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let fingerprint = telemetry::value_fingerprint(raw);
    let metrics = state.metrics.engine();

    let result = state.engine.normalize_with_report::<R>(raw);
    let duration = start.elapsed();
    metrics.observe_duration(R::KIND, duration.as_secs_f64());

    match result {
        Ok(normalized) => {
            metrics.record_request(R::KIND, true);
            metrics.record_repairs(R::KIND, &normalized.repairs);
            tracing::info!(
                kind = R::KIND,
                request_id = %request_id,
                input_fingerprint = %fingerprint,
                repairs = normalized.repairs.len(),
                "record normalized"
            );

            let record = serde_json::to_value(&normalized.record)
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
            let payload = NormalizedPayload {
                kind: R::KIND.to_string(),
                repairs_applied: normalized.repairs.iter().map(|id| id.to_string()).collect(),
                record,
            };
            let metadata = ResponseMetadata::new(request_id)
                .with_duration(duration.as_millis() as u64)
                .with_fingerprint(fingerprint);
            Ok(Json(ApiResponse::success(payload, metadata)))
        }
        Err(violation) => {
            metrics.record_request(R::KIND, false);
            metrics.record_violation(R::KIND, violation.field());
            tracing::warn!(
                kind = R::KIND,
                request_id = %request_id,
                input_fingerprint = %fingerprint,
                field = violation.field(),
                "schema gate rejected record"
            );
            Err(ApiError::Schema(violation))
        }
    }
}

/// GET /health - health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        schema_version: SCHEMA_VERSION.to_string(),
        vocabulary_size: taxonomy::vocabulary().len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /vocabulary - closed vocabulary and alias table
pub async fn vocabulary() -> Json<VocabularyResponse> {
    Json(VocabularyResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        tags: taxonomy::CANONICAL_TAGS
            .iter()
            .map(|t| t.to_string())
            .collect(),
        aliases: taxonomy::aliases()
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        fallback_tag: taxonomy::FALLBACK_TAG.to_string(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_text(State(state): State<HandlerState>) -> Result<Response, ApiError> {
    let text = state
        .metrics
        .encode_text()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_router() -> Router {
        create_router(HandlerState::new().unwrap())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["schema_version"], "3.0");
        assert_eq!(body["vocabulary_size"], 45);
    }

    #[tokio::test]
    async fn test_normalize_hazard_success_envelope() {
        let raw = serde_json::json!({
            "hazard_detected": true,
            "num_hazards": 1,
            "hazard_types": ["cone"],
            "one_sentence": "A traffic cone ahead.",
            "evasive_suggestion": "Walk around it on the left.",
            "bearing": "center",
            "proximity": "near",
            "confidence": 0.95,
            "notes": "",
            "haptic_recommendation": "unknown_value"
        });
        let response = test_router()
            .oneshot(post_json("/normalize/hazard", raw))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["kind"], "hazard");
        assert_eq!(body["data"]["record"]["hazard_types"][0], "trafficcone");
        assert_eq!(
            body["data"]["record"]["haptic_recommendation"],
            "full_haptic"
        );
        assert!(body["data"]["repairs_applied"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == "haptic_derivation"));
        assert_eq!(body["metadata"]["schema_version"], "3.0");
        assert!(body["metadata"]["input_fingerprint"].is_string());
    }

    #[tokio::test]
    async fn test_normalize_hazard_schema_violation() {
        // one_sentence missing
        let raw = serde_json::json!({
            "hazard_detected": true,
            "num_hazards": 1,
            "hazard_types": ["cone"],
            "evasive_suggestion": "Walk around it.",
            "bearing": "center",
            "proximity": "near",
            "confidence": 0.95,
            "notes": ""
        });
        let response = test_router()
            .oneshot(post_json("/normalize/hazard", raw))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "SCHEMA_VIOLATION");
        assert_eq!(body["error"]["details"]["field"], "one_sentence");
        assert_eq!(body["error"]["details"]["retry_upstream"], true);
    }

    #[tokio::test]
    async fn test_normalize_guidance_reset() {
        let raw = serde_json::json!({
            "hazard_detected": false,
            "hazard_guidance": "generator noise",
            "haptic_recommendation": "left_haptic",
            "navigation_instruction": "Continue straight for 100 meters"
        });
        let response = test_router()
            .oneshot(post_json("/normalize/guidance", raw))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["record"]["hazard_guidance"], "");
        assert_eq!(body["data"]["record"]["haptic_recommendation"], "no_haptic");
        assert_eq!(body["data"]["record"]["confidence"], 0.9);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let router = test_router();
        // drive one request through so counters exist
        let raw = serde_json::json!({
            "navigation_instruction": "Turn left"
        });
        router
            .clone()
            .oneshot(post_json("/normalize/guidance", raw))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("hazard_validation_normalize_requests_total"));
    }

    #[tokio::test]
    async fn test_vocabulary_endpoint() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/vocabulary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tags"].as_array().unwrap().len(), 45);
        assert_eq!(body["aliases"]["cone"], "trafficcone");
        assert_eq!(body["fallback_tag"], "debris");
    }
}
