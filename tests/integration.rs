//! Integration tests for the Hazard Validation Agent
//!
//! Exercises the full pipeline at the JSON boundary - the same surface the
//! HTTP handler and CLI feed - plus the axum router end to end.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use hazard_validation::{
    create_router, normalize_guidance, normalize_hazard, HandlerState, HapticCue, HazardReport,
    NormalizationEngine, SchemaViolation,
};

/// A well-formed raw hazard analysis; tests override individual fields.
fn raw_hazard() -> Value {
    json!({
        "hazard_detected": true,
        "num_hazards": 2,
        "hazard_types": ["cone", "person"],
        "one_sentence": "A cone and a pedestrian share the sidewalk ahead.",
        "evasive_suggestion": "Slow down and keep to the right.",
        "bearing": "center",
        "proximity": "far",
        "confidence": 0.85,
        "notes": "",
        "haptic_recommendation": "no_haptic",
        "traffic_light_detected": false,
        "traffic_light_info": null
    })
}

fn hazard_with(overrides: &[(&str, Value)]) -> Value {
    let mut raw = raw_hazard();
    let map = raw.as_object_mut().unwrap();
    for (key, value) in overrides {
        map.insert((*key).to_string(), value.clone());
    }
    raw
}

#[test]
fn dedup_and_order_preserved_through_alias_resolution() {
    let raw = hazard_with(&[(
        "hazard_types",
        json!(["cone", "trafficcone", "person", "cone"]),
    )]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.hazard_types, vec!["trafficcone", "person"]);
}

#[test]
fn no_hazard_zeroing() {
    let raw = hazard_with(&[
        ("hazard_detected", json!(false)),
        ("num_hazards", json!(7)),
        ("hazard_types", json!(["vehicle"])),
    ]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.num_hazards, 0);
    assert!(record.hazard_types.is_empty());
}

#[test]
fn fallback_categorization() {
    let raw = hazard_with(&[("num_hazards", json!(0)), ("hazard_types", json!([]))]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.num_hazards, 1);
    assert_eq!(record.hazard_types, vec!["debris"]);
}

#[test]
fn hallucinated_categories_alone_fall_back() {
    // every tag dropped by the canonicalizer, then repaired
    let raw = hazard_with(&[("hazard_types", json!(["ufo", "kraken"]))]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.hazard_types, vec!["debris"]);
}

#[test]
fn confidence_clamped_both_directions() {
    let record = normalize_hazard(&hazard_with(&[("confidence", json!(1.4))])).unwrap();
    assert_eq!(record.confidence, 1.0);

    let record = normalize_hazard(&hazard_with(&[("confidence", json!(-0.2))])).unwrap();
    assert_eq!(record.confidence, 0.0);
}

#[test]
fn haptic_derived_when_declared_value_invalid() {
    let raw = hazard_with(&[
        ("proximity", json!("near")),
        ("bearing", json!("left")),
        ("haptic_recommendation", json!("bogus")),
    ]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.haptic_recommendation, HapticCue::LeftHaptic);

    let raw = hazard_with(&[
        ("proximity", json!("far")),
        ("bearing", json!("left")),
        ("haptic_recommendation", json!("bogus")),
    ]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.haptic_recommendation, HapticCue::NoHaptic);
}

#[test]
fn valid_haptic_preserved_even_if_seemingly_inconsistent() {
    let raw = hazard_with(&[
        ("proximity", json!("far")),
        ("bearing", json!("left")),
        ("haptic_recommendation", json!("full_haptic")),
    ]);
    let record = normalize_hazard(&raw).unwrap();
    assert_eq!(record.haptic_recommendation, HapticCue::FullHaptic);
}

#[test]
fn traffic_light_suppressed_without_detection_flag() {
    let raw = hazard_with(&[
        ("traffic_light_detected", json!(false)),
        (
            "traffic_light_info",
            json!({
                "distance_meters": 20,
                "description": "a light that was never confirmed"
            }),
        ),
    ]);
    let record = normalize_hazard(&raw).unwrap();
    assert!(record.traffic_light_info.is_none());
}

#[test]
fn traffic_light_kept_with_detection_flag() {
    let raw = hazard_with(&[
        ("traffic_light_detected", json!(true)),
        (
            "traffic_light_info",
            json!({
                "approximate_distance_meters": 20,
                "description": "pedestrian light showing red"
            }),
        ),
    ]);
    let record = normalize_hazard(&raw).unwrap();
    let sighting = record.traffic_light_info.unwrap();
    assert_eq!(sighting.distance_meters, 20);
    assert!(sighting.requires_deep_analyze);
}

#[test]
fn schema_rejection_names_the_field() {
    let mut raw = raw_hazard();
    raw.as_object_mut().unwrap().remove("one_sentence");
    let err = normalize_hazard(&raw).unwrap_err();
    assert_eq!(err.field(), "one_sentence");

    let err = normalize_hazard(&hazard_with(&[("confidence", json!("high"))])).unwrap_err();
    assert_eq!(err.field(), "confidence");
    assert!(matches!(err, SchemaViolation::WrongType { .. }));
}

#[test]
fn normalization_is_idempotent() {
    let inputs = vec![
        raw_hazard(),
        hazard_with(&[
            ("hazard_detected", json!(false)),
            ("num_hazards", json!(3)),
            ("hazard_types", json!(["car", "ghost"])),
            ("confidence", json!(2.5)),
            ("haptic_recommendation", json!("buzz")),
        ]),
        hazard_with(&[
            ("proximity", json!(" NEAR ")),
            ("bearing", json!("Right")),
            ("haptic_recommendation", json!("invalid")),
        ]),
    ];
    let engine = NormalizationEngine::new();
    for raw in inputs {
        let once = engine.normalize::<HazardReport>(&raw).unwrap();
        let round_tripped = serde_json::to_value(&once).unwrap();
        let twice = engine.normalize::<HazardReport>(&round_tripped).unwrap();
        assert_eq!(once, twice);

        let second_pass = engine
            .normalize_with_report::<HazardReport>(&round_tripped)
            .unwrap();
        assert!(
            second_pass.repairs.is_empty(),
            "second pass repaired {:?}",
            second_pass.repairs
        );
    }
}

#[test]
fn guidance_reset_when_no_hazard() {
    let raw = json!({
        "hazard_detected": false,
        "hazard_guidance": "Loud construction to your left",
        "haptic_recommendation": "left_haptic",
        "navigation_instruction": "Turn left onto Pine Street",
        "confidence": 0.7,
        "notes": "generator was unsure"
    });
    let record = normalize_guidance(&raw).unwrap();
    assert_eq!(record.hazard_guidance, "");
    assert_eq!(record.haptic_recommendation, HapticCue::NoHaptic);
    assert_eq!(record.navigation_instruction, "Turn left onto Pine Street");
    assert_eq!(record.notes, "generator was unsure");
}

#[test]
fn guidance_invalid_haptic_collapses_without_derivation() {
    let raw = json!({
        "hazard_detected": true,
        "hazard_guidance": "Obstacle on the crosswalk",
        "haptic_recommendation": "strong_buzz",
        "navigation_instruction": "Cross at the light"
    });
    let record = normalize_guidance(&raw).unwrap();
    assert_eq!(record.haptic_recommendation, HapticCue::NoHaptic);
    assert_eq!(record.hazard_guidance, "Obstacle on the crosswalk");
}

#[test]
fn guidance_defaults_applied() {
    let raw = json!({ "navigation_instruction": "Continue straight for 200 meters" });
    let record = normalize_guidance(&raw).unwrap();
    assert!(!record.hazard_detected);
    assert_eq!(record.confidence, 0.9);
    assert!(record.traffic_light_info.is_none());
}

// --- HTTP handler, end to end ---

fn router() -> axum::Router {
    create_router(HandlerState::new().unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn handler_round_trip_matches_engine() {
    let raw = hazard_with(&[("haptic_recommendation", json!("bogus"))]);
    let expected = serde_json::to_value(normalize_hazard(&raw).unwrap()).unwrap();

    let response = router()
        .oneshot(post_json("/normalize/hazard", raw))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["record"], expected);
}

#[tokio::test]
async fn handler_reports_schema_violation_as_transient_upstream_failure() {
    let raw = json!({ "hazard_detected": true });
    let response = router()
        .oneshot(post_json("/normalize/hazard", raw))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "SCHEMA_VIOLATION");
    assert_eq!(body["error"]["details"]["retry_upstream"], true);
}

#[tokio::test]
async fn handler_normalized_record_passes_back_through_engine_unchanged() {
    let raw = hazard_with(&[("confidence", json!(3.0))]);
    let response = router()
        .oneshot(post_json("/normalize/hazard", raw))
        .await
        .unwrap();
    let body = body_json(response).await;
    let record = body["data"]["record"].clone();

    let reparsed = normalize_hazard(&record).unwrap();
    assert_eq!(serde_json::to_value(&reparsed).unwrap(), record);
}
