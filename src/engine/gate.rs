//! Schema gate - structural validation only, no semantic repair
//!
//! Given an arbitrary key/value mapping, produce a typed candidate record if
//! and only if every required field is present and satisfies its declared
//! type and bound; otherwise fail with a `SchemaViolation` naming the
//! offending field and the violated constraint.
//!
//! Two deliberate lenience points: JSON `null` counts as absence (optional
//! fields take their default, required fields report as missing), and the
//! confidence field accepts anything coercible to a float - its range is
//! repaired downstream, since out-of-range confidence is almost always a
//! scale artifact from the generator rather than a structural error.

use serde_json::{Map, Value};

use super::guardrail::DeclaredHaptic;
use crate::contracts::{GuidanceReport, HapticCue, HazardReport, TrafficLightSighting};
use crate::error::SchemaViolation;
use crate::taxonomy::fold_label;

/// Default confidence for guidance records when the generator omits it.
const GUIDANCE_DEFAULT_CONFIDENCE: f64 = 0.9;

/// JSON type name for violation messages
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fetch a field, treating explicit null as absence
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

/// Fetch a required field
fn required<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Value, SchemaViolation> {
    present(map, key).ok_or_else(|| SchemaViolation::missing(key))
}

fn bool_at(value: &Value, path: &str) -> Result<bool, SchemaViolation> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(SchemaViolation::wrong_type(
            path,
            "boolean",
            json_type(other),
        )),
    }
}

fn u32_at(value: &Value, path: &str) -> Result<u32, SchemaViolation> {
    let number = match value {
        Value::Number(n) => n,
        other => {
            return Err(SchemaViolation::wrong_type(
                path,
                "integer",
                json_type(other),
            ))
        }
    };

    if let Some(u) = number.as_u64() {
        return u32::try_from(u).map_err(|_| {
            SchemaViolation::out_of_range(path, format!("0..={}", u32::MAX), u.to_string())
        });
    }
    if number.as_i64().is_some() {
        return Err(SchemaViolation::out_of_range(
            path,
            ">= 0",
            number.to_string(),
        ));
    }
    // A float: accept only integral non-negative values in range
    let f = number.as_f64().unwrap_or(f64::NAN);
    if f < 0.0 {
        return Err(SchemaViolation::out_of_range(path, ">= 0", number.to_string()));
    }
    if f.fract() != 0.0 || !f.is_finite() {
        return Err(SchemaViolation::wrong_type(path, "integer", "fractional number"));
    }
    if f > u32::MAX as f64 {
        return Err(SchemaViolation::out_of_range(
            path,
            format!("0..={}", u32::MAX),
            number.to_string(),
        ));
    }
    Ok(f as u32)
}

/// Coerce a confidence-like field to a float. Accepts JSON numbers and
/// numeric strings; range is NOT enforced here.
fn f64_at(value: &Value, path: &str) -> Result<f64, SchemaViolation> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SchemaViolation::wrong_type(path, "number", n.to_string())),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            SchemaViolation::wrong_type(path, "number", format!("string \"{}\"", s))
        }),
        other => Err(SchemaViolation::wrong_type(
            path,
            "number",
            json_type(other),
        )),
    }
}

/// Extract a string with declared length bounds (counted in characters)
fn string_at(
    value: &Value,
    path: &str,
    min: usize,
    max: usize,
) -> Result<String, SchemaViolation> {
    let s = match value {
        Value::String(s) => s,
        other => {
            return Err(SchemaViolation::wrong_type(
                path,
                "string",
                json_type(other),
            ))
        }
    };
    let len = s.chars().count();
    if len < min || len > max {
        return Err(SchemaViolation::length_out_of_bounds(
            path,
            format!("{}..={} characters", min, max),
            len,
        ));
    }
    Ok(s.clone())
}

/// Extract an unbounded free-form string
fn text_at(value: &Value, path: &str) -> Result<String, SchemaViolation> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(SchemaViolation::wrong_type(
            path,
            "string",
            json_type(other),
        )),
    }
}

fn string_list_at(value: &Value, path: &str) -> Result<Vec<String>, SchemaViolation> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SchemaViolation::wrong_type(
                path,
                "array",
                json_type(other),
            ))
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(SchemaViolation::ElementTypeMismatch {
                field: path.to_string(),
                index,
                expected: "string",
                actual: json_type(other).to_string(),
            }),
        })
        .collect()
}

/// Parse the declared haptic value without judging it.
///
/// The guardrail repairer owns the decision for missing/unrecognized
/// values; the gate only rejects outright type mismatches.
fn declared_haptic_at(
    map: &Map<String, Value>,
    key: &str,
) -> Result<DeclaredHaptic, SchemaViolation> {
    match present(map, key) {
        None => Ok(DeclaredHaptic::Invalid),
        Some(Value::String(s)) => Ok(match HapticCue::from_label(&fold_label(s)) {
            Some(cue) => DeclaredHaptic::Valid(cue),
            None => DeclaredHaptic::Invalid,
        }),
        Some(other) => Err(SchemaViolation::wrong_type(key, "string", json_type(other))),
    }
}

fn sighting_at(value: &Value, path: &str) -> Result<TrafficLightSighting, SchemaViolation> {
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(SchemaViolation::wrong_type(
                path,
                "object",
                json_type(other),
            ))
        }
    };

    // The generator historically spelled this field two ways
    let distance_path = format!("{}.distance_meters", path);
    let distance_value = present(obj, "distance_meters")
        .or_else(|| present(obj, "approximate_distance_meters"))
        .ok_or_else(|| SchemaViolation::missing(&distance_path))?;
    let distance_meters = u32_at(distance_value, &distance_path)?;

    let description_path = format!("{}.description", path);
    let description = string_at(
        required(obj, "description").map_err(|_| SchemaViolation::missing(&description_path))?,
        &description_path,
        0,
        200,
    )?;

    let requires_deep_analyze = match present(obj, "requires_deep_analyze") {
        None => true,
        Some(value) => bool_at(value, &format!("{}.requires_deep_analyze", path))?,
    };

    Ok(TrafficLightSighting {
        distance_meters,
        description,
        requires_deep_analyze,
    })
}

fn optional_sighting(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<TrafficLightSighting>, SchemaViolation> {
    match present(map, key) {
        None => Ok(None),
        Some(value) => sighting_at(value, key).map(Some),
    }
}

/// Gate a raw mapping into a hazard record candidate.
pub fn extract_hazard(
    map: &Map<String, Value>,
) -> Result<(HazardReport, DeclaredHaptic), SchemaViolation> {
    let hazard_detected = bool_at(required(map, "hazard_detected")?, "hazard_detected")?;
    let num_hazards = u32_at(required(map, "num_hazards")?, "num_hazards")?;
    let hazard_types = string_list_at(required(map, "hazard_types")?, "hazard_types")?;
    let one_sentence = string_at(required(map, "one_sentence")?, "one_sentence", 1, 200)?;
    let evasive_suggestion = string_at(
        required(map, "evasive_suggestion")?,
        "evasive_suggestion",
        1,
        250,
    )?;
    let bearing = text_at(required(map, "bearing")?, "bearing")?;
    let proximity = text_at(required(map, "proximity")?, "proximity")?;
    let confidence = f64_at(required(map, "confidence")?, "confidence")?;
    let notes = string_at(required(map, "notes")?, "notes", 0, 300)?;
    let declared_haptic = declared_haptic_at(map, "haptic_recommendation")?;
    let traffic_light_detected = match present(map, "traffic_light_detected") {
        None => false,
        Some(value) => bool_at(value, "traffic_light_detected")?,
    };
    let traffic_light_info = optional_sighting(map, "traffic_light_info")?;

    let report = HazardReport {
        hazard_detected,
        num_hazards,
        hazard_types,
        one_sentence,
        evasive_suggestion,
        bearing,
        proximity,
        confidence,
        notes,
        haptic_recommendation: match declared_haptic {
            DeclaredHaptic::Valid(cue) => cue,
            DeclaredHaptic::Invalid => HapticCue::NoHaptic,
        },
        traffic_light_detected,
        traffic_light_info,
    };
    Ok((report, declared_haptic))
}

/// Gate a raw mapping into a guidance record candidate.
pub fn extract_guidance(
    map: &Map<String, Value>,
) -> Result<(GuidanceReport, DeclaredHaptic), SchemaViolation> {
    let hazard_detected = match present(map, "hazard_detected") {
        None => false,
        Some(value) => bool_at(value, "hazard_detected")?,
    };
    let hazard_guidance = match present(map, "hazard_guidance") {
        None => String::new(),
        Some(value) => text_at(value, "hazard_guidance")?,
    };
    let declared_haptic = declared_haptic_at(map, "haptic_recommendation")?;
    let navigation_instruction = string_at(
        required(map, "navigation_instruction")?,
        "navigation_instruction",
        1,
        300,
    )?;
    let traffic_light_detected = match present(map, "traffic_light_detected") {
        None => false,
        Some(value) => bool_at(value, "traffic_light_detected")?,
    };
    let traffic_light_info = optional_sighting(map, "traffic_light_info")?;
    let confidence = match present(map, "confidence") {
        None => GUIDANCE_DEFAULT_CONFIDENCE,
        Some(value) => f64_at(value, "confidence")?,
    };
    let notes = match present(map, "notes") {
        None => String::new(),
        Some(value) => text_at(value, "notes")?,
    };

    let report = GuidanceReport {
        hazard_detected,
        hazard_guidance,
        haptic_recommendation: match declared_haptic {
            DeclaredHaptic::Valid(cue) => cue,
            DeclaredHaptic::Invalid => HapticCue::NoHaptic,
        },
        navigation_instruction,
        traffic_light_detected,
        traffic_light_info,
        confidence,
        notes,
    };
    Ok((report, declared_haptic))
}
