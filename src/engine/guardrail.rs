//! Guardrail repairer - cross-field consistency and signal derivation
//!
//! Each record kind owns an ordered table of guardrails; later rules may
//! depend on earlier corrections. The repairer never fails: it receives
//! only gate-valid input and always produces a record satisfying every
//! contract invariant. All repairs are idempotent - re-running the full
//! pipeline on an already-normalized record yields the identical record.

use crate::contracts::{GuidanceReport, HapticCue, HazardReport};
use crate::taxonomy::FALLBACK_TAG;

/// Outcome of schema-gate parsing of the declared haptic value.
///
/// `Invalid` covers both a missing field and an out-of-domain label; the
/// repairer treats them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredHaptic {
    Valid(HapticCue),
    Invalid,
}

/// Context carried from the schema gate into guardrail evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GuardrailContext {
    pub declared_haptic: DeclaredHaptic,
}

/// A single repair rule. Returns true when it changed the record.
pub struct Guardrail<R> {
    /// Stable identifier, reported in logs, metrics, and check output
    pub id: &'static str,
    pub apply: fn(&mut R, &GuardrailContext) -> bool,
}

/// Hazard repairs in contract order.
pub static HAZARD_GUARDRAILS: &[Guardrail<HazardReport>] = &[
    Guardrail {
        id: "no_hazard_zeroing",
        apply: no_hazard_zeroing,
    },
    Guardrail {
        id: "hazard_count_floor",
        apply: hazard_count_floor,
    },
    Guardrail {
        id: "fallback_category",
        apply: fallback_category,
    },
    Guardrail {
        id: "confidence_clamp",
        apply: hazard_confidence_clamp,
    },
    Guardrail {
        id: "haptic_derivation",
        apply: haptic_derivation,
    },
    Guardrail {
        id: "traffic_light_suppression",
        apply: hazard_traffic_light_suppression,
    },
];

/// Guidance repairs in contract order.
pub static GUIDANCE_GUARDRAILS: &[Guardrail<GuidanceReport>] = &[
    Guardrail {
        id: "confidence_clamp",
        apply: guidance_confidence_clamp,
    },
    Guardrail {
        id: "haptic_fallback",
        apply: haptic_fallback,
    },
    Guardrail {
        id: "traffic_light_suppression",
        apply: guidance_traffic_light_suppression,
    },
    Guardrail {
        id: "no_hazard_guidance_reset",
        apply: no_hazard_guidance_reset,
    },
];

/// Hazard attributes from a "no hazard" response are generator noise.
fn no_hazard_zeroing(report: &mut HazardReport, _: &GuardrailContext) -> bool {
    if report.hazard_detected {
        return false;
    }
    if report.num_hazards == 0 && report.hazard_types.is_empty() {
        return false;
    }
    report.num_hazards = 0;
    report.hazard_types.clear();
    true
}

/// A detected hazard implies at least one.
fn hazard_count_floor(report: &mut HazardReport, _: &GuardrailContext) -> bool {
    if report.hazard_detected && report.num_hazards == 0 {
        report.num_hazards = 1;
        true
    } else {
        false
    }
}

/// Never leave a detected hazard uncategorized.
fn fallback_category(report: &mut HazardReport, _: &GuardrailContext) -> bool {
    if report.hazard_detected && report.hazard_types.is_empty() {
        report.hazard_types.push(FALLBACK_TAG.to_string());
        true
    } else {
        false
    }
}

/// Clamp into [0.0, 1.0]; non-finite values (coerced from strings like
/// "NaN") collapse to 0.0.
fn clamp_confidence(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn hazard_confidence_clamp(report: &mut HazardReport, _: &GuardrailContext) -> bool {
    let clamped = clamp_confidence(report.confidence);
    if clamped.to_bits() != report.confidence.to_bits() {
        report.confidence = clamped;
        true
    } else {
        false
    }
}

fn guidance_confidence_clamp(report: &mut GuidanceReport, _: &GuardrailContext) -> bool {
    let clamped = clamp_confidence(report.confidence);
    if clamped.to_bits() != report.confidence.to_bits() {
        report.confidence = clamped;
        true
    } else {
        false
    }
}

/// Bearing/proximity state machine for missing or invalid haptic values.
///
/// Runs after canonicalization, so bearing and proximity are already
/// lowercased and trimmed.
fn derive_haptic(report: &HazardReport) -> HapticCue {
    if report.hazard_detected && report.proximity == "near" {
        match report.bearing.as_str() {
            "left" => HapticCue::LeftHaptic,
            "right" => HapticCue::RightHaptic,
            "center" => HapticCue::FullHaptic,
            _ => HapticCue::NoHaptic,
        }
    } else {
        HapticCue::NoHaptic
    }
}

/// Derive the haptic cue when the declared value was missing or invalid.
///
/// An explicit, enum-valid declaration is trusted unconditionally, even
/// when it looks inconsistent with bearing/proximity.
fn haptic_derivation(report: &mut HazardReport, context: &GuardrailContext) -> bool {
    match context.declared_haptic {
        DeclaredHaptic::Valid(cue) => {
            report.haptic_recommendation = cue;
            false
        }
        DeclaredHaptic::Invalid => {
            report.haptic_recommendation = derive_haptic(report);
            true
        }
    }
}

/// Guidance records carry no bearing/proximity; invalid declarations
/// collapse to no_haptic.
fn haptic_fallback(report: &mut GuidanceReport, context: &GuardrailContext) -> bool {
    match context.declared_haptic {
        DeclaredHaptic::Valid(cue) => {
            report.haptic_recommendation = cue;
            false
        }
        DeclaredHaptic::Invalid => {
            report.haptic_recommendation = HapticCue::NoHaptic;
            true
        }
    }
}

/// Speculative sightings without a positive detection flag are not surfaced.
fn hazard_traffic_light_suppression(report: &mut HazardReport, _: &GuardrailContext) -> bool {
    if !report.traffic_light_detected && report.traffic_light_info.is_some() {
        report.traffic_light_info = None;
        true
    } else {
        false
    }
}

fn guidance_traffic_light_suppression(
    report: &mut GuidanceReport,
    _: &GuardrailContext,
) -> bool {
    if !report.traffic_light_detected && report.traffic_light_info.is_some() {
        report.traffic_light_info = None;
        true
    } else {
        false
    }
}

/// No hazard means no hazard guidance and no haptic, regardless of what the
/// generator supplied.
fn no_hazard_guidance_reset(report: &mut GuidanceReport, _: &GuardrailContext) -> bool {
    if report.hazard_detected {
        return false;
    }
    let changed = !report.hazard_guidance.is_empty()
        || report.haptic_recommendation != HapticCue::NoHaptic;
    report.hazard_guidance.clear();
    report.haptic_recommendation = HapticCue::NoHaptic;
    changed
}
