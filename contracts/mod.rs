//! Wire contracts for validated records
//!
//! These types define the record shapes delivered to downstream consumers
//! (speech synthesis, haptic actuators, navigation UI). Field names, types,
//! and defaults are the wire contract: any serializer must reproduce them
//! byte-for-byte. Both record kinds carry hazard-schema v3.0 semantics
//! (haptic and traffic-light fields present).
//!
//! Construction from untrusted input goes through the engine's schema gate;
//! the serde `Deserialize` impls exist for trusted round-trips (tests,
//! replaying already-normalized records), not for ingesting generator
//! output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version tag for both record kinds (haptics + traffic lights).
pub const SCHEMA_VERSION: &str = "3.0";

/// Directional feedback instruction for the wearable actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticCue {
    LeftHaptic,
    RightHaptic,
    FullHaptic,
    NoHaptic,
}

impl HapticCue {
    /// All four cues, for introspection endpoints and tests.
    pub const ALL: [HapticCue; 4] = [
        HapticCue::LeftHaptic,
        HapticCue::RightHaptic,
        HapticCue::FullHaptic,
        HapticCue::NoHaptic,
    ];

    /// Wire spelling of this cue
    pub fn as_str(self) -> &'static str {
        match self {
            HapticCue::LeftHaptic => "left_haptic",
            HapticCue::RightHaptic => "right_haptic",
            HapticCue::FullHaptic => "full_haptic",
            HapticCue::NoHaptic => "no_haptic",
        }
    }

    /// Parse an already lowercased/trimmed label.
    ///
    /// Returns `None` for anything outside the four-value domain; the
    /// guardrail repairer decides what to do with such input.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "left_haptic" => Some(HapticCue::LeftHaptic),
            "right_haptic" => Some(HapticCue::RightHaptic),
            "full_haptic" => Some(HapticCue::FullHaptic),
            "no_haptic" => Some(HapticCue::NoHaptic),
            _ => None,
        }
    }
}

impl Default for HapticCue {
    fn default() -> Self {
        HapticCue::NoHaptic
    }
}

impl fmt::Display for HapticCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reported traffic light.
///
/// Present in a record only alongside a positive `traffic_light_detected`
/// flag; otherwise the record carries a true absence, never a default-valued
/// sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLightSighting {
    /// Estimated distance to the light in meters
    #[serde(alias = "approximate_distance_meters")]
    pub distance_meters: u32,
    /// Short description of the light and its state
    pub description: String,
    /// Whether a dedicated traffic analysis pass should be scheduled
    #[serde(default = "default_requires_deep_analyze")]
    pub requires_deep_analyze: bool,
}

fn default_requires_deep_analyze() -> bool {
    true
}

/// Obstacle detection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    pub hazard_detected: bool,
    pub num_hazards: u32,
    /// Canonical tags in first-seen saliency order, no duplicates
    pub hazard_types: Vec<String>,
    /// Spoken one-line summary, 1-200 characters
    pub one_sentence: String,
    /// Spoken evasive action, 1-250 characters
    pub evasive_suggestion: String,
    /// Free-form bearing label, lowercased ("left", "right", "center", ...)
    pub bearing: String,
    /// Free-form proximity label, lowercased ("near", "far", ...)
    pub proximity: String,
    /// Generator confidence, clamped into [0.0, 1.0]
    pub confidence: f64,
    /// Free-form notes, at most 300 characters
    pub notes: String,
    pub haptic_recommendation: HapticCue,
    pub traffic_light_detected: bool,
    pub traffic_light_info: Option<TrafficLightSighting>,
}

/// Turn-by-turn instruction fused with hazard and traffic-light sightings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceReport {
    pub hazard_detected: bool,
    /// Spoken first when a hazard exists; empty otherwise
    pub hazard_guidance: String,
    pub haptic_recommendation: HapticCue,
    /// Enhanced navigation instruction, 1-300 characters
    pub navigation_instruction: String,
    pub traffic_light_detected: bool,
    pub traffic_light_info: Option<TrafficLightSighting>,
    /// Generator confidence, clamped into [0.0, 1.0], defaults to 0.9
    pub confidence: f64,
    pub notes: String,
}
