//! Hazard Validation Agent
//!
//! Validates and normalizes the structured output of an external
//! vision-language model - hazard and navigation analyses of a photographed
//! scene - so that every record delivered to downstream consumers (speech
//! synthesis, haptic actuators, navigation UI) satisfies a strict contract,
//! even when the generator violates type bounds, omits fields, invents
//! out-of-vocabulary labels, or leaves cross-field state inconsistent.
//!
//! ## Features
//!
//! - **Schema Gate**: presence, type, and bound validation with typed
//!   `SchemaViolation` failures naming the offending field
//! - **Canonicalizer**: closed-vocabulary normalization of free-text
//!   category labels through an alias table, order-preserving dedup
//! - **Guardrail Repairer**: ordered cross-field repairs and deterministic
//!   haptic derivation from bearing + proximity
//! - **Two Record Kinds**: hazard detection and navigation guidance share
//!   one parametrized pipeline
//! - **CLI Support**: normalize, check, and vocabulary commands with
//!   machine-readable output
//! - **HTTP Handler**: axum router for serving the engine, with Prometheus
//!   metrics and payload fingerprinting
//!
//! ## Architecture
//!
//! 1. **Engine** (`engine/`): the three-stage pipeline - `gate`,
//!    `canonical`, `guardrail` - behind the `ReportContract` trait.
//!
//! 2. **Contracts** (`contracts/`): wire record shapes (hazard-schema v3.0
//!    with haptics and traffic lights) and the haptic cue enum.
//!
//! 3. **Taxonomy** (`taxonomy`): the immutable closed vocabulary and alias
//!    table, built once at process start.
//!
//! 4. **Handler** (`handler/`): HTTP routes wrapping the engine.
//!
//! 5. **Telemetry** (`telemetry/`): Prometheus metrics and payload
//!    fingerprints.
//!
//! 6. **CLI** (`cli/`): command-line interface over recorded generator
//!    output.
//!
//! ## Example
//!
//! ```rust
//! use hazard_validation::{normalize_hazard, HapticCue};
//!
//! let raw = serde_json::json!({
//!     "hazard_detected": true,
//!     "num_hazards": 1,
//!     "hazard_types": ["cone"],
//!     "one_sentence": "A traffic cone blocks the path ahead.",
//!     "evasive_suggestion": "Step around it on the left.",
//!     "bearing": "center",
//!     "proximity": "near",
//!     "confidence": 1.2,
//!     "notes": ""
//! });
//!
//! let record = normalize_hazard(&raw).unwrap();
//! assert_eq!(record.hazard_types, vec!["trafficcone"]);
//! assert_eq!(record.confidence, 1.0);
//! assert_eq!(record.haptic_recommendation, HapticCue::FullHaptic);
//! ```

// Core modules
pub mod cli;
pub mod engine;
pub mod error;
pub mod handler;
pub mod taxonomy;
pub mod telemetry;

// Contracts module - located at ../contracts relative to src/
#[path = "../contracts/mod.rs"]
pub mod contracts;

// Re-export contract types for external use
pub use contracts::{
    GuidanceReport, HapticCue, HazardReport, TrafficLightSighting, SCHEMA_VERSION,
};

// Re-export the engine surface
pub use engine::{
    normalize_guidance, normalize_hazard, NormalizationEngine, Normalized, ReportContract,
};
pub use engine::guardrail::{DeclaredHaptic, Guardrail, GuardrailContext};

// Re-export error types
pub use error::{AgentError, Result, SchemaViolation};

// Re-export handler types for service deployment
pub use handler::{
    create_router, ApiError, ApiResponse, ErrorInfo, HandlerState, HealthResponse, HealthStatus,
    NormalizedPayload, ResponseMetadata,
};

// Re-export telemetry types
pub use telemetry::{payload_fingerprint, EngineMetrics, EngineMetricsRegistry, TelemetryError};

// Re-export CLI types for command-line usage
pub use cli::{ExitCode, HazardValidateCli, HazardValidateCommands, OutputFormat, RecordKind};

/// Agent version (from Cargo.toml)
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent identifier
pub const AGENT_ID: &str = "hazard-validation-agent";

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
pub fn run_cli(cli: HazardValidateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_error() {
                ExitCode::InvalidInput
            } else {
                ExitCode::InternalError
            }
        }
    }
}
