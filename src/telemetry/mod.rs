//! Telemetry for the Hazard Validation Agent
//!
//! Provides Prometheus metrics for normalization operations and payload
//! fingerprinting for log correlation. The engine itself stays free of
//! side effects; all recording happens in the glue layers around it.

pub mod metrics;

pub use metrics::{EngineMetrics, EngineMetricsRegistry};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from telemetry operations
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Metrics registration or collection error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Text exposition encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type alias for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// SHA-256 fingerprint of a raw payload, hex encoded.
///
/// Used to correlate handler logs and response metadata with upstream
/// generator output without echoing the payload itself.
pub fn payload_fingerprint(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Fingerprint of a decoded JSON value (via its compact serialization).
pub fn value_fingerprint(value: &serde_json::Value) -> String {
    payload_fingerprint(&value.to_string())
}
