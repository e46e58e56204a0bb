//! Handler module for the Hazard Validation Agent
//!
//! HTTP infrastructure wrapping the normalization engine. The handler
//! receives already-decoded generator output as a JSON body, runs it
//! through the engine, and returns either the normalized record or a
//! schema-violation error. It performs no model calls, no image analysis,
//! and no caching - timeout and retry policy belong to the caller that
//! produced the raw output.
//!
//! ## Design Principles
//!
//! - **Stateless Execution**: no state persisted between invocations
//! - **Deterministic Behavior**: same input produces same output
//! - **Machine-Readable Responses**: JSON format for all responses
//! - **Transient Upstream Failures**: a schema violation is reported with a
//!   retry hint, since it signals an unusable generator response rather
//!   than a permanent contract violation

pub mod routes;

pub use routes::{
    create_router, health_check, normalize_guidance_record, normalize_hazard_record, ApiError,
    HandlerState,
};

use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error information (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    /// Request metadata for tracing
    pub metadata: ResponseMetadata,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, metadata: ResponseMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata,
        }
    }

    /// Create an error response
    pub fn error(error: ErrorInfo, metadata: ResponseMetadata) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
            metadata,
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Response metadata for tracing and debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Unique request identifier
    pub request_id: String,
    /// Timestamp of response generation (ISO 8601)
    pub timestamp: String,
    /// Agent version
    pub version: String,
    /// Record schema version
    pub schema_version: String,
    /// Processing duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// SHA-256 fingerprint of the raw input payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_fingerprint: Option<String>,
}

impl ResponseMetadata {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema_version: crate::contracts::SCHEMA_VERSION.to_string(),
            duration_ms: None,
            input_fingerprint: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.input_fingerprint = Some(fingerprint);
        self
    }
}

/// Payload returned by the normalize endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedPayload {
    /// Record kind ("hazard" or "guidance")
    pub kind: String,
    /// Ids of the guardrails that fired, in evaluation order
    pub repairs_applied: Vec<String>,
    /// The fully normalized record
    pub record: serde_json::Value,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Record schema version served by this agent
    pub schema_version: String,
    /// Size of the closed hazard vocabulary
    pub vocabulary_size: usize,
    pub timestamp: String,
    pub version: String,
}

/// Health status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Vocabulary introspection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyResponse {
    pub schema_version: String,
    /// Canonical tags in taxonomy order
    pub tags: Vec<String>,
    /// Alias spellings and the canonical tag each resolves to
    pub aliases: std::collections::BTreeMap<String, String>,
    /// Category assigned to uncategorized detected hazards
    pub fallback_tag: String,
}
