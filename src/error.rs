//! Error types for the Hazard Validation Agent
//!
//! The normalization engine can fail in exactly one way: a `SchemaViolation`
//! raised by the schema gate. The canonicalizer and the guardrail repairer
//! are total over gate-valid input and never fail. Everything else (file
//! access, JSON parsing, output serialization) belongs to the glue layers
//! and uses `AgentError`.

use thiserror::Error;

/// Structural validation failure raised by the schema gate.
///
/// Always fatal to the current request, never retried internally, and
/// surfaced verbatim to the caller. Callers should treat a violation as a
/// transient upstream failure (the generator produced an unusable response),
/// not as a permanent contract violation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    /// A required field is absent or explicitly null.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A field is present but carries the wrong JSON type.
    #[error("field '{field}': expected {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: &'static str,
        actual: String,
    },

    /// A numeric field is outside its declared range.
    #[error("field '{field}': value {actual} violates {constraint}")]
    OutOfRange {
        field: String,
        constraint: String,
        actual: String,
    },

    /// A string field violates its declared length bounds.
    #[error("field '{field}': length {actual_len} violates {constraint}")]
    LengthOutOfBounds {
        field: String,
        constraint: String,
        actual_len: usize,
    },

    /// A list element carries the wrong type.
    #[error("field '{field}[{index}]': expected {expected}, got {actual}")]
    ElementTypeMismatch {
        field: String,
        index: usize,
        expected: &'static str,
        actual: String,
    },
}

impl SchemaViolation {
    /// Create a missing-field violation
    pub fn missing(field: impl Into<String>) -> Self {
        SchemaViolation::MissingField {
            field: field.into(),
        }
    }

    /// Create a wrong-type violation
    pub fn wrong_type(
        field: impl Into<String>,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        SchemaViolation::WrongType {
            field: field.into(),
            expected,
            actual: actual.into(),
        }
    }

    /// Create an out-of-range violation
    pub fn out_of_range(
        field: impl Into<String>,
        constraint: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        SchemaViolation::OutOfRange {
            field: field.into(),
            constraint: constraint.into(),
            actual: actual.into(),
        }
    }

    /// Create a length-bounds violation
    pub fn length_out_of_bounds(
        field: impl Into<String>,
        constraint: impl Into<String>,
        actual_len: usize,
    ) -> Self {
        SchemaViolation::LengthOutOfBounds {
            field: field.into(),
            constraint: constraint.into(),
            actual_len,
        }
    }

    /// Name of the offending field (dotted path for nested fields)
    pub fn field(&self) -> &str {
        match self {
            SchemaViolation::MissingField { field } => field,
            SchemaViolation::WrongType { field, .. } => field,
            SchemaViolation::OutOfRange { field, .. } => field,
            SchemaViolation::LengthOutOfBounds { field, .. } => field,
            SchemaViolation::ElementTypeMismatch { field, .. } => field,
        }
    }

    /// Short description of the violated constraint
    pub fn constraint(&self) -> String {
        match self {
            SchemaViolation::MissingField { .. } => "required".to_string(),
            SchemaViolation::WrongType { expected, .. } => format!("type {}", expected),
            SchemaViolation::OutOfRange { constraint, .. } => constraint.clone(),
            SchemaViolation::LengthOutOfBounds { constraint, .. } => constraint.clone(),
            SchemaViolation::ElementTypeMismatch { expected, .. } => {
                format!("elements of type {}", expected)
            }
        }
    }
}

/// Main error type for glue-layer operations (CLI, file loading, rendering)
#[derive(Error, Debug)]
pub enum AgentError {
    /// The schema gate rejected the record
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// JSON parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AgentError {
    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AgentError::Schema(_)
                | AgentError::InvalidInput(_)
                | AgentError::FileError(_)
                | AgentError::ParseError(_)
        )
    }
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::ParseError(format!("JSON error: {}", err))
    }
}

/// Result type alias for glue-layer operations
pub type Result<T> = std::result::Result<T, AgentError>;
