//! CLI module for the Hazard Validation Agent
//!
//! Command-line interface for normalizing recorded generator output,
//! checking which repairs a record needs, and inspecting the closed
//! hazard vocabulary.

pub mod commands;
pub mod output;

pub use commands::{HazardValidateCli, HazardValidateCommands, RecordKind};
pub use output::{NormalizeOutput, OutputFormat};

use crate::error::AgentError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, record normalized with no repairs needed
    Success = 0,
    /// The schema gate rejected the record
    SchemaViolation = 1,
    /// Record normalized, but guardrail repairs were applied
    RepairsApplied = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: HazardValidateCli) -> Result<ExitCode, AgentError> {
    match cli.command {
        HazardValidateCommands::Normalize {
            input,
            kind,
            format,
        } => commands::execute_normalize(input, kind, format),
        HazardValidateCommands::Check {
            input,
            kind,
            format,
        } => commands::execute_check(input, kind, format),
        HazardValidateCommands::Vocabulary { format } => commands::execute_vocabulary(format),
    }
}
