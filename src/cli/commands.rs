//! CLI command definitions for the Hazard Validation Agent
//!
//! Clap-based commands for normalizing recorded generator output files,
//! checking records against the contract, and printing the closed
//! vocabulary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::output::{NormalizeOutput, OutputFormat, ViolationOutput, VocabularyOutput};
use super::ExitCode;
use crate::contracts::{GuidanceReport, HazardReport};
use crate::engine::{NormalizationEngine, ReportContract};
use crate::error::AgentError;

/// Hazard Validation Agent CLI
///
/// Normalize vision-model hazard and guidance records, check which repairs
/// a record needs, and inspect the closed hazard vocabulary.
#[derive(Parser, Debug)]
#[command(name = "hazard-validate")]
#[command(about = "Hazard Validation Agent - normalize and check generator records", long_about = None)]
#[command(version)]
pub struct HazardValidateCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: HazardValidateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum HazardValidateCommands {
    /// Normalize a recorded generator response
    ///
    /// Runs the record through the full pipeline (schema gate,
    /// canonicalizer, guardrail repairer) and prints the normalized
    /// record.
    Normalize {
        /// Path to the JSON file holding the raw generator output
        #[arg(short, long)]
        input: PathBuf,

        /// Record kind to normalize as
        #[arg(short, long, value_enum, default_value = "hazard")]
        kind: RecordKind,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Check a recorded generator response against the contract
    ///
    /// Like normalize, but the exit code reports whether the record was
    /// already contract-clean: 0 when no repairs were needed, 2 when
    /// guardrails fired, 1 when the schema gate rejected it.
    Check {
        /// Path to the JSON file holding the raw generator output
        #[arg(short, long)]
        input: PathBuf,

        /// Record kind to check as
        #[arg(short, long, value_enum, default_value = "hazard")]
        kind: RecordKind,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Print the closed hazard vocabulary and alias table
    Vocabulary {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Record kinds accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum RecordKind {
    /// Obstacle detection record
    Hazard,
    /// Turn-by-turn guidance record
    Guidance,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Hazard => write!(f, "hazard"),
            RecordKind::Guidance => write!(f, "guidance"),
        }
    }
}

/// Execute the normalize command
pub fn execute_normalize(
    input: PathBuf,
    kind: RecordKind,
    format: Option<OutputFormat>,
) -> Result<ExitCode, AgentError> {
    let raw = load_record_file(&input)?;
    let format = format.unwrap_or(OutputFormat::Table);
    match kind {
        RecordKind::Hazard => run_pipeline::<HazardReport>(&raw, format, false),
        RecordKind::Guidance => run_pipeline::<GuidanceReport>(&raw, format, false),
    }
}

/// Execute the check command
pub fn execute_check(
    input: PathBuf,
    kind: RecordKind,
    format: Option<OutputFormat>,
) -> Result<ExitCode, AgentError> {
    let raw = load_record_file(&input)?;
    let format = format.unwrap_or(OutputFormat::Table);
    match kind {
        RecordKind::Hazard => run_pipeline::<HazardReport>(&raw, format, true),
        RecordKind::Guidance => run_pipeline::<GuidanceReport>(&raw, format, true),
    }
}

/// Execute the vocabulary command
pub fn execute_vocabulary(format: Option<OutputFormat>) -> Result<ExitCode, AgentError> {
    let output = VocabularyOutput::collect();
    output.render(format.unwrap_or(OutputFormat::Table))?;
    Ok(ExitCode::Success)
}

/// Shared pipeline runner for both record kinds.
///
/// `strict_exit` makes applied repairs visible in the exit code (the check
/// command); normalize treats repairs as normal operation.
fn run_pipeline<R: ReportContract + 'static>(
    raw: &serde_json::Value,
    format: OutputFormat,
    strict_exit: bool,
) -> Result<ExitCode, AgentError> {
    let engine = NormalizationEngine::new();
    match engine.normalize_with_report::<R>(raw) {
        Ok(normalized) => {
            let repaired = !normalized.repairs.is_empty();
            let output = NormalizeOutput::from_normalized(R::KIND, &normalized)?;
            output.render(format)?;
            if strict_exit && repaired {
                Ok(ExitCode::RepairsApplied)
            } else {
                Ok(ExitCode::Success)
            }
        }
        Err(violation) => {
            ViolationOutput::from_violation(R::KIND, &violation).render(format)?;
            Ok(ExitCode::SchemaViolation)
        }
    }
}

/// Load and parse a raw record file (JSON only - the generator speaks JSON)
fn load_record_file(path: &PathBuf) -> Result<serde_json::Value, AgentError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AgentError::FileError(format!(
            "Failed to read record file '{}': {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| AgentError::ParseError(format!("Invalid JSON: {}", e)))
}
