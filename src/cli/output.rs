//! Output formatting for the Hazard Validation Agent CLI
//!
//! Structured output in JSON and human-readable table formats, with
//! colored repair and violation reporting.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::engine::Normalized;
use crate::error::{AgentError, SchemaViolation};
use crate::taxonomy;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
}

/// Normalization output structure for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeOutput {
    /// Record kind ("hazard" or "guidance")
    pub kind: String,
    /// Whether any guardrail repairs were applied
    pub repaired: bool,
    /// Ids of the guardrails that fired, in evaluation order
    pub repairs_applied: Vec<String>,
    /// The fully normalized record
    pub record: serde_json::Value,
    /// Summary message
    pub summary: String,
}

impl NormalizeOutput {
    /// Create output from a normalization result
    pub fn from_normalized<R: Serialize>(
        kind: &str,
        normalized: &Normalized<R>,
    ) -> Result<Self, AgentError> {
        let record = serde_json::to_value(&normalized.record)
            .map_err(|e| AgentError::SerializationError(e.to_string()))?;
        let repaired = !normalized.repairs.is_empty();
        let summary = if repaired {
            format!(
                "Record normalized with {} repair(s)",
                normalized.repairs.len()
            )
        } else {
            "Record already satisfies the contract".to_string()
        };
        Ok(Self {
            kind: kind.to_string(),
            repaired,
            repairs_applied: normalized.repairs.iter().map(|id| id.to_string()).collect(),
            record,
            summary,
        })
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), AgentError> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Table => self.render_table(),
        }
    }

    fn render_table(&self) -> Result<(), AgentError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Normalization Results".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        let status_icon = if self.repaired {
            "!".yellow()
        } else {
            "+".green()
        };
        writeln!(stdout, "{} [{}] {}", status_icon, self.kind, self.summary).ok();

        if !self.repairs_applied.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Repairs applied:".cyan().bold()).ok();
            for repair in &self.repairs_applied {
                writeln!(stdout, "  {} {}", "-".yellow(), repair).ok();
            }
        }

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Record:".cyan().bold()).ok();
        let pretty = serde_json::to_string_pretty(&self.record)
            .map_err(|e| AgentError::SerializationError(e.to_string()))?;
        writeln!(stdout, "{}", pretty).ok();

        stdout.flush().ok();
        Ok(())
    }
}

/// Schema violation output structure for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationOutput {
    /// Record kind the input was checked as
    pub kind: String,
    /// Offending field (dotted path for nested fields)
    pub field: String,
    /// The violated constraint
    pub constraint: String,
    /// Human-readable message
    pub message: String,
}

impl ViolationOutput {
    /// Create output from a schema violation
    pub fn from_violation(kind: &str, violation: &SchemaViolation) -> Self {
        Self {
            kind: kind.to_string(),
            field: violation.field().to_string(),
            constraint: violation.constraint(),
            message: violation.to_string(),
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), AgentError> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Table => {
                let mut stdout = io::stdout();
                writeln!(stdout).ok();
                writeln!(
                    stdout,
                    "{} {} {}",
                    "x".red(),
                    "SCHEMA VIOLATION".red().bold(),
                    self.message
                )
                .ok();
                writeln!(stdout, "  {} {}", "Field:".dimmed(), self.field.cyan()).ok();
                writeln!(
                    stdout,
                    "  {} {}",
                    "Constraint:".dimmed(),
                    self.constraint.yellow()
                )
                .ok();
                stdout.flush().ok();
                Ok(())
            }
        }
    }
}

/// Vocabulary listing output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyOutput {
    pub schema_version: String,
    pub tags: Vec<String>,
    pub aliases: std::collections::BTreeMap<String, String>,
    pub fallback_tag: String,
}

impl VocabularyOutput {
    /// Collect the process-wide vocabulary tables
    pub fn collect() -> Self {
        Self {
            schema_version: crate::contracts::SCHEMA_VERSION.to_string(),
            tags: taxonomy::CANONICAL_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            aliases: taxonomy::aliases()
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            fallback_tag: taxonomy::FALLBACK_TAG.to_string(),
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), AgentError> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Table => {
                let mut stdout = io::stdout();
                writeln!(stdout).ok();
                writeln!(
                    stdout,
                    "{}",
                    format!("Hazard Vocabulary (schema v{})", self.schema_version)
                        .cyan()
                        .bold()
                )
                .ok();
                writeln!(stdout, "{}", "=".repeat(60)).ok();
                writeln!(stdout).ok();

                writeln!(
                    stdout,
                    "{}",
                    format!("Canonical tags ({}):", self.tags.len()).cyan().bold()
                )
                .ok();
                for chunk in self.tags.chunks(5) {
                    writeln!(stdout, "  {}", chunk.join(", ")).ok();
                }

                writeln!(stdout).ok();
                writeln!(stdout, "{}", "Aliases:".cyan().bold()).ok();
                for (from, to) in &self.aliases {
                    writeln!(stdout, "  {} {} {}", from.yellow(), "->".dimmed(), to).ok();
                }

                writeln!(stdout).ok();
                writeln!(
                    stdout,
                    "Fallback category: {}",
                    self.fallback_tag.green().bold()
                )
                .ok();
                stdout.flush().ok();
                Ok(())
            }
        }
    }
}

/// Render any serializable output as pretty JSON
fn render_json<T: Serialize>(output: &T) -> Result<(), AgentError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| AgentError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::HazardReport;
    use crate::engine::NormalizationEngine;
    use serde_json::json;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_normalize_output_summary() {
        let raw = json!({
            "hazard_detected": true,
            "num_hazards": 0,
            "hazard_types": [],
            "one_sentence": "Something ahead.",
            "evasive_suggestion": "Slow down.",
            "bearing": "center",
            "proximity": "far",
            "confidence": 0.5,
            "notes": "",
            "haptic_recommendation": "no_haptic"
        });
        let normalized = NormalizationEngine::new()
            .normalize_with_report::<HazardReport>(&raw)
            .unwrap();
        let output = NormalizeOutput::from_normalized("hazard", &normalized).unwrap();
        assert!(output.repaired);
        assert!(output
            .repairs_applied
            .contains(&"hazard_count_floor".to_string()));
        assert!(output
            .repairs_applied
            .contains(&"fallback_category".to_string()));
        assert!(output.summary.contains("repair"));
    }

    #[test]
    fn test_violation_output_fields() {
        let violation = SchemaViolation::missing("one_sentence");
        let output = ViolationOutput::from_violation("hazard", &violation);
        assert_eq!(output.field, "one_sentence");
        assert_eq!(output.constraint, "required");
    }

    #[test]
    fn test_vocabulary_output_collect() {
        let output = VocabularyOutput::collect();
        assert_eq!(output.tags.len(), 45);
        assert_eq!(output.aliases.get("bike"), Some(&"bicycle".to_string()));
        assert_eq!(output.fallback_tag, "debris");
    }
}
