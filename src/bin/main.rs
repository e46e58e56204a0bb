//! Hazard Validation Agent CLI
//!
//! Command-line interface for the Hazard Validation Agent.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a recorded hazard analysis
//! hazard-validate normalize --input response.json --kind hazard
//!
//! # Check whether a guidance record needs repairs
//! hazard-validate check --input response.json --kind guidance --format json
//!
//! # Print the closed hazard vocabulary
//! hazard-validate vocabulary
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - record normalized, no repairs needed
//! - 1: The schema gate rejected the record
//! - 2: Record normalized, guardrail repairs applied (check only)
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 10: Internal error

use clap::Parser;
use hazard_validation::{run_cli, HazardValidateCli};

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    // Parse CLI arguments
    let cli = HazardValidateCli::parse();

    // Run the CLI and exit with appropriate code
    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
