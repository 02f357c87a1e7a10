// ABOUTME: StrideSafe CLI - offline phase estimates and assessment normalization
// ABOUTME: Reads and writes client-local signals; never talks to the StrideSafe database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Log a period start and get today's estimate and training plan
//! stridesafe-cli phase --last-period 2025-03-01 --cycle-days 30
//!
//! # Add symptoms to the stored signals
//! stridesafe-cli phase --symptom cramps --symptom fatigue
//!
//! # Cross-check with a remote estimator, falling back to the local result
//! stridesafe-cli phase --remote http://127.0.0.1:8081
//!
//! # Normalize a stored assessment record, optionally with a separate raw model output
//! stridesafe-cli normalize --record assessment.json --raw model_output.json
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stridesafe_server::{
    errors::{AppError, AppResult},
    logging::LoggingConfig,
};

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "stridesafe-cli",
    about = "StrideSafe command-line tool",
    long_about = "Offline cycle phase estimates from locally stored signals, and assessment record normalization."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Update stored cycle signals and print the phase estimate and training plan
    Phase(commands::phase::PhaseArgs),

    /// Print the normalized view of an assessment record
    Normalize {
        /// Path to an `AssessmentRecord` JSON file
        #[arg(long)]
        record: PathBuf,

        /// Path to a raw model output file, replacing the record's own
        #[arg(long)]
        raw: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose)
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

    match cli.command {
        Command::Phase(args) => commands::phase::run(args).await,
        Command::Normalize { record, raw } => commands::normalize::run(&record, raw.as_deref()),
    }
}
