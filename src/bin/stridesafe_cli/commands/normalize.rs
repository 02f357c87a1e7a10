// ABOUTME: Normalize command for stridesafe-cli
// ABOUTME: Reads an assessment record file and prints its normalized view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::path::Path;
use stridesafe_server::{
    errors::{AppError, AppResult},
    models::AssessmentRecord,
};
use stridesafe_intelligence::normalize_assessment;

use crate::helpers::display::print_json;

type Result<T> = AppResult<T>;

/// Run the `normalize` subcommand
pub fn run(record_path: &Path, raw_path: Option<&Path>) -> Result<()> {
    let record: AssessmentRecord = serde_json::from_str(&read(record_path)?)?;

    let raw = raw_path.map(read).transpose()?;
    let raw = raw.as_deref().or(record.raw_model_output.as_deref());

    let view = normalize_assessment(&record, raw)?;
    print_json(&view)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| AppError::storage(format!("Failed to read {}: {e}", path.display())))
}
