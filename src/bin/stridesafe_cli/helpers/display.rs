// ABOUTME: Output formatting helpers for stridesafe-cli
// ABOUTME: JSON results go to stdout; soft notices go to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use stridesafe_server::errors::AppResult;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a non-fatal notice on stderr so stdout stays machine-readable
pub fn print_notice(notice: &str) {
    eprintln!("note: {notice}");
}
