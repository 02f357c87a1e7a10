// ABOUTME: Domain service layer for business logic shared by route handlers and the CLI
// ABOUTME: Keeps HTTP extraction out of the rules for combining local and remote results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services are protocol-agnostic so the HTTP API and `stridesafe-cli` apply
//! the same rules regardless of the entry point.

/// Phase estimate resolution: local engine with optional remote cross-check
pub mod phase;

pub use phase::{PhaseResolution, PhaseService};
