// ABOUTME: Core types and constants for the StrideSafe movement-safety platform
// ABOUTME: Foundation crate with error handling, data models, and tuning constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # StrideSafe Core
//!
//! Foundation crate providing shared types and constants for the StrideSafe
//! platform. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Tuning values organized by engine
//! - **models**: Assessments, cycle signals and estimates, rehab, risk

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (assessments, cycle phase, rehab, risk)
pub mod models;
