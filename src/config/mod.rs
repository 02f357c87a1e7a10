// ABOUTME: Configuration module for the StrideSafe server and CLI
// ABOUTME: Environment-only settings; no configuration files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable loading
pub mod environment;

pub use environment::{DatabaseUrl, InferenceConfig, ServerConfig, SignalsConfig};
