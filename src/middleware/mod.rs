// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Layers applied once to the merged router in routes::router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// Request spans with generated request IDs
pub mod tracing;

pub use cors::setup_cors;
pub use tracing::{make_request_span, request_trace_layer};
