// ABOUTME: Request tracing middleware creating one span per HTTP request
// ABOUTME: Each span carries a generated request ID, method, and path for log correlation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::Body;
use http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};
use uuid::Uuid;

/// Span constructor used by [`request_trace_layer`]
pub type MakeRequestSpan = fn(&Request<Body>) -> Span;

/// Span for one request, tagged with a fresh `req_` ID
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = format!("req_{}", Uuid::new_v4().simple());
    info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// `TraceLayer` using [`make_request_span`]
#[must_use]
pub fn request_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeRequestSpan>
{
    TraceLayer::new_for_http().make_span_with(make_request_span as MakeRequestSpan)
}
