// ABOUTME: Integration tests for the liveness and readiness endpoints
// ABOUTME: Verifies response shape and database-backed readiness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::create_test_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _resources) = create_test_router().await;

    let body: Value = AxumTestRequest::get("/health")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_checks_database() {
    let (app, _resources) = create_test_router().await;

    let body: Value = AxumTestRequest::get("/ready")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], true);
    assert_eq!(body["remoteInference"], false);
}

#[tokio::test]
async fn test_ready_endpoint_reports_closed_database() {
    let (app, resources) = create_test_router().await;
    resources.database.pool().close().await;

    let body: Value = AxumTestRequest::get("/ready")
        .send(app)
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .json();

    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _resources) = create_test_router().await;

    let response = AxumTestRequest::get("/api/unknown").send(app).await;
    assert_eq!(response.status(), 404);
}
