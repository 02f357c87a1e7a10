// ABOUTME: Integration tests for remote phase inference and local fallback
// ABOUTME: Runs real HTTP estimators on loopback listeners and checks PhaseService behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::{http::StatusCode, routing::post, Json, Router};
use chrono::{TimeZone, Utc};
use common::{create_test_router, create_test_server_resources};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use stridesafe_server::{
    errors::ErrorCode,
    inference::{HttpPhaseEstimator, PhaseEstimator},
    models::{CyclePhase, CycleSignals, EstimateSource},
    routes,
    services::PhaseService,
};
use tokio::net::TcpListener;

const ESTIMATE_PATH: &str = "/api/cycle/phase-estimate";

/// Serve `app` on an ephemeral loopback port and return its base URL
async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn estimator(base_url: &str) -> HttpPhaseEstimator {
    HttpPhaseEstimator::new(format!("{base_url}{ESTIMATE_PATH}"), Duration::from_secs(5)).unwrap()
}

fn logged_signals() -> CycleSignals {
    CycleSignals {
        last_period_iso: "2025-03-01".into(),
        avg_cycle_days: 28,
        ..CycleSignals::default()
    }
}

fn fixed_estimator_app(body: Value) -> Router {
    Router::new().route(
        ESTIMATE_PATH,
        post(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}

#[tokio::test]
async fn test_remote_estimate_is_used() {
    let base_url = spawn_server(fixed_estimator_app(json!({
        "phase": "luteal",
        "confidence0to1": 0.9,
        "reasons": ["model"]
    })))
    .await;
    let service = PhaseService::with_estimator(Arc::new(estimator(&base_url)));

    let resolution = service.resolve(&logged_signals()).await;

    assert_eq!(resolution.source, EstimateSource::Remote);
    assert_eq!(resolution.estimate.phase, CyclePhase::Luteal);
    assert!(resolution.notice.is_none());
}

#[tokio::test]
async fn test_stridesafe_server_can_act_as_remote() {
    let (remote_app, _remote_resources) = create_test_router().await;
    let base_url = spawn_server(remote_app).await;
    let remote = estimator(&base_url);

    let estimate = remote.estimate(&CycleSignals::default()).await.unwrap();

    assert_eq!(estimate.phase, CyclePhase::Unsure);
    assert!((estimate.confidence_0_to_1 - 0.45).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unreachable_remote_falls_back_to_local() {
    // Discard port; nothing listens on it in the test environment
    let service = PhaseService::with_estimator(Arc::new(estimator("http://127.0.0.1:9")));
    let now = Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap();

    let resolution = service.resolve_at(&logged_signals(), now).await;

    assert_eq!(resolution.source, EstimateSource::Local);
    assert_eq!(resolution.estimate.phase, CyclePhase::Follicular);
    assert_eq!(
        resolution.notice.as_deref(),
        Some("Using on-device estimate; remote service unavailable")
    );
}

#[tokio::test]
async fn test_unreachable_remote_error_code() {
    let error = estimator("http://127.0.0.1:9")
        .estimate(&logged_signals())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_out_of_range_confidence_falls_back() {
    let base_url = spawn_server(fixed_estimator_app(json!({
        "phase": "luteal",
        "confidence0to1": 1.5
    })))
    .await;
    let remote = estimator(&base_url);

    let error = remote.estimate(&logged_signals()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);

    let service = PhaseService::with_estimator(Arc::new(remote));
    let resolution = service.resolve(&logged_signals()).await;
    assert_eq!(resolution.source, EstimateSource::Local);
    assert!(resolution.notice.is_some());
}

#[tokio::test]
async fn test_error_status_falls_back() {
    let app = Router::new().route(
        ESTIMATE_PATH,
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = spawn_server(app).await;

    let error = estimator(&base_url)
        .estimate(&logged_signals())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_malformed_remote_body_falls_back() {
    let base_url = spawn_server(fixed_estimator_app(json!({"phase": "sometimes"}))).await;
    let service = PhaseService::with_estimator(Arc::new(estimator(&base_url)));

    let resolution = service.resolve(&logged_signals()).await;

    assert_eq!(resolution.source, EstimateSource::Local);
    assert!(resolution.notice.is_some());
}

#[tokio::test]
async fn test_plan_route_reports_fallback_notice() {
    let service = PhaseService::with_estimator(Arc::new(estimator("http://127.0.0.1:9")));
    let resources = create_test_server_resources(service).await;
    let app = routes::router(resources);

    let resolution: Value = AxumTestRequest::post("/api/cycle/plan")
        .json(&json!({"lastPeriodISO": "2025-03-01"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(resolution["source"], "local");
    assert_eq!(
        resolution["notice"],
        "Using on-device estimate; remote service unavailable"
    );

    let ready: Value = AxumTestRequest::get("/ready")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(ready["remoteInference"], true);
}
