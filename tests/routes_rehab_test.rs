// ABOUTME: Integration tests for the rehab limb symmetry route
// ABOUTME: Checks LSI scoring, the return-to-sport threshold, pain flags, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use stridesafe_server::routes::RehabRoutes;

async fn score(body: &Value) -> Value {
    AxumTestRequest::post("/api/rehab/limb-symmetry")
        .json(body)
        .send(RehabRoutes::routes())
        .await
        .assert_status(StatusCode::OK)
        .json()
}

#[tokio::test]
async fn test_symmetric_hop_meets_threshold() {
    let result = score(&json!({
        "testName": "single_hop",
        "injuredLimbValue": 45.0,
        "healthyLimbValue": 50.0
    }))
    .await;

    assert_eq!(result["testName"], "single_hop");
    assert_eq!(result["lsiPercent"], 90.0);
    assert_eq!(result["meetsReturnToSportThreshold"], true);
    assert_eq!(result["painFlag"], false);
}

#[tokio::test]
async fn test_asymmetric_hop_with_pain_is_flagged() {
    let result = score(&json!({
        "testName": "triple_hop",
        "injuredLimbValue": 120.0,
        "healthyLimbValue": 160.0,
        "pain0to10": 4
    }))
    .await;

    assert_eq!(result["lsiPercent"], 75.0);
    assert_eq!(result["meetsReturnToSportThreshold"], false);
    assert_eq!(result["painFlag"], true);
}

#[tokio::test]
async fn test_zero_healthy_value_has_no_index() {
    let result = score(&json!({
        "testName": "single_hop",
        "injuredLimbValue": 10.0,
        "healthyLimbValue": 0.0
    }))
    .await;

    assert!(result.get("lsiPercent").is_none());
    assert_eq!(result["meetsReturnToSportThreshold"], false);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let error: Value = AxumTestRequest::post("/api/rehab/limb-symmetry")
        .json(&json!({
            "testName": "",
            "injuredLimbValue": -1.0,
            "healthyLimbValue": 50.0,
            "pain0to10": 11
        }))
        .send(RehabRoutes::routes())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    let fields: Vec<&str> = error["error"]["details"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["testName", "injuredLimbValue", "pain0to10"]);
}

#[tokio::test]
async fn test_missing_values_are_rejected() {
    AxumTestRequest::post("/api/rehab/limb-symmetry")
        .json(&json!({"testName": "single_hop"}))
        .send(RehabRoutes::routes())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
