// ABOUTME: Integration tests for the assessment route handlers
// ABOUTME: Covers creation, normalized reads, coach insight overrides, listing, and risk snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::{http::StatusCode, Router};
use common::{create_test_router, sample_assessment_request};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use std::time::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_assessment(app: &Router, body: &Value) -> Value {
    let response: Value = AxumTestRequest::post("/api/assessments")
        .json(body)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    response["assessment"].clone()
}

fn field_names(error: &Value) -> Vec<String> {
    error["error"]["details"]["fields"]
        .as_array()
        .expect("validation details")
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_owned())
        .collect()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_returns_normalized_view() {
    let (app, _resources) = create_test_router().await;

    let view = create_assessment(&app, &sample_assessment_request("athlete-1")).await;

    assert!(!view["id"].as_str().unwrap().is_empty());
    assert_eq!(view["athleteId"], "athlete-1");
    assert_eq!(view["drillType"], "drop_jump");
    assert_eq!(view["riskRating"], 2);
    assert_eq!(view["cues"], json!(["Soft landing", "Knees over toes"]));
    assert_eq!(view["metrics"]["kneeValgusScore"], 2.5);
    assert_eq!(view["context"]["fatigue0to10"], 4);
    assert!(view.get("rawModelOutput").is_none());

    // Insights come from the raw model output
    assert_eq!(view["overview"]["headline"], "Knee caves on landing");
    let signals = view["riskSignals"].as_array().unwrap();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0]["label"], "Knee valgus");
    assert_eq!(signals[0]["severity"], "high");
    assert_eq!(signals[1]["severity"], "moderate");
    assert_eq!(view["phaseScores"]["firstContact"]["quality0to3"], 1.0);
    assert_eq!(view["phaseScores"]["firstContact"]["riskDriver"], "valgus");
    assert!(view["phaseScores"].get("takeoff").is_none());
    assert_eq!(view["viewQuality"]["retryRecommended"], true);
    assert_eq!(
        view["viewQuality"]["fixInstructions"],
        json!(["Move the camera back"])
    );
    assert_eq!(view["counterfactual"]["predictedRiskDrop"], 0.0);
    assert_eq!(view["counterfactual"]["nextRepVerify"], true);
    assert_eq!(view["overlays"].as_array().unwrap().len(), 1);
    assert_eq!(view["asymmetryIndex0to100"], 18.5);
    assert_eq!(view["deltaFromBaseline"], json!({"kneeValgusScore": 0.4}));
    assert_eq!(view["timeToStableMs"], 640.0);
    assert_eq!(view["groundContactTimeMs"], 215.0);
    assert_eq!(view["peakRiskPhase"], "first_contact");
    assert!(view.get("coachingPlan").is_none());
}

#[tokio::test]
async fn test_create_accepts_raw_output_as_string() {
    let (app, _resources) = create_test_router().await;

    let mut body = sample_assessment_request("athlete-1");
    body["rawModelOutput"] = json!("{\"peak_risk_phase\": \"takeoff\"}");

    let view = create_assessment(&app, &body).await;
    assert_eq!(view["peakRiskPhase"], "takeoff");
    assert!(view.get("overview").is_none());
}

#[tokio::test]
async fn test_create_with_unparseable_raw_output_still_succeeds() {
    let (app, _resources) = create_test_router().await;

    let mut body = sample_assessment_request("athlete-1");
    body["rawModelOutput"] = json!("model timed out");

    let view = create_assessment(&app, &body).await;
    assert_eq!(view["riskRating"], 2);
    assert!(view.get("riskSignals").is_none());
    assert!(view.get("overview").is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let (app, _resources) = create_test_router().await;

    let mut body = sample_assessment_request("  ");
    body["riskRating"] = json!(5);
    body["frames"] = json!([{"capturedAt": "2025-03-01T10:00:00Z", "label": ""}]);

    let error: Value = AxumTestRequest::post("/api/assessments")
        .json(&body)
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(error["error"]["code"], "INVALID_INPUT");
    let fields = field_names(&error);
    assert!(fields.contains(&"athleteId".to_owned()));
    assert!(fields.contains(&"riskRating".to_owned()));
    assert!(fields.contains(&"frames[0].label".to_owned()));
}

#[tokio::test]
async fn test_create_rejects_out_of_range_insights() {
    let (app, _resources) = create_test_router().await;

    let mut body = sample_assessment_request("athlete-1");
    body["insights"] = json!({
        "viewQuality": {"score0to1": 1.5, "fixInstructions": [], "retryRecommended": false},
        "asymmetryIndex0to100": 140.0
    });

    let error: Value = AxumTestRequest::post("/api/assessments")
        .json(&body)
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    let fields = field_names(&error);
    assert!(fields.contains(&"insights.viewQuality.score0to1".to_owned()));
    assert!(fields.contains(&"insights.asymmetryIndex0to100".to_owned()));
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let (app, _resources) = create_test_router().await;

    let error: Value = AxumTestRequest::post("/api/assessments")
        .raw_json("{not json")
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(error["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_create_rejects_unknown_drill_type() {
    let (app, _resources) = create_test_router().await;

    let mut body = sample_assessment_request("athlete-1");
    body["drillType"] = json!("backflip");

    AxumTestRequest::post("/api/assessments")
        .json(&body)
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_get_returns_frames_in_capture_order() {
    let (app, _resources) = create_test_router().await;
    let created = create_assessment(&app, &sample_assessment_request("athlete-1")).await;
    let id = created["id"].as_str().unwrap();

    let response: Value = AxumTestRequest::get(&format!("/api/assessments/{id}"))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let view = &response["assessment"];

    assert_eq!(view["id"], id);
    let frames = view["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["label"], "first contact");
    assert_eq!(frames[0]["riskFlag"], true);
    assert_eq!(frames[1]["label"], "stabilization");
    assert_eq!(frames[0]["assessmentId"], id);

    let recommendations = view["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["title"], "Drop landing drills");
    assert_eq!(recommendations[0]["priority"], "high");
}

#[tokio::test]
async fn test_get_keeps_untyped_metrics() {
    let (app, _resources) = create_test_router().await;
    let mut body = sample_assessment_request("athlete-1");
    body["metrics"] = json!({"kneeValgusScore": 1.0, "hipDrop": 0.3});
    let created = create_assessment(&app, &body).await;
    let id = created["id"].as_str().unwrap();

    let response: Value = AxumTestRequest::get(&format!("/api/assessments/{id}"))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(
        response["assessment"]["metrics"],
        json!({"kneeValgusScore": 1.0, "hipDrop": 0.3})
    );
}

#[tokio::test]
async fn test_get_unknown_assessment_is_not_found() {
    let (app, _resources) = create_test_router().await;

    let error: Value = AxumTestRequest::get("/api/assessments/does-not-exist")
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();

    assert_eq!(error["error"]["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(error["error"]["message"], "Assessment not found");
}

// ============================================================================
// Coach Overrides
// ============================================================================

#[tokio::test]
async fn test_update_insights_overrides_raw_output() {
    let (app, _resources) = create_test_router().await;
    let created = create_assessment(&app, &sample_assessment_request("athlete-1")).await;
    let id = created["id"].as_str().unwrap();

    let response: Value = AxumTestRequest::put(&format!("/api/assessments/{id}/insights"))
        .json(&json!({
            "peakRiskPhase": "stabilization",
            "riskSignals": [{"label": "Hip drop", "severity": "low", "evidence": "Frame 7"}]
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let view = &response["assessment"];

    assert_eq!(view["peakRiskPhase"], "stabilization");
    let signals = view["riskSignals"].as_array().unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0]["label"], "Hip drop");
    // Fields the coach did not touch still come from the model
    assert_eq!(view["overview"]["headline"], "Knee caves on landing");

    // Overrides are persisted
    let reread: Value = AxumTestRequest::get(&format!("/api/assessments/{id}"))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(reread["assessment"]["peakRiskPhase"], "stabilization");
}

#[tokio::test]
async fn test_update_insights_merges_successive_overrides() {
    let (app, _resources) = create_test_router().await;
    let created = create_assessment(&app, &sample_assessment_request("athlete-1")).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/assessments/{id}/insights");

    AxumTestRequest::put(&uri)
        .json(&json!({"peakRiskPhase": "prep"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK);

    let response: Value = AxumTestRequest::put(&uri)
        .json(&json!({"asymmetryIndex0to100": 42.0}))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(response["assessment"]["peakRiskPhase"], "prep");
    assert_eq!(response["assessment"]["asymmetryIndex0to100"], 42.0);
}

#[tokio::test]
async fn test_update_insights_unknown_assessment_is_not_found() {
    let (app, _resources) = create_test_router().await;

    AxumTestRequest::put("/api/assessments/missing/insights")
        .json(&json!({"peakRiskPhase": "prep"}))
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_insights_rejects_empty_counterfactual_tweak() {
    let (app, _resources) = create_test_router().await;
    let created = create_assessment(&app, &sample_assessment_request("athlete-1")).await;
    let id = created["id"].as_str().unwrap();

    let error: Value = AxumTestRequest::put(&format!("/api/assessments/{id}/insights"))
        .json(&json!({
            "counterfactual": {"tweak": " ", "predictedRiskDrop": 0.1, "nextRepVerify": false}
        }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(field_names(&error), vec!["counterfactual.tweak".to_owned()]);
}

// ============================================================================
// Athlete Lists and Snapshots
// ============================================================================

#[tokio::test]
async fn test_list_for_athlete_is_newest_first() {
    let (app, _resources) = create_test_router().await;

    let mut first = sample_assessment_request("athlete-1");
    first["riskRating"] = json!(1);
    create_assessment(&app, &first).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let mut second = sample_assessment_request("athlete-1");
    second["riskRating"] = json!(3);
    create_assessment(&app, &second).await;

    create_assessment(&app, &sample_assessment_request("athlete-2")).await;

    let response: Value = AxumTestRequest::get("/api/athletes/athlete-1/assessments")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let views = response["assessments"].as_array().unwrap();

    assert_eq!(views.len(), 2);
    assert_eq!(views[0]["riskRating"], 3);
    assert_eq!(views[1]["riskRating"], 1);
}

#[tokio::test]
async fn test_list_for_athlete_honours_limit() {
    let (app, _resources) = create_test_router().await;
    create_assessment(&app, &sample_assessment_request("athlete-1")).await;
    create_assessment(&app, &sample_assessment_request("athlete-1")).await;

    let response: Value = AxumTestRequest::get("/api/athletes/athlete-1/assessments?limit=1")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(response["assessments"].as_array().unwrap().len(), 1);

    AxumTestRequest::get("/api/athletes/athlete-1/assessments?limit=0")
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_for_unknown_athlete_is_empty() {
    let (app, _resources) = create_test_router().await;

    let response: Value = AxumTestRequest::get("/api/athletes/nobody/assessments")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(response["assessments"], json!([]));
}

#[tokio::test]
async fn test_risk_snapshot_summarises_recent_assessments() {
    let (app, _resources) = create_test_router().await;

    let mut first = sample_assessment_request("athlete-1");
    first["riskRating"] = json!(1);
    create_assessment(&app, &first).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let mut second = sample_assessment_request("athlete-1");
    second["riskRating"] = json!(3);
    create_assessment(&app, &second).await;

    let snapshot: Value = AxumTestRequest::get("/api/athletes/athlete-1/risk-snapshot")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(snapshot["athleteId"], "athlete-1");
    assert_eq!(snapshot["assessmentCount"], 2);
    assert_eq!(snapshot["latestRiskRating"], 3);
    assert_eq!(snapshot["peakRiskRating"], 3);
    assert_eq!(snapshot["meanRiskRating"], 2.0);
    assert_eq!(snapshot["trend"], "worsening");
    assert_eq!(snapshot["highRiskSignalCount"], 2);
}

#[tokio::test]
async fn test_risk_snapshot_without_assessments() {
    let (app, _resources) = create_test_router().await;

    let snapshot: Value = AxumTestRequest::get("/api/athletes/nobody/risk-snapshot")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(snapshot["assessmentCount"], 0);
    assert_eq!(snapshot["trend"], "insufficient_data");
    assert!(snapshot["latestRiskRating"].is_null());
}
