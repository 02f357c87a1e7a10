// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, server resources, routers, and sample request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `stridesafe_server`

use axum::Router;
use serde_json::{json, Value};
use std::env;
use std::sync::{Arc, Once};
use stridesafe_server::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    resources::ServerResources,
    routes,
    services::PhaseService,
};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        // Another test binary helper may already have installed one
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database with migrations applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory)
        .await
        .expect("in-memory database")
}

/// Server resources over a fresh in-memory database
pub async fn create_test_server_resources(phase_service: PhaseService) -> Arc<ServerResources> {
    let config = ServerConfig {
        database: DatabaseUrl::Memory,
        ..ServerConfig::default()
    };
    Arc::new(ServerResources::new(
        create_test_database().await,
        phase_service,
        Arc::new(config),
    ))
}

/// Full application router with a local-only phase service
pub async fn create_test_router() -> (Router, Arc<ServerResources>) {
    let resources = create_test_server_resources(PhaseService::local()).await;
    (routes::router(Arc::clone(&resources)), resources)
}

/// Raw model output covering snake_case, camelCase, and malformed entries
pub fn sample_raw_model_output() -> Value {
    json!({
        "overview": {"headline": "Knee caves on landing", "summary": "Valgus at first contact", "confidence": 0.82},
        "risk_signals": [
            {"label": "Knee valgus", "severity": "high", "evidence": "Frame 3"},
            {"label": "", "severity": "low"},
            {"label": "Trunk lean", "severity": "critical"}
        ],
        "phaseScores": {
            "prep": {"quality": 2},
            "first_contact": {"quality_0_3": 1, "risk_driver": "valgus"},
            "stabilization": {"quality0to3": 2, "time_to_stable_ms": 640}
        },
        "view_quality": {"score_0_1": 0.4, "fix_instructions": "Move the camera back"},
        "counterfactual": {"tweak": "Land with knees over toes", "predicted_risk_drop": "a lot", "next_rep_verify": 1},
        "overlays": [
            {"overlay_type": "knee_line", "description": "Knee track", "severity": "high"},
            {"description": "missing type"}
        ],
        "asymmetryIndex0to100": 18.5,
        "delta_from_baseline": {"kneeValgusScore": 0.4, "note": "n/a"},
        "ground_contact_time_ms": 215,
        "peakRiskPhase": "first_contact"
    })
}

/// Valid create-assessment body for `athlete_id`
pub fn sample_assessment_request(athlete_id: &str) -> Value {
    json!({
        "athleteId": athlete_id,
        "drillType": "drop_jump",
        "riskRating": 2,
        "cues": ["Soft landing", "Knees over toes"],
        "metrics": {"kneeValgusScore": 2.5, "trunkLeanOutsideBOS": false},
        "context": {"surface": "turf", "fatigue0to10": 4, "injuredSide": "left"},
        "rawModelOutput": sample_raw_model_output(),
        "frames": [
            {"capturedAt": "2025-03-01T10:00:02Z", "label": "stabilization"},
            {"capturedAt": "2025-03-01T10:00:00Z", "label": "first contact", "riskFlag": true}
        ],
        "recommendations": [
            {"title": "Drop landing drills", "detail": "3x8 from 30cm", "priority": "high"}
        ]
    })
}
