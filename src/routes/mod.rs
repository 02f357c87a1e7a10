// ABOUTME: Route module organization for the StrideSafe HTTP API
// ABOUTME: Merges the per-domain routers and applies tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the StrideSafe server
//!
//! Each domain module contains route definitions and thin handlers that
//! validate input and delegate to the database, the engines, or a service.

/// Assessment storage, normalized reads, and risk snapshots
pub mod assessments;
/// Cycle phase estimates, training plans, and shared labels
pub mod cycle;
/// Health check and readiness routes
pub mod health;
/// Rehab scoring routes
pub mod rehab;

pub use assessments::{AssessmentRoutes, CreateAssessmentRequest};
pub use cycle::CycleRoutes;
pub use health::HealthRoutes;
pub use rehab::RehabRoutes;

use crate::middleware::{request_trace_layer, setup_cors};
use crate::resources::ServerResources;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router};
use std::sync::Arc;
use stridesafe_core::errors::{AppError, AppResult};

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AssessmentRoutes::routes(Arc::clone(&resources)))
        .merge(CycleRoutes::routes(Arc::clone(&resources)))
        .merge(RehabRoutes::routes())
        .layer(request_trace_layer())
        .layer(cors)
}

/// Unwrap a JSON body, turning any rejection into a 400 `INVALID_INPUT`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}
