// ABOUTME: Cycle phase route handlers: stateless estimates, training plans, and shared labels
// ABOUTME: Signals are processed per request and never stored; only PhaseLabel is persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::json_body;
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use stridesafe_core::constants::cycle::MAX_CYCLE_DAYS;
use stridesafe_core::errors::{AppError, AppResult, FieldError};
use stridesafe_core::models::{CycleSignals, PhaseLabel};
use stridesafe_intelligence::infer_phase;
use tracing::{debug, info};

/// Cycle routes implementation
pub struct CycleRoutes;

impl CycleRoutes {
    /// Create all cycle routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/cycle/phase-estimate",
                post(Self::handle_phase_estimate),
            )
            .route("/api/cycle/plan", post(Self::handle_plan))
            .route(
                "/api/athletes/:athlete_id/phase-label",
                post(Self::handle_share_label).get(Self::handle_latest_label),
            )
            .with_state(resources)
    }

    /// Handle POST /api/cycle/phase-estimate
    ///
    /// Serves the on-device engine over HTTP so one server can act as
    /// another's remote estimator.
    async fn handle_phase_estimate(
        payload: Result<Json<CycleSignals>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let signals = Self::validated_signals(payload)?;
        let estimate = infer_phase(&signals);

        debug!(phase = %estimate.phase, "Served phase estimate");
        Ok((StatusCode::OK, Json(estimate)).into_response())
    }

    /// Handle POST /api/cycle/plan
    async fn handle_plan(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<CycleSignals>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let signals = Self::validated_signals(payload)?;
        let resolution = resources.phase_service.resolve(&signals).await;

        Ok((StatusCode::OK, Json(resolution)).into_response())
    }

    /// Handle POST /api/athletes/:athlete_id/phase-label
    async fn handle_share_label(
        State(resources): State<Arc<ServerResources>>,
        Path(athlete_id): Path<String>,
        payload: Result<Json<PhaseLabel>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let label = json_body(payload)?;
        let shared = resources
            .database
            .phase_labels()
            .store(&athlete_id, label)
            .await?;

        info!(
            athlete_id = %athlete_id,
            phase = %shared.phase,
            "Phase label shared"
        );
        Ok((StatusCode::CREATED, Json(shared)).into_response())
    }

    /// Handle GET /api/athletes/:athlete_id/phase-label
    async fn handle_latest_label(
        State(resources): State<Arc<ServerResources>>,
        Path(athlete_id): Path<String>,
    ) -> Result<Response, AppError> {
        let shared = resources
            .database
            .phase_labels()
            .latest(&athlete_id)
            .await?
            .ok_or_else(|| AppError::not_found("Phase label").with_resource_id(athlete_id))?;

        Ok((StatusCode::OK, Json(shared)).into_response())
    }

    fn validated_signals(
        payload: Result<Json<CycleSignals>, JsonRejection>,
    ) -> AppResult<CycleSignals> {
        let signals = json_body(payload)?;
        if signals.avg_cycle_days > MAX_CYCLE_DAYS {
            return Err(AppError::validation(vec![FieldError::new(
                "avgCycleDays",
                format!("must be between 0 and {MAX_CYCLE_DAYS}"),
            )]));
        }
        Ok(signals)
    }
}
