// ABOUTME: Rehab route handlers for limb symmetry scoring
// ABOUTME: Validates a single-leg test result pair and returns the scored LSI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::json_body;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use stridesafe_core::constants::rehab::MAX_PAIN_SCORE;
use stridesafe_core::errors::{AppError, FieldError};
use stridesafe_core::models::RehabAssessmentInput;
use stridesafe_intelligence::score_limb_symmetry;

/// Rehab routes implementation
pub struct RehabRoutes;

impl RehabRoutes {
    /// Create all rehab routes
    pub fn routes() -> Router {
        Router::new().route(
            "/api/rehab/limb-symmetry",
            post(Self::handle_limb_symmetry),
        )
    }

    /// Handle POST /api/rehab/limb-symmetry
    async fn handle_limb_symmetry(
        payload: Result<Json<RehabAssessmentInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let input = json_body(payload)?;

        let errors = validate(&input);
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        Ok((StatusCode::OK, Json(score_limb_symmetry(&input))).into_response())
    }
}

fn validate(input: &RehabAssessmentInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if input.test_name.trim().is_empty() {
        errors.push(FieldError::new("testName", "must not be empty"));
    }
    if input.injured_limb_value < 0.0 {
        errors.push(FieldError::new("injuredLimbValue", "must not be negative"));
    }
    if input.healthy_limb_value < 0.0 {
        errors.push(FieldError::new("healthyLimbValue", "must not be negative"));
    }
    if input.pain_0_to_10.is_some_and(|pain| pain > MAX_PAIN_SCORE) {
        errors.push(FieldError::new(
            "pain0to10",
            format!("must be between 0 and {MAX_PAIN_SCORE}"),
        ));
    }

    errors
}
