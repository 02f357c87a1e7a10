// ABOUTME: Assessment route handlers: create, read normalized views, coach overrides, risk snapshot
// ABOUTME: Every response is produced by the normalizer; raw records never leave the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Assessment routes
//!
//! Responses wrap the normalized view as `{"assessment": {...}}` (or
//! `{"assessments": [...]}` for lists). Request validation happens before
//! anything is written.

use super::json_body;
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stridesafe_core::constants::assessment::MAX_RISK_RATING;
use stridesafe_core::constants::risk::SNAPSHOT_WINDOW;
use stridesafe_core::errors::{AppError, AppResult, FieldError};
use stridesafe_core::models::{
    AssessmentInsights, AssessmentMetrics, AssessmentRecord, DrillType, Frame, MovementContext,
    NormalizedAssessmentView, Recommendation, RecommendationPriority,
};
use stridesafe_intelligence::{build_risk_snapshot, normalize_record};
use tracing::info;
use uuid::Uuid;

/// Default page size for athlete assessment lists
const DEFAULT_LIST_LIMIT: u32 = 50;
/// Largest page size a client may request
const MAX_LIST_LIMIT: u32 = 200;
/// Upper bound of the self-reported fatigue scale
const MAX_FATIGUE: u8 = 10;

/// Frame supplied when creating an assessment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFrame {
    /// Capture time
    pub captured_at: DateTime<Utc>,
    /// Short label
    pub label: String,
    /// Optional annotation
    #[serde(default)]
    pub note: Option<String>,
    /// Frame shows a risky position
    #[serde(default)]
    pub risk_flag: bool,
}

/// Recommendation supplied when creating an assessment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    /// Headline
    pub title: String,
    /// Body text
    #[serde(default)]
    pub detail: String,
    /// Priority, `medium` when omitted
    #[serde(default)]
    pub priority: RecommendationPriority,
}

/// Body of `POST /api/assessments`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    /// Athlete the clip belongs to
    pub athlete_id: String,
    /// Drill performed
    pub drill_type: DrillType,
    /// Ordinal risk rating 0-3
    pub risk_rating: u8,
    /// Coaching cues
    #[serde(default)]
    pub cues: Vec<String>,
    /// Scalar metrics
    #[serde(default)]
    pub metrics: AssessmentMetrics,
    /// Capture context
    #[serde(default)]
    pub context: Option<MovementContext>,
    /// Model response: a JSON string is stored verbatim, any other value is serialized
    #[serde(default)]
    pub raw_model_output: Option<Value>,
    /// Insight columns to persist up front
    #[serde(default)]
    pub insights: AssessmentInsights,
    /// Captured frames
    #[serde(default)]
    pub frames: Vec<NewFrame>,
    /// Coaching recommendations
    #[serde(default)]
    pub recommendations: Vec<NewRecommendation>,
}

impl CreateAssessmentRequest {
    /// Collect every field-level problem in the request
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.athlete_id.trim().is_empty() {
            errors.push(FieldError::new("athleteId", "must not be empty"));
        }
        if self.risk_rating > MAX_RISK_RATING {
            errors.push(FieldError::new(
                "riskRating",
                format!("must be between 0 and {MAX_RISK_RATING}"),
            ));
        }
        if self.cues.iter().any(|cue| cue.trim().is_empty()) {
            errors.push(FieldError::new("cues", "must not contain empty cues"));
        }
        if let Some(context) = &self.context {
            if context.fatigue_0_to_10.is_some_and(|f| f > MAX_FATIGUE) {
                errors.push(FieldError::new(
                    "context.fatigue0to10",
                    format!("must be between 0 and {MAX_FATIGUE}"),
                ));
            }
        }
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.label.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("frames[{i}].label"),
                    "must not be empty",
                ));
            }
        }
        for (i, recommendation) in self.recommendations.iter().enumerate() {
            if recommendation.title.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("recommendations[{i}].title"),
                    "must not be empty",
                ));
            }
        }
        errors.extend(validate_insights("insights.", &self.insights));

        errors
    }

    /// Build the record to persist
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized
    pub fn into_record(self, now: DateTime<Utc>) -> AppResult<AssessmentRecord> {
        let id = Uuid::new_v4().to_string();

        let context = self
            .context
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let raw_model_output = self.raw_model_output.map(|raw| match raw {
            Value::String(text) => text,
            other => other.to_string(),
        });

        let frames = self
            .frames
            .into_iter()
            .map(|frame| Frame {
                id: Uuid::new_v4().to_string(),
                assessment_id: id.clone(),
                captured_at: frame.captured_at,
                label: frame.label,
                note: frame.note,
                risk_flag: frame.risk_flag,
            })
            .collect();
        let recommendations = self
            .recommendations
            .into_iter()
            .map(|recommendation| Recommendation {
                id: Uuid::new_v4().to_string(),
                assessment_id: id.clone(),
                title: recommendation.title,
                detail: recommendation.detail,
                priority: recommendation.priority,
                created_at: now,
            })
            .collect();

        Ok(AssessmentRecord {
            athlete_id: self.athlete_id.trim().to_owned(),
            drill_type: self.drill_type,
            risk_rating: self.risk_rating,
            cues: serde_json::to_string(&self.cues)?,
            metrics: serde_json::to_string(&self.metrics)?,
            context,
            raw_model_output,
            insights: self.insights,
            created_at: now,
            updated_at: now,
            frames,
            recommendations,
            id,
        })
    }
}

/// Range checks on coach-supplied insight values
fn validate_insights(prefix: &str, insights: &AssessmentInsights) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(view_quality) = &insights.view_quality {
        if !(0.0..=1.0).contains(&view_quality.score_0_to_1) {
            errors.push(FieldError::new(
                format!("{prefix}viewQuality.score0to1"),
                "must be between 0 and 1",
            ));
        }
    }
    if let Some(asymmetry) = insights.asymmetry_index_0_to_100 {
        if !(0.0..=100.0).contains(&asymmetry) {
            errors.push(FieldError::new(
                format!("{prefix}asymmetryIndex0to100"),
                "must be between 0 and 100",
            ));
        }
    }
    if let Some(signals) = &insights.risk_signals {
        for (i, signal) in signals.iter().enumerate() {
            if signal.label.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("{prefix}riskSignals[{i}].label"),
                    "must not be empty",
                ));
            }
        }
    }
    if let Some(counterfactual) = &insights.counterfactual {
        if counterfactual.tweak.trim().is_empty() {
            errors.push(FieldError::new(
                format!("{prefix}counterfactual.tweak"),
                "must not be empty",
            ));
        }
    }

    errors
}

/// Query parameters for athlete assessment lists
#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<u32>,
}

/// Assessment routes implementation
pub struct AssessmentRoutes;

impl AssessmentRoutes {
    /// Create all assessment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/assessments", post(Self::handle_create))
            .route("/api/assessments/:id", get(Self::handle_get))
            .route(
                "/api/assessments/:id/insights",
                put(Self::handle_update_insights),
            )
            .route(
                "/api/athletes/:athlete_id/assessments",
                get(Self::handle_list_for_athlete),
            )
            .route(
                "/api/athletes/:athlete_id/risk-snapshot",
                get(Self::handle_risk_snapshot),
            )
            .with_state(resources)
    }

    /// Handle POST /api/assessments
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<CreateAssessmentRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;

        let errors = request.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let record = request.into_record(Utc::now())?;
        let assessments = resources.database.assessments();
        assessments.insert(&record).await?;

        info!(
            assessment_id = %record.id,
            athlete_id = %record.athlete_id,
            drill_type = %record.drill_type,
            "Assessment created"
        );

        let stored = assessments
            .get(&record.id)
            .await?
            .ok_or_else(|| AppError::internal("Assessment missing after insert"))?;
        let view = normalize_record(&stored)?;

        Ok((StatusCode::CREATED, Json(json!({ "assessment": view }))).into_response())
    }

    /// Handle GET /api/assessments/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let record = resources
            .database
            .assessments()
            .get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment").with_resource_id(id.clone()))?;
        let view = normalize_record(&record)?;

        Ok((StatusCode::OK, Json(json!({ "assessment": view }))).into_response())
    }

    /// Handle PUT /api/assessments/:id/insights
    async fn handle_update_insights(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        payload: Result<Json<AssessmentInsights>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let insights = json_body(payload)?;

        let errors = validate_insights("", &insights);
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let assessments = resources.database.assessments();
        if !assessments.update_insights(&id, &insights).await? {
            return Err(AppError::not_found("Assessment").with_resource_id(id));
        }

        info!(assessment_id = %id, "Assessment insights overridden");

        let record = assessments
            .get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment").with_resource_id(id.clone()))?;
        let view = normalize_record(&record)?;

        Ok((StatusCode::OK, Json(json!({ "assessment": view }))).into_response())
    }

    /// Handle GET /api/athletes/:athlete_id/assessments
    async fn handle_list_for_athlete(
        State(resources): State<Arc<ServerResources>>,
        Path(athlete_id): Path<String>,
        Query(query): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(AppError::validation(vec![FieldError::new(
                "limit",
                format!("must be between 1 and {MAX_LIST_LIMIT}"),
            )]));
        }

        let views = Self::load_views(&resources, &athlete_id, limit).await?;

        Ok((StatusCode::OK, Json(json!({ "assessments": views }))).into_response())
    }

    /// Handle GET /api/athletes/:athlete_id/risk-snapshot
    async fn handle_risk_snapshot(
        State(resources): State<Arc<ServerResources>>,
        Path(athlete_id): Path<String>,
    ) -> Result<Response, AppError> {
        let views = Self::load_views(&resources, &athlete_id, SNAPSHOT_WINDOW as u32).await?;
        let snapshot = build_risk_snapshot(&athlete_id, &views);

        Ok((StatusCode::OK, Json(snapshot)).into_response())
    }

    async fn load_views(
        resources: &ServerResources,
        athlete_id: &str,
        limit: u32,
    ) -> AppResult<Vec<NormalizedAssessmentView>> {
        resources
            .database
            .assessments()
            .list_for_athlete(athlete_id, limit)
            .await?
            .iter()
            .map(normalize_record)
            .collect()
    }
}
