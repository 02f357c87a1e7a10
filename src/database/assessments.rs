// ABOUTME: Database operations for movement assessments, their frames, and recommendations
// ABOUTME: Insight columns are stored as JSON text and decoded strictly on read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{timestamp_from_db, timestamp_to_db};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use stridesafe_core::errors::{AppError, AppResult};
use stridesafe_core::models::{
    AssessmentInsights, AssessmentRecord, DrillType, Frame, Recommendation,
    RecommendationPriority,
};
use tracing::debug;

const ASSESSMENT_COLUMNS: &str = r"
    id, athlete_id, drill_type, risk_rating, cues, metrics, context, raw_model_output,
    overview, risk_signals, coaching_plan, phase_scores, view_quality, counterfactual,
    asymmetry_index, delta_from_baseline, overlays, time_to_stable_ms,
    ground_contact_time_ms, peak_risk_phase, created_at, updated_at
";

/// Assessment database operations manager
pub struct AssessmentManager {
    pool: SqlitePool,
}

impl AssessmentManager {
    /// Create a new assessment manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an assessment with its frames and recommendations
    ///
    /// # Errors
    ///
    /// Returns an error if an insight column cannot be serialized or the write fails
    pub async fn insert(&self, record: &AssessmentRecord) -> AppResult<()> {
        let columns = InsightColumns::encode(&record.insights)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO assessments (
                id, athlete_id, drill_type, risk_rating, cues, metrics, context, raw_model_output,
                overview, risk_signals, coaching_plan, phase_scores, view_quality, counterfactual,
                asymmetry_index, delta_from_baseline, overlays, time_to_stable_ms,
                ground_contact_time_ms, peak_risk_phase, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.id)
        .bind(&record.athlete_id)
        .bind(record.drill_type.as_str())
        .bind(i64::from(record.risk_rating))
        .bind(&record.cues)
        .bind(&record.metrics)
        .bind(&record.context)
        .bind(&record.raw_model_output)
        .bind(&columns.overview)
        .bind(&columns.risk_signals)
        .bind(&columns.coaching_plan)
        .bind(&columns.phase_scores)
        .bind(&columns.view_quality)
        .bind(&columns.counterfactual)
        .bind(columns.asymmetry_index)
        .bind(&columns.delta_from_baseline)
        .bind(&columns.overlays)
        .bind(columns.time_to_stable_ms)
        .bind(columns.ground_contact_time_ms)
        .bind(&columns.peak_risk_phase)
        .bind(timestamp_to_db(&record.created_at))
        .bind(timestamp_to_db(&record.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert assessment: {e}")))?;

        for frame in &record.frames {
            sqlx::query(
                r"
                INSERT INTO assessment_frames (id, assessment_id, captured_at, label, note, risk_flag)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(&frame.id)
            .bind(&record.id)
            .bind(timestamp_to_db(&frame.captured_at))
            .bind(&frame.label)
            .bind(&frame.note)
            .bind(frame.risk_flag)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert frame: {e}")))?;
        }

        for recommendation in &record.recommendations {
            sqlx::query(
                r"
                INSERT INTO assessment_recommendations (id, assessment_id, title, detail, priority, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(&recommendation.id)
            .bind(&record.id)
            .bind(&recommendation.title)
            .bind(&recommendation.detail)
            .bind(recommendation.priority.as_str())
            .bind(timestamp_to_db(&recommendation.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert recommendation: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit assessment: {e}")))?;

        debug!(
            assessment_id = %record.id,
            athlete_id = %record.athlete_id,
            frames = record.frames.len(),
            "Stored assessment"
        );
        Ok(())
    }

    /// Get an assessment by ID, with frames ordered by capture time
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored column is corrupt
    pub async fn get(&self, assessment_id: &str) -> AppResult<Option<AssessmentRecord>> {
        let query = format!("SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(assessment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get assessment: {e}")))?;

        match row {
            Some(row) => {
                let mut record = row_to_assessment(&row)?;
                self.load_children(&mut record).await?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// List an athlete's assessments, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored column is corrupt
    pub async fn list_for_athlete(
        &self,
        athlete_id: &str,
        limit: u32,
    ) -> AppResult<Vec<AssessmentRecord>> {
        let query = format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE athlete_id = ? \
             ORDER BY created_at DESC, id ASC LIMIT ?"
        );
        let rows = sqlx::query(&query)
            .bind(athlete_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list assessments: {e}")))?;

        let mut records = rows
            .iter()
            .map(row_to_assessment)
            .collect::<AppResult<Vec<_>>>()?;
        for record in &mut records {
            self.load_children(record).await?;
        }
        Ok(records)
    }

    /// Overwrite the insight columns present in `insights`, leaving the rest untouched
    ///
    /// Returns `false` when no assessment has the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if an insight cannot be serialized or the update fails
    pub async fn update_insights(
        &self,
        assessment_id: &str,
        insights: &AssessmentInsights,
    ) -> AppResult<bool> {
        let columns = InsightColumns::encode(insights)?;

        let result = sqlx::query(
            r"
            UPDATE assessments SET
                overview = COALESCE(?, overview),
                risk_signals = COALESCE(?, risk_signals),
                coaching_plan = COALESCE(?, coaching_plan),
                phase_scores = COALESCE(?, phase_scores),
                view_quality = COALESCE(?, view_quality),
                counterfactual = COALESCE(?, counterfactual),
                asymmetry_index = COALESCE(?, asymmetry_index),
                delta_from_baseline = COALESCE(?, delta_from_baseline),
                overlays = COALESCE(?, overlays),
                time_to_stable_ms = COALESCE(?, time_to_stable_ms),
                ground_contact_time_ms = COALESCE(?, ground_contact_time_ms),
                peak_risk_phase = COALESCE(?, peak_risk_phase),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&columns.overview)
        .bind(&columns.risk_signals)
        .bind(&columns.coaching_plan)
        .bind(&columns.phase_scores)
        .bind(&columns.view_quality)
        .bind(&columns.counterfactual)
        .bind(columns.asymmetry_index)
        .bind(&columns.delta_from_baseline)
        .bind(&columns.overlays)
        .bind(columns.time_to_stable_ms)
        .bind(columns.ground_contact_time_ms)
        .bind(&columns.peak_risk_phase)
        .bind(timestamp_to_db(&Utc::now()))
        .bind(assessment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update insights: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn load_children(&self, record: &mut AssessmentRecord) -> AppResult<()> {
        let frame_rows = sqlx::query(
            r"
            SELECT id, assessment_id, captured_at, label, note, risk_flag
            FROM assessment_frames
            WHERE assessment_id = ?
            ORDER BY captured_at ASC, id ASC
            ",
        )
        .bind(&record.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load frames: {e}")))?;

        let recommendation_rows = sqlx::query(
            r"
            SELECT id, assessment_id, title, detail, priority, created_at
            FROM assessment_recommendations
            WHERE assessment_id = ?
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(&record.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recommendations: {e}")))?;

        record.frames = frame_rows
            .iter()
            .map(row_to_frame)
            .collect::<AppResult<_>>()?;
        record.recommendations = recommendation_rows
            .iter()
            .map(row_to_recommendation)
            .collect::<AppResult<_>>()?;
        Ok(())
    }
}

/// Insight fields in their column representation
struct InsightColumns {
    overview: Option<String>,
    risk_signals: Option<String>,
    coaching_plan: Option<String>,
    phase_scores: Option<String>,
    view_quality: Option<String>,
    counterfactual: Option<String>,
    asymmetry_index: Option<f64>,
    delta_from_baseline: Option<String>,
    overlays: Option<String>,
    time_to_stable_ms: Option<f64>,
    ground_contact_time_ms: Option<f64>,
    peak_risk_phase: Option<String>,
}

impl InsightColumns {
    fn encode(insights: &AssessmentInsights) -> AppResult<Self> {
        Ok(Self {
            overview: to_json_column(insights.overview.as_ref())?,
            risk_signals: to_json_column(insights.risk_signals.as_ref())?,
            coaching_plan: to_json_column(insights.coaching_plan.as_ref())?,
            phase_scores: to_json_column(insights.phase_scores.as_ref())?,
            view_quality: to_json_column(insights.view_quality.as_ref())?,
            counterfactual: to_json_column(insights.counterfactual.as_ref())?,
            asymmetry_index: insights.asymmetry_index_0_to_100,
            delta_from_baseline: to_json_column(insights.delta_from_baseline.as_ref())?,
            overlays: to_json_column(insights.overlays.as_ref())?,
            time_to_stable_ms: insights.time_to_stable_ms,
            ground_contact_time_ms: insights.ground_contact_time_ms,
            peak_risk_phase: insights.peak_risk_phase.clone(),
        })
    }
}

fn to_json_column<T: Serialize>(value: Option<&T>) -> AppResult<Option<String>> {
    value
        .map(serde_json::to_string)
        .transpose()
        .map_err(AppError::from)
}

fn from_json_column<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
    assessment_id: &str,
) -> AppResult<Option<T>> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| {
            AppError::serialization(format!("Corrupt {column} column: {e}"))
                .with_resource_id(assessment_id)
        })
}

/// Convert a database row to an `AssessmentRecord` without frames or recommendations
fn row_to_assessment(row: &SqliteRow) -> AppResult<AssessmentRecord> {
    let id: String = row.get("id");
    let drill_type_str: String = row.get("drill_type");
    let risk_rating: i64 = row.get("risk_rating");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let drill_type = DrillType::parse(&drill_type_str).ok_or_else(|| {
        AppError::serialization(format!("Unknown drill type '{drill_type_str}'"))
            .with_resource_id(id.clone())
    })?;
    let risk_rating = u8::try_from(risk_rating).map_err(|_| {
        AppError::serialization(format!("Risk rating {risk_rating} out of range"))
            .with_resource_id(id.clone())
    })?;

    let insights = AssessmentInsights {
        overview: from_json_column(row, "overview", &id)?,
        risk_signals: from_json_column(row, "risk_signals", &id)?,
        coaching_plan: from_json_column(row, "coaching_plan", &id)?,
        phase_scores: from_json_column(row, "phase_scores", &id)?,
        view_quality: from_json_column(row, "view_quality", &id)?,
        counterfactual: from_json_column(row, "counterfactual", &id)?,
        asymmetry_index_0_to_100: row.get("asymmetry_index"),
        delta_from_baseline: from_json_column(row, "delta_from_baseline", &id)?,
        overlays: from_json_column(row, "overlays", &id)?,
        time_to_stable_ms: row.get("time_to_stable_ms"),
        ground_contact_time_ms: row.get("ground_contact_time_ms"),
        peak_risk_phase: row.get("peak_risk_phase"),
    };

    Ok(AssessmentRecord {
        athlete_id: row.get("athlete_id"),
        drill_type,
        risk_rating,
        cues: row.get("cues"),
        metrics: row.get("metrics"),
        context: row.get("context"),
        raw_model_output: row.get("raw_model_output"),
        insights,
        created_at: timestamp_from_db(&created_at_str)?,
        updated_at: timestamp_from_db(&updated_at_str)?,
        frames: Vec::new(),
        recommendations: Vec::new(),
        id,
    })
}

fn row_to_frame(row: &SqliteRow) -> AppResult<Frame> {
    let captured_at_str: String = row.get("captured_at");
    Ok(Frame {
        id: row.get("id"),
        assessment_id: row.get("assessment_id"),
        captured_at: timestamp_from_db(&captured_at_str)?,
        label: row.get("label"),
        note: row.get("note"),
        risk_flag: row.get("risk_flag"),
    })
}

fn row_to_recommendation(row: &SqliteRow) -> AppResult<Recommendation> {
    let priority_str: String = row.get("priority");
    let created_at_str: String = row.get("created_at");
    Ok(Recommendation {
        id: row.get("id"),
        assessment_id: row.get("assessment_id"),
        title: row.get("title"),
        detail: row.get("detail"),
        priority: RecommendationPriority::parse(&priority_str),
        created_at: timestamp_from_db(&created_at_str)?,
    })
}
