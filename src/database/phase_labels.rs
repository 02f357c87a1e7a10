// ABOUTME: Database operations for phase labels athletes choose to share with coaches
// ABOUTME: Only the phase and a coarse confidence bucket are ever written
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{timestamp_from_db, timestamp_to_db};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use stridesafe_core::errors::{AppError, AppResult};
use stridesafe_core::models::{ConfidenceBucket, CyclePhase, PhaseLabel};

/// A stored phase label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPhaseLabel {
    /// Athlete who shared the label
    pub athlete_id: String,
    /// Estimated phase
    pub phase: CyclePhase,
    /// Coarse confidence
    pub confidence_bucket: ConfidenceBucket,
    /// When the label was shared
    pub shared_at: DateTime<Utc>,
}

/// Phase label database operations manager
pub struct PhaseLabelManager {
    pool: SqlitePool,
}

impl PhaseLabelManager {
    /// Create a new phase label manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a shared label
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn store(&self, athlete_id: &str, label: PhaseLabel) -> AppResult<SharedPhaseLabel> {
        let shared = SharedPhaseLabel {
            athlete_id: athlete_id.to_owned(),
            phase: label.phase,
            confidence_bucket: label.confidence_bucket,
            // Stored at microsecond precision; match what `latest` will return
            shared_at: Utc::now().trunc_subsecs(6),
        };

        sqlx::query(
            r"
            INSERT INTO phase_labels (athlete_id, phase, confidence_bucket, shared_at)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(&shared.athlete_id)
        .bind(shared.phase.as_str())
        .bind(shared.confidence_bucket.as_str())
        .bind(timestamp_to_db(&shared.shared_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store phase label: {e}")))?;

        Ok(shared)
    }

    /// Most recently shared label for an athlete
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt
    pub async fn latest(&self, athlete_id: &str) -> AppResult<Option<SharedPhaseLabel>> {
        let row = sqlx::query(
            r"
            SELECT athlete_id, phase, confidence_bucket, shared_at
            FROM phase_labels
            WHERE athlete_id = ?
            ORDER BY id DESC
            LIMIT 1
            ",
        )
        .bind(athlete_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get phase label: {e}")))?;

        row.as_ref().map(row_to_shared_label).transpose()
    }
}

fn row_to_shared_label(row: &SqliteRow) -> AppResult<SharedPhaseLabel> {
    let phase_str: String = row.get("phase");
    let bucket_str: String = row.get("confidence_bucket");
    let shared_at_str: String = row.get("shared_at");

    Ok(SharedPhaseLabel {
        athlete_id: row.get("athlete_id"),
        phase: CyclePhase::parse(&phase_str)
            .ok_or_else(|| AppError::serialization(format!("Unknown phase '{phase_str}'")))?,
        confidence_bucket: ConfidenceBucket::parse(&bucket_str).ok_or_else(|| {
            AppError::serialization(format!("Unknown confidence bucket '{bucket_str}'"))
        })?,
        shared_at: timestamp_from_db(&shared_at_str)?,
    })
}
