// ABOUTME: SQLite persistence for assessments and shared phase labels
// ABOUTME: Owns the connection pool, runs inline migrations, and hands out table managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS` on startup. Each table
//! group has a manager borrowing a clone of the pool:
//!
//! - [`AssessmentManager`]: assessments with their frames and recommendations
//! - [`PhaseLabelManager`]: the shareable cycle labels athletes opt to send

mod assessments;
mod phase_labels;

pub use assessments::AssessmentManager;
pub use phase_labels::{PhaseLabelManager, SharedPhaseLabel};

use crate::config::DatabaseUrl;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use stridesafe_core::errors::{AppError, AppResult};
use tracing::{debug, info};

/// Database manager for assessment and phase label storage
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or a migration fails
    pub async fn new(database_url: &DatabaseUrl) -> AppResult<Self> {
        let connection_string = database_url.to_connection_string();

        if let DatabaseUrl::SQLite { path } = database_url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::database(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every in-memory connection is its own database; keep exactly one alive
        let pool_options = if database_url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %connection_string, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Assessment table manager
    #[must_use]
    pub fn assessments(&self) -> AssessmentManager {
        AssessmentManager::new(self.pool.clone())
    }

    /// Shared phase label table manager
    #[must_use]
    pub fn phase_labels(&self) -> PhaseLabelManager {
        PhaseLabelManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_assessments().await?;
        self.migrate_phase_labels().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    async fn migrate_assessments(&self) -> AppResult<()> {
        self.execute_ddl(
            "assessments",
            r"
            CREATE TABLE IF NOT EXISTS assessments (
                id TEXT PRIMARY KEY,
                athlete_id TEXT NOT NULL,
                drill_type TEXT NOT NULL,
                risk_rating INTEGER NOT NULL CHECK (risk_rating BETWEEN 0 AND 3),
                cues TEXT NOT NULL DEFAULT '[]',
                metrics TEXT NOT NULL DEFAULT '{}',
                context TEXT,
                raw_model_output TEXT,
                overview TEXT,
                risk_signals TEXT,
                coaching_plan TEXT,
                phase_scores TEXT,
                view_quality TEXT,
                counterfactual TEXT,
                asymmetry_index REAL,
                delta_from_baseline TEXT,
                overlays TEXT,
                time_to_stable_ms REAL,
                ground_contact_time_ms REAL,
                peak_risk_phase TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "idx_assessments_athlete",
            "CREATE INDEX IF NOT EXISTS idx_assessments_athlete ON assessments(athlete_id, created_at)",
        )
        .await?;

        self.execute_ddl(
            "assessment_frames",
            r"
            CREATE TABLE IF NOT EXISTS assessment_frames (
                id TEXT PRIMARY KEY,
                assessment_id TEXT NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
                captured_at TEXT NOT NULL,
                label TEXT NOT NULL,
                note TEXT,
                risk_flag BOOLEAN NOT NULL DEFAULT false
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "assessment_recommendations",
            r"
            CREATE TABLE IF NOT EXISTS assessment_recommendations (
                id TEXT PRIMARY KEY,
                assessment_id TEXT NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                detail TEXT NOT NULL DEFAULT '',
                priority TEXT NOT NULL DEFAULT 'medium',
                created_at TEXT NOT NULL
            )
            ",
        )
        .await
    }

    async fn migrate_phase_labels(&self) -> AppResult<()> {
        self.execute_ddl(
            "phase_labels",
            r"
            CREATE TABLE IF NOT EXISTS phase_labels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                athlete_id TEXT NOT NULL,
                phase TEXT NOT NULL,
                confidence_bucket TEXT NOT NULL,
                shared_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "idx_phase_labels_athlete",
            "CREATE INDEX IF NOT EXISTS idx_phase_labels_athlete ON phase_labels(athlete_id, id)",
        )
        .await
    }

    async fn execute_ddl(&self, name: &str, sql: &str) -> AppResult<()> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create {name}: {e}")))?;
        Ok(())
    }
}

/// Fixed-width timestamp so text ordering matches time ordering
pub(crate) fn timestamp_to_db(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn timestamp_from_db(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime '{value}': {e}")))
}
