// ABOUTME: Per-athlete risk snapshot summarising recent assessments
// ABOUTME: RiskSnapshot and the RiskTrend direction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of an athlete's risk ratings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrend {
    /// Latest rating is lower than recent ones
    Improving,
    /// Latest rating is higher than recent ones
    Worsening,
    /// No meaningful change
    Stable,
    /// Fewer than two assessments
    InsufficientData,
}

/// Summary of an athlete's most recent assessments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSnapshot {
    /// Athlete
    pub athlete_id: String,
    /// Number of assessments summarised
    pub assessment_count: usize,
    /// Rating of the newest assessment
    pub latest_risk_rating: Option<u8>,
    /// Highest rating in the window
    pub peak_risk_rating: Option<u8>,
    /// Mean rating in the window
    pub mean_risk_rating: Option<f64>,
    /// Trend direction
    pub trend: RiskTrend,
    /// Creation time of the newest assessment
    pub latest_assessment_at: Option<DateTime<Utc>>,
    /// High-severity risk signals across the window
    pub high_risk_signal_count: usize,
}
