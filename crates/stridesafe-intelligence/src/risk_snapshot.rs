// ABOUTME: Summarises an athlete's most recent normalized assessments into a risk snapshot
// ABOUTME: Latest, peak and mean rating, high-severity signal count, and trend direction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Reverse;
use stridesafe_core::constants::risk::{SNAPSHOT_WINDOW, TREND_LOOKBACK, TREND_THRESHOLD};
use stridesafe_core::models::{NormalizedAssessmentView, RiskSnapshot, RiskTrend, Severity};

/// Build a snapshot from an athlete's assessments (any order)
#[must_use]
pub fn build_risk_snapshot(athlete_id: &str, views: &[NormalizedAssessmentView]) -> RiskSnapshot {
    let mut recent: Vec<&NormalizedAssessmentView> = views.iter().collect();
    recent.sort_by_key(|view| Reverse(view.created_at));
    recent.truncate(SNAPSHOT_WINDOW);

    let ratings: Vec<f64> = recent.iter().map(|v| f64::from(v.risk_rating)).collect();
    let high_risk_signal_count = recent
        .iter()
        .filter_map(|view| view.insights.risk_signals.as_ref())
        .flatten()
        .filter(|signal| signal.severity == Severity::High)
        .count();

    RiskSnapshot {
        athlete_id: athlete_id.to_owned(),
        assessment_count: recent.len(),
        latest_risk_rating: recent.first().map(|v| v.risk_rating),
        peak_risk_rating: recent.iter().map(|v| v.risk_rating).max(),
        mean_risk_rating: mean(&ratings),
        trend: risk_trend(&ratings),
        latest_assessment_at: recent.first().map(|v| v.created_at),
        high_risk_signal_count,
    }
}

/// Trend of ratings ordered newest first
fn risk_trend(ratings: &[f64]) -> RiskTrend {
    let Some((latest, earlier)) = ratings.split_first() else {
        return RiskTrend::InsufficientData;
    };
    let lookback = &earlier[..earlier.len().min(TREND_LOOKBACK)];
    let Some(baseline) = mean(lookback) else {
        return RiskTrend::InsufficientData;
    };

    let difference = latest - baseline;
    if difference >= TREND_THRESHOLD {
        RiskTrend::Worsening
    } else if difference <= -TREND_THRESHOLD {
        RiskTrend::Improving
    } else {
        RiskTrend::Stable
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}
