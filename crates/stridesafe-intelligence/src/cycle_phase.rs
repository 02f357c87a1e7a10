// ABOUTME: Deterministic menstrual cycle phase inference and the training policy it implies
// ABOUTME: Pure functions over CycleSignals; no storage, no clock except in infer_phase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cycle Phase & Policy Engine
//!
//! Works fully offline. Callers load signals from whatever repository they use
//! and hand them in; only [`share_label`] output is ever meant to leave the
//! device.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stridesafe_core::constants::cycle::{
    COMBINED_OCP_CONFIDENCE_FACTOR, DEFAULT_CYCLE_DAYS, FOLLICULAR_END_FRACTION,
    HEAVY_FLOW_CONFIDENCE_FLOOR, LOGGED_CONFIDENCE, MAX_CONFIDENCE, MENSTRUAL_LAST_DAY,
    MIN_CONFIDENCE, OVULATORY_END_FRACTION, UNLOGGED_CONFIDENCE,
};
use stridesafe_core::constants::policy::{
    BASELINE_CUT_DENSITY_DELTA, BASELINE_WARMUP_EXTRA_MIN, COMBINED_OCP_DELTA_FACTOR,
    COMBINED_OCP_MIN_WARMUP, COMBINED_OCP_WARMUP_REDUCTION, HIGH_BUCKET_MIN,
    LOW_CONFIDENCE_DELTA_FACTOR, LOW_CONFIDENCE_THRESHOLD, MED_BUCKET_MIN,
    OVULATORY_CUT_DENSITY_DELTA, SYMPTOMATIC_CUT_DENSITY_DELTA, SYMPTOMATIC_WARMUP_EXTRA_MIN,
};
use stridesafe_core::models::{
    ConfidenceBucket, Contraception, CueVigilance, CyclePhase, CycleSignals, PhaseEstimate,
    PhaseLabel, PhasePolicy, Symptom,
};

/// Estimate the current phase using the system clock
#[must_use]
pub fn infer_phase(signals: &CycleSignals) -> PhaseEstimate {
    infer_phase_at(signals, Utc::now())
}

/// Estimate the phase as of `now`
#[must_use]
pub fn infer_phase_at(signals: &CycleSignals, now: DateTime<Utc>) -> PhaseEstimate {
    let cycle_length = effective_cycle_length(signals.avg_cycle_days);

    let (phase, base_confidence, recency) = match parse_period_start(&signals.last_period_iso) {
        Some(start) => {
            let days_since = (now - start).num_days().max(0);
            let normalized = days_since % i64::from(cycle_length);
            (
                phase_for_cycle_day(normalized, cycle_length),
                LOGGED_CONFIDENCE,
                format!("Logged {days_since}d ago"),
            )
        }
        None => (
            CyclePhase::Unsure,
            UNLOGGED_CONFIDENCE,
            "No recent period log".to_owned(),
        ),
    };

    let mut confidence = base_confidence;
    if signals.contraception == Contraception::CombinedOcp {
        confidence *= COMBINED_OCP_CONFIDENCE_FACTOR;
    }
    if signals.symptoms.contains(&Symptom::HeavyFlow) {
        confidence = confidence.max(HEAVY_FLOW_CONFIDENCE_FLOOR);
    }

    PhaseEstimate {
        phase,
        confidence_0_to_1: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        reasons: vec![recency, format!("Cycle length {cycle_length}d")],
    }
}

/// Training adjustments for an estimate
///
/// Rules compose in a fixed order: phase or symptom override, then the
/// low-confidence softening, then the combined-pill adjustment.
#[must_use]
pub fn derive_phase_policy(estimate: &PhaseEstimate, signals: &CycleSignals) -> PhasePolicy {
    let mut policy = PhasePolicy {
        warmup_extra_min: BASELINE_WARMUP_EXTRA_MIN,
        cut_density_delta: BASELINE_CUT_DENSITY_DELTA,
        landing_focus: true,
        cue_vigilance: CueVigilance::Normal,
    };

    if estimate.phase == CyclePhase::Menstrual || signals.has_symptoms() {
        policy.warmup_extra_min = SYMPTOMATIC_WARMUP_EXTRA_MIN;
        policy.cut_density_delta = SYMPTOMATIC_CUT_DENSITY_DELTA;
        policy.cue_vigilance = CueVigilance::High;
    } else if estimate.phase == CyclePhase::Ovulatory {
        policy.cut_density_delta = OVULATORY_CUT_DENSITY_DELTA;
        policy.cue_vigilance = CueVigilance::High;
    }

    if estimate.confidence_0_to_1 < LOW_CONFIDENCE_THRESHOLD {
        policy.cut_density_delta *= LOW_CONFIDENCE_DELTA_FACTOR;
    }

    if signals.contraception == Contraception::CombinedOcp {
        policy.cut_density_delta *= COMBINED_OCP_DELTA_FACTOR;
        policy.warmup_extra_min = policy
            .warmup_extra_min
            .saturating_sub(COMBINED_OCP_WARMUP_REDUCTION)
            .max(COMBINED_OCP_MIN_WARMUP);
    }

    policy
}

/// Coarse bucket for a continuous confidence
#[must_use]
pub fn confidence_bucket(value: f64) -> ConfidenceBucket {
    if value >= HIGH_BUCKET_MIN {
        ConfidenceBucket::High
    } else if value >= MED_BUCKET_MIN {
        ConfidenceBucket::Med
    } else {
        ConfidenceBucket::Low
    }
}

/// Reduce an estimate to the two fields that may be shared
#[must_use]
pub fn share_label(estimate: &PhaseEstimate) -> PhaseLabel {
    PhaseLabel {
        phase: estimate.phase,
        confidence_bucket: confidence_bucket(estimate.confidence_0_to_1),
    }
}

/// Parse a logged period start: `YYYY-MM-DD` (midnight UTC) or RFC 3339
#[must_use]
pub fn parse_period_start(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

const fn effective_cycle_length(avg_cycle_days: u32) -> u32 {
    if avg_cycle_days == 0 {
        DEFAULT_CYCLE_DAYS
    } else {
        avg_cycle_days
    }
}

fn phase_for_cycle_day(normalized: i64, cycle_length: u32) -> CyclePhase {
    let length = f64::from(cycle_length);
    let day = normalized as f64;

    if normalized <= i64::from(MENSTRUAL_LAST_DAY) {
        CyclePhase::Menstrual
    } else if day <= FOLLICULAR_END_FRACTION * length {
        CyclePhase::Follicular
    } else if day <= OVULATORY_END_FRACTION * length {
        CyclePhase::Ovulatory
    } else {
        CyclePhase::Luteal
    }
}
