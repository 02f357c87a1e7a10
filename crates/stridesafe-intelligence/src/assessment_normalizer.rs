// ABOUTME: Reconciles persisted assessment columns with best-effort AI model output
// ABOUTME: One tagged extraction function per derived field, tolerant of snake_case and camelCase keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Assessment Normalizer
//!
//! Produces one [`NormalizedAssessmentView`] from an [`AssessmentRecord`] and
//! the raw model output that came with it.
//!
//! Every derived field resolves independently:
//!
//! 1. a persisted insight column, when set, is used verbatim;
//! 2. otherwise the field's extraction rule runs against the parsed raw object;
//! 3. otherwise the field is absent.
//!
//! Raw model output is untrusted. Unparseable text, a non-object document, or a
//! field with the wrong shape only ever makes fields absent. The serialized
//! `cues`, `metrics` and `context` columns are written by this platform and are
//! parsed strictly: a failure there is a corrupt record and is returned as an
//! error.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use stridesafe_core::constants::assessment::RETRY_SCORE_THRESHOLD;
use stridesafe_core::errors::{AppError, AppResult};
use stridesafe_core::models::{
    AssessmentInsights, AssessmentMetrics, AssessmentRecord, CoachingPlan, Counterfactual,
    MovementContext, NormalizedAssessmentView, Overlay, Overview, PhaseScore, PhaseScores,
    RiskSignal, Severity, ViewQuality,
};
use tracing::debug;

/// Parsed top-level object of the raw model output
pub type RawObject = Map<String, Value>;

/// Parse raw model output into its top-level object
///
/// Returns `None` for missing text, invalid JSON, or any document that is not
/// an object. None of these are errors.
#[must_use]
pub fn parse_raw_model_output(raw: Option<&str>) -> Option<RawObject> {
    let text = raw?;
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        Ok(other) => {
            debug!(kind = json_kind(&other), "Raw model output is not an object, ignoring");
            None
        }
        Err(e) => {
            debug!(error = %e, "Raw model output is not valid JSON, ignoring");
            None
        }
    }
}

/// Normalize a record using its own stored raw model output
///
/// # Errors
///
/// Returns a serialization error if the `cues`, `metrics` or `context` column
/// cannot be decoded.
pub fn normalize_record(record: &AssessmentRecord) -> AppResult<NormalizedAssessmentView> {
    normalize_assessment(record, record.raw_model_output.as_deref())
}

/// Normalize a record against an explicit raw model output
///
/// # Errors
///
/// Returns a serialization error if the `cues`, `metrics` or `context` column
/// cannot be decoded. Malformed `raw` never produces an error.
pub fn normalize_assessment(
    record: &AssessmentRecord,
    raw: Option<&str>,
) -> AppResult<NormalizedAssessmentView> {
    let cues = parse_cues(record)?;
    let metrics = parse_metrics(record)?;
    let context = parse_context(record)?;

    let raw = parse_raw_model_output(raw);
    let insights = resolve_insights(&record.insights, raw.as_ref());

    let mut frames = record.frames.clone();
    frames.sort_by_key(|frame| frame.captured_at);

    Ok(NormalizedAssessmentView {
        id: record.id.clone(),
        athlete_id: record.athlete_id.clone(),
        drill_type: record.drill_type,
        risk_rating: record.risk_rating,
        cues,
        metrics,
        context,
        created_at: record.created_at,
        updated_at: record.updated_at,
        frames,
        recommendations: record.recommendations.clone(),
        insights,
    })
}

/// Resolve every insight field: persisted column first, then the raw object
#[must_use]
pub fn resolve_insights(
    persisted: &AssessmentInsights,
    raw: Option<&RawObject>,
) -> AssessmentInsights {
    AssessmentInsights {
        overview: persisted
            .overview
            .clone()
            .or_else(|| raw.and_then(extract_overview)),
        risk_signals: persisted
            .risk_signals
            .clone()
            .or_else(|| raw.and_then(extract_risk_signals)),
        coaching_plan: persisted
            .coaching_plan
            .clone()
            .or_else(|| raw.and_then(extract_coaching_plan)),
        phase_scores: persisted
            .phase_scores
            .clone()
            .or_else(|| raw.and_then(extract_phase_scores)),
        view_quality: persisted
            .view_quality
            .clone()
            .or_else(|| raw.and_then(extract_view_quality)),
        counterfactual: persisted
            .counterfactual
            .clone()
            .or_else(|| raw.and_then(extract_counterfactual)),
        asymmetry_index_0_to_100: persisted
            .asymmetry_index_0_to_100
            .or_else(|| raw.and_then(extract_asymmetry_index)),
        delta_from_baseline: persisted
            .delta_from_baseline
            .clone()
            .or_else(|| raw.and_then(extract_delta_from_baseline)),
        overlays: persisted
            .overlays
            .clone()
            .or_else(|| raw.and_then(extract_overlays)),
        time_to_stable_ms: persisted
            .time_to_stable_ms
            .or_else(|| raw.and_then(extract_time_to_stable_ms)),
        ground_contact_time_ms: persisted
            .ground_contact_time_ms
            .or_else(|| raw.and_then(extract_ground_contact_time_ms)),
        peak_risk_phase: persisted
            .peak_risk_phase
            .clone()
            .or_else(|| raw.and_then(extract_peak_risk_phase)),
    }
}

// ============================================================================
// Persisted columns (strict)
// ============================================================================

fn parse_cues(record: &AssessmentRecord) -> AppResult<Vec<String>> {
    serde_json::from_str(&record.cues).map_err(|e| {
        AppError::serialization(format!("Assessment {} has unreadable cues: {e}", record.id))
            .with_resource_id(&record.id)
            .with_source(e)
    })
}

fn parse_metrics(record: &AssessmentRecord) -> AppResult<AssessmentMetrics> {
    serde_json::from_str(&record.metrics).map_err(|e| {
        AppError::serialization(format!(
            "Assessment {} has unreadable metrics: {e}",
            record.id
        ))
        .with_resource_id(&record.id)
        .with_source(e)
    })
}

fn parse_context(record: &AssessmentRecord) -> AppResult<Option<MovementContext>> {
    let Some(text) = record.context.as_deref() else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    // "null" decodes to None through the Option
    serde_json::from_str::<Option<MovementContext>>(text).map_err(|e| {
        AppError::serialization(format!(
            "Assessment {} has unreadable context: {e}",
            record.id
        ))
        .with_resource_id(&record.id)
        .with_source(e)
    })
}

// ============================================================================
// Key lookup helpers
// ============================================================================

/// First key (in order) whose value is present and not null
fn first<'a>(object: &'a RawObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|value| !value.is_null()))
}

fn first_object<'a>(object: &'a RawObject, keys: &[&str]) -> Option<&'a RawObject> {
    first(object, keys).and_then(Value::as_object)
}

fn first_array<'a>(object: &'a RawObject, keys: &[&str]) -> Option<&'a Vec<Value>> {
    first(object, keys).and_then(Value::as_array)
}

fn first_f64(object: &RawObject, keys: &[&str]) -> Option<f64> {
    first(object, keys).and_then(Value::as_f64)
}

fn first_str<'a>(object: &'a RawObject, keys: &[&str]) -> Option<&'a str> {
    first(object, keys).and_then(Value::as_str)
}

fn first_non_empty_str(object: &RawObject, keys: &[&str]) -> Option<String> {
    first_str(object, keys)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn string_or_empty(object: &RawObject, keys: &[&str]) -> String {
    first_str(object, keys).unwrap_or_default().to_owned()
}

/// Loose truthiness for flags the model may send as bool, number, or string
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Field extraction rules
// ============================================================================

fn extract_overview(raw: &RawObject) -> Option<Overview> {
    let overview = first_object(raw, &["overview"])?;
    let headline = string_or_empty(overview, &["headline"]);
    let summary = string_or_empty(overview, &["summary"]);
    if headline.is_empty() && summary.is_empty() {
        return None;
    }
    Some(Overview {
        headline,
        summary,
        confidence: first_f64(overview, &["confidence"]),
    })
}

fn extract_risk_signals(raw: &RawObject) -> Option<Vec<RiskSignal>> {
    let signals = first_array(raw, &["riskSignals", "risk_signals"])?;
    Some(
        signals
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|signal| {
                let label = string_or_empty(signal, &["label"]);
                if label.is_empty() {
                    return None;
                }
                Some(RiskSignal {
                    label,
                    severity: Severity::from_model(first_str(signal, &["severity"])),
                    evidence: string_or_empty(signal, &["evidence"]),
                })
            })
            .collect(),
    )
}

fn extract_coaching_plan(raw: &RawObject) -> Option<CoachingPlan> {
    let plan = first_object(raw, &["coaching_plan", "coachingPlan"])?;
    let immediate_cue = first_non_empty_str(plan, &["immediate_cue", "immediateCue"]);
    let practice_focus = first_non_empty_str(plan, &["practice_focus", "practiceFocus"]);
    let monitoring = first_non_empty_str(plan, &["monitoring"]);
    if immediate_cue.is_none() && practice_focus.is_none() && monitoring.is_none() {
        return None;
    }
    Some(CoachingPlan {
        immediate_cue,
        practice_focus,
        monitoring,
    })
}

fn extract_phase_score(scores: &RawObject, keys: &[&str]) -> Option<PhaseScore> {
    let score = first_object(scores, keys)?;
    Some(PhaseScore {
        quality_0_to_3: first_f64(score, &["quality_0_3", "quality0to3", "quality"]),
        notes: first_str(score, &["notes"]).map(str::to_owned),
        risk_driver: first_str(score, &["risk_driver", "riskDriver"]).map(str::to_owned),
        time_to_stable_ms: first_f64(score, &["time_to_stable_ms", "timeToStableMs"]),
    })
}

fn extract_phase_scores(raw: &RawObject) -> Option<PhaseScores> {
    let scores = first_object(raw, &["phase_scores", "phaseScores"])?;
    Some(PhaseScores {
        prep: extract_phase_score(scores, &["prep"]),
        takeoff: extract_phase_score(scores, &["takeoff"]),
        first_contact: extract_phase_score(scores, &["first_contact", "firstContact"]),
        stabilization: extract_phase_score(scores, &["stabilization"]),
    })
}

fn extract_view_quality(raw: &RawObject) -> Option<ViewQuality> {
    let quality = first_object(raw, &["view_quality", "viewQuality"])?;
    let score = first_f64(quality, &["score_0_1", "score0to1"])?;

    let fix_instructions = match first(quality, &["fix_instructions", "fixInstructions"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    };

    let retry_recommended = first(quality, &["retry_recommended", "retryRecommended"])
        .and_then(Value::as_bool)
        .unwrap_or(score < RETRY_SCORE_THRESHOLD);

    Some(ViewQuality {
        score_0_to_1: score,
        fix_instructions,
        retry_recommended,
    })
}

fn extract_counterfactual(raw: &RawObject) -> Option<Counterfactual> {
    let counterfactual = first_object(raw, &["counterfactual"])?;
    let tweak = first_non_empty_str(counterfactual, &["tweak"])?;
    Some(Counterfactual {
        tweak,
        predicted_risk_drop: first_f64(
            counterfactual,
            &["predicted_risk_drop", "predictedRiskDrop"],
        )
        .unwrap_or(0.0),
        next_rep_verify: truthy(first(
            counterfactual,
            &["next_rep_verify", "nextRepVerify"],
        )),
        summary: first_str(counterfactual, &["summary"]).map(str::to_owned),
    })
}

fn extract_overlays(raw: &RawObject) -> Option<Vec<Overlay>> {
    let overlays = first_array(raw, &["overlays"])?;
    Some(
        overlays
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|overlay| {
                let overlay_type = first_non_empty_str(overlay, &["overlay_type", "overlayType"])?;
                Some(Overlay {
                    overlay_type,
                    description: string_or_empty(overlay, &["description"]),
                    instructions: string_or_empty(overlay, &["instructions"]),
                    severity: Severity::from_model(first_str(overlay, &["severity"])),
                })
            })
            .collect(),
    )
}

fn extract_asymmetry_index(raw: &RawObject) -> Option<f64> {
    first_f64(raw, &["asymmetry_index_0_100", "asymmetryIndex0to100"])
}

fn extract_delta_from_baseline(raw: &RawObject) -> Option<BTreeMap<String, f64>> {
    let deltas = first_object(raw, &["delta_from_baseline", "deltaFromBaseline"])?;
    Some(
        deltas
            .iter()
            .filter_map(|(metric, delta)| delta.as_f64().map(|d| (metric.clone(), d)))
            .collect(),
    )
}

fn extract_time_to_stable_ms(raw: &RawObject) -> Option<f64> {
    first_f64(raw, &["time_to_stable_ms", "timeToStableMs"]).or_else(|| {
        let scores = first_object(raw, &["phase_scores", "phaseScores"])?;
        let stabilization = first_object(scores, &["stabilization"])?;
        first_f64(stabilization, &["time_to_stable_ms", "timeToStableMs"])
    })
}

fn extract_ground_contact_time_ms(raw: &RawObject) -> Option<f64> {
    first_f64(raw, &["ground_contact_time_ms", "groundContactTimeMs"])
}

fn extract_peak_risk_phase(raw: &RawObject) -> Option<String> {
    first_non_empty_str(raw, &["peak_risk_phase", "peakRiskPhase"])
}
