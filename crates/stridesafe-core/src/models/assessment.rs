// ABOUTME: Movement assessment models: persisted record, derived insights, and the normalized view
// ABOUTME: DrillType, metrics, context, frames, recommendations, and every AI-derived insight shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::assessment::{EMPTY_CUES, EMPTY_METRICS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Movement drill captured on video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillType {
    /// Bilateral drop jump from a box
    DropJump,
    /// Pre-planned change of direction
    PlannedCut,
    /// Reactive change of direction
    UnplannedCut,
}

impl DrillType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DropJump => "drop_jump",
            Self::PlannedCut => "planned_cut",
            Self::UnplannedCut => "unplanned_cut",
        }
    }

    /// Parse from database string representation
    ///
    /// Unlike most enums here there is no fallback variant: an unknown drill
    /// in a persisted row is a corrupt record.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "drop_jump" => Some(Self::DropJump),
            "planned_cut" => Some(Self::PlannedCut),
            "unplanned_cut" => Some(Self::UnplannedCut),
            _ => None,
        }
    }
}

impl fmt::Display for DrillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a risk signal or overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor deviation
    Low,
    /// Anything the model did not explicitly call low or high
    #[default]
    Moderate,
    /// Needs attention before the next rep
    High,
}

impl Severity {
    /// Map a model-supplied severity string
    ///
    /// Only the exact strings `low` and `high` pass through; everything else,
    /// including a missing value, is `moderate`.
    #[must_use]
    pub fn from_model(value: Option<&str>) -> Self {
        match value {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            _ => Self::Moderate,
        }
    }
}

/// Scalar movement metrics stored with every assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMetrics {
    /// Knee valgus severity score
    #[serde(rename = "kneeValgusScore", skip_serializing_if = "Option::is_none")]
    pub knee_valgus_score: Option<f64>,
    /// Trunk lean left the base of support
    #[serde(rename = "trunkLeanOutsideBOS", skip_serializing_if = "Option::is_none")]
    pub trunk_lean_outside_bos: Option<bool>,
    /// Foot plant landed outside the centre of mass
    #[serde(rename = "footPlantOutsideCOM", skip_serializing_if = "Option::is_none")]
    pub foot_plant_outside_com: Option<bool>,
    /// Metrics without a typed field, kept as written
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Side of the body with the injury under rehab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuredSide {
    /// Left limb
    Left,
    /// Right limb
    Right,
    /// No current injury
    None,
}

/// Capture context for a movement clip; every knob is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementContext {
    /// Playing surface (turf, grass, court, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    /// Footwear worn during the clip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footwear: Option<String>,
    /// Session type (warm-up, practice, game, rehab)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    /// Self-reported fatigue 0-10
    #[serde(rename = "fatigue0to10", skip_serializing_if = "Option::is_none")]
    pub fatigue_0_to_10: Option<u8>,
    /// Injured side, when in rehab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injured_side: Option<InjuredSide>,
    /// Camera placement (frontal, sagittal, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,
    /// Weeks since injury or surgery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks_post_injury: Option<u32>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A captured video frame attached to an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Unique identifier
    pub id: String,
    /// Owning assessment
    pub assessment_id: String,
    /// Capture time within the session
    pub captured_at: DateTime<Utc>,
    /// Short label (e.g. "first contact")
    pub label: String,
    /// Optional annotation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Frame shows a risky position
    pub risk_flag: bool,
}

/// Priority of a coaching recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    /// Nice to have
    Low,
    /// Default priority
    #[default]
    Medium,
    /// Address before the next session
    High,
}

impl RecommendationPriority {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "high" => Self::High,
            // Default to Medium for unrecognized values
            _ => Self::Medium,
        }
    }
}

/// Coaching recommendation attached to an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Unique identifier
    pub id: String,
    /// Owning assessment
    pub assessment_id: String,
    /// Headline
    pub title: String,
    /// Body text
    pub detail: String,
    /// Priority
    pub priority: RecommendationPriority,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Derived insight shapes
// ============================================================================

/// One-paragraph summary of the clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Short headline
    #[serde(default)]
    pub headline: String,
    /// Longer summary
    #[serde(default)]
    pub summary: String,
    /// Model confidence, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A single risk observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignal {
    /// What was observed (never empty)
    pub label: String,
    /// How serious it is
    pub severity: Severity,
    /// Supporting evidence
    #[serde(default)]
    pub evidence: String,
}

/// What the coach should do with the athlete next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingPlan {
    /// Cue to give on the very next rep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immediate_cue: Option<String>,
    /// Focus for the next practice block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_focus: Option<String>,
    /// What to keep watching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<String>,
}

/// Score for one phase of the movement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseScore {
    /// Quality on a 0-3 scale
    #[serde(rename = "quality0to3", skip_serializing_if = "Option::is_none")]
    pub quality_0_to_3: Option<f64>,
    /// Notes for this phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Main contributor to risk in this phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_driver: Option<String>,
    /// Time to reach a stable position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_stable_ms: Option<f64>,
}

/// Per-phase scores of the movement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseScores {
    /// Preparation / approach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep: Option<PhaseScore>,
    /// Take-off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub takeoff: Option<PhaseScore>,
    /// First ground contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_contact: Option<PhaseScore>,
    /// Stabilization after landing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stabilization: Option<PhaseScore>,
}

/// How usable the clip was for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuality {
    /// Quality score in [0, 1]
    #[serde(rename = "score0to1")]
    pub score_0_to_1: f64,
    /// How to film the next attempt
    #[serde(default)]
    pub fix_instructions: Vec<String>,
    /// Whether a retake is recommended
    pub retry_recommended: bool,
}

/// "If you changed X, risk would drop by Y"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterfactual {
    /// The technique change (never empty)
    pub tweak: String,
    /// Expected drop in risk rating
    pub predicted_risk_drop: f64,
    /// Whether the next rep should verify the change
    pub next_rep_verify: bool,
    /// Optional prose summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Drawing instruction for the video overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// Overlay kind (never empty)
    pub overlay_type: String,
    /// What the overlay shows
    #[serde(default)]
    pub description: String,
    /// How to render it
    #[serde(default)]
    pub instructions: String,
    /// Severity tint
    #[serde(default)]
    pub severity: Severity,
}

/// Every AI-derived insight field of an assessment
///
/// The same shape is used twice: as the optional persisted columns of a record
/// (authoritative when set) and as the derived half of the normalized view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInsights {
    /// Summary of the clip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    /// Risk observations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_signals: Option<Vec<RiskSignal>>,
    /// Coaching plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coaching_plan: Option<CoachingPlan>,
    /// Per-phase scores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_scores: Option<PhaseScores>,
    /// Clip quality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_quality: Option<ViewQuality>,
    /// Suggested technique change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterfactual: Option<Counterfactual>,
    /// Left/right asymmetry 0-100
    #[serde(
        rename = "asymmetryIndex0to100",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub asymmetry_index_0_to_100: Option<f64>,
    /// Change per metric relative to the athlete's baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_from_baseline: Option<BTreeMap<String, f64>>,
    /// Video overlays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays: Option<Vec<Overlay>>,
    /// Time to a stable landing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_stable_ms: Option<f64>,
    /// Ground contact time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_contact_time_ms: Option<f64>,
    /// Movement phase with the highest risk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_risk_phase: Option<String>,
}

fn default_cues() -> String {
    EMPTY_CUES.to_owned()
}

fn default_metrics() -> String {
    EMPTY_METRICS.to_owned()
}

/// Assessment as persisted
///
/// `cues`, `metrics`, `context` and `raw_model_output` keep their serialized
/// form; the normalizer decodes them on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    /// Unique identifier
    pub id: String,
    /// Athlete the clip belongs to
    pub athlete_id: String,
    /// Drill performed
    pub drill_type: DrillType,
    /// Ordinal risk rating 0-3
    pub risk_rating: u8,
    /// Serialized `Vec<String>`, `"[]"` when empty
    #[serde(default = "default_cues")]
    pub cues: String,
    /// Serialized [`AssessmentMetrics`], `"{}"` when empty
    #[serde(default = "default_metrics")]
    pub metrics: String,
    /// Serialized [`MovementContext`]
    #[serde(default)]
    pub context: Option<String>,
    /// Raw AI model response, as received
    #[serde(default)]
    pub raw_model_output: Option<String>,
    /// Persisted insight columns
    #[serde(default)]
    pub insights: AssessmentInsights,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Frames ordered by capture time
    #[serde(default)]
    pub frames: Vec<Frame>,
    /// Recommendations
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Canonical, UI-ready assessment; recomputed on every read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAssessmentView {
    /// Unique identifier
    pub id: String,
    /// Athlete the clip belongs to
    pub athlete_id: String,
    /// Drill performed
    pub drill_type: DrillType,
    /// Ordinal risk rating 0-3
    pub risk_rating: u8,
    /// Decoded cues
    pub cues: Vec<String>,
    /// Decoded metrics
    pub metrics: AssessmentMetrics,
    /// Decoded capture context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MovementContext>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Frames ordered by capture time
    pub frames: Vec<Frame>,
    /// Recommendations
    pub recommendations: Vec<Recommendation>,
    /// Resolved insight fields
    #[serde(flatten)]
    pub insights: AssessmentInsights,
}
