// ABOUTME: Core data models shared by the engines, the server, and the CLI
// ABOUTME: Re-exports assessment, cycle, rehab, and risk types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Serialized shapes are camelCase to match client payloads. Enum tags are
//! lowercase or `snake_case`, and those stored in the database expose
//! `as_str()` / `parse()` pairs.

/// Movement assessments and their derived insights
pub mod assessment;
/// Cycle signals, phase estimates, and training policy
pub mod cycle;
/// Rehab limb symmetry
pub mod rehab;
/// Per-athlete risk snapshot
pub mod risk;

pub use assessment::{
    AssessmentInsights, AssessmentMetrics, AssessmentRecord, CoachingPlan, Counterfactual,
    DrillType, Frame, InjuredSide, MovementContext, NormalizedAssessmentView, Overlay, Overview,
    PhaseScore, PhaseScores, Recommendation, RecommendationPriority, RiskSignal, Severity,
    ViewQuality,
};
pub use cycle::{
    ConfidenceBucket, Contraception, CueVigilance, CyclePhase, CycleSignals, EstimateSource,
    PhaseEstimate, PhaseLabel, PhasePolicy, Symptom, Trend,
};
pub use rehab::{LimbSymmetryResult, RehabAssessmentInput};
pub use risk::{RiskSnapshot, RiskTrend};
