// ABOUTME: Movement assessment and cycle phase engines for StrideSafe
// ABOUTME: Pure, synchronous computations with no storage or network access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # StrideSafe Intelligence
//!
//! - **`assessment_normalizer`**: persisted record + raw model output into one view
//! - **`cycle_phase`**: phase estimate, training policy, shareable label
//! - **`risk_snapshot`**: recent-risk summary per athlete
//! - **`rehab`**: limb symmetry index

/// Assessment normalization
pub mod assessment_normalizer;
/// Cycle phase inference and training policy
pub mod cycle_phase;
/// Limb symmetry scoring
pub mod rehab;
/// Per-athlete risk summary
pub mod risk_snapshot;

pub use assessment_normalizer::{normalize_assessment, normalize_record, parse_raw_model_output};
pub use cycle_phase::{
    confidence_bucket, derive_phase_policy, infer_phase, infer_phase_at, share_label,
};
pub use rehab::{limb_symmetry_index, score_limb_symmetry};
pub use risk_snapshot::build_risk_snapshot;
