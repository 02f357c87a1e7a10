// ABOUTME: Limb symmetry index scoring for rehab hop and strength tests
// ABOUTME: LSI = injured / healthy x 100, with return-to-sport and pain flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use stridesafe_core::constants::rehab::{PAIN_FLAG_THRESHOLD, RETURN_TO_SPORT_LSI};
use stridesafe_core::models::{LimbSymmetryResult, RehabAssessmentInput};

/// Limb symmetry index in percent, rounded to one decimal and clamped to 0-100
///
/// Returns `None` when the healthy limb value is not positive or either value
/// is not finite.
#[must_use]
pub fn limb_symmetry_index(injured: f64, healthy: f64) -> Option<f64> {
    if !injured.is_finite() || !healthy.is_finite() || healthy <= 0.0 {
        return None;
    }
    let lsi = injured * 100.0 / healthy;
    Some(((lsi * 10.0).round() / 10.0).clamp(0.0, 100.0))
}

/// Score one rehab test
#[must_use]
pub fn score_limb_symmetry(input: &RehabAssessmentInput) -> LimbSymmetryResult {
    let lsi_percent = limb_symmetry_index(input.injured_limb_value, input.healthy_limb_value);
    LimbSymmetryResult {
        test_name: input.test_name.clone(),
        lsi_percent,
        meets_return_to_sport_threshold: lsi_percent.is_some_and(|lsi| lsi >= RETURN_TO_SPORT_LSI),
        pain_flag: input
            .pain_0_to_10
            .is_some_and(|pain| pain >= PAIN_FLAG_THRESHOLD),
    }
}
