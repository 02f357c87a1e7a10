// ABOUTME: Rehab test models for limb symmetry scoring
// ABOUTME: RehabAssessmentInput request shape and LimbSymmetryResult response shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// One single-leg test result pair (hop distance, strength, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RehabAssessmentInput {
    /// Test name, e.g. "single hop for distance"
    pub test_name: String,
    /// Value measured on the injured limb
    pub injured_limb_value: f64,
    /// Value measured on the healthy limb
    pub healthy_limb_value: f64,
    /// Pain during the test, 0-10
    #[serde(rename = "pain0to10", default, skip_serializing_if = "Option::is_none")]
    pub pain_0_to_10: Option<u8>,
    /// Weeks since injury or surgery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks_post_injury: Option<u32>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Scored limb symmetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimbSymmetryResult {
    /// Test name echoed from the input
    pub test_name: String,
    /// Limb symmetry index 0-100, absent when it cannot be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsi_percent: Option<f64>,
    /// LSI meets the return-to-sport threshold
    pub meets_return_to_sport_threshold: bool,
    /// Reported pain is at or above the flag threshold
    pub pain_flag: bool,
}
