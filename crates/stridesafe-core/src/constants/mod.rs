// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Phase thresholds, policy baselines, risk and rehab tuning values, and service defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Tuning values are grouped by the engine that consumes them so that a change
//! to, say, the ovulatory window is made in exactly one place.

/// Cycle phase inference constants
pub mod cycle {
    /// Cycle length assumed when none (or zero) is logged
    pub const DEFAULT_CYCLE_DAYS: u32 = 28;
    /// Longest average cycle accepted from a client
    pub const MAX_CYCLE_DAYS: u32 = 90;
    /// Last day (inclusive, 0-based within the cycle) counted as menstrual
    pub const MENSTRUAL_LAST_DAY: u32 = 4;
    /// Fraction of the cycle after which the follicular phase ends
    pub const FOLLICULAR_END_FRACTION: f64 = 0.45;
    /// Fraction of the cycle after which the ovulatory window ends
    pub const OVULATORY_END_FRACTION: f64 = 0.65;
    /// Base confidence when a period start date is logged
    pub const LOGGED_CONFIDENCE: f64 = 0.8;
    /// Base confidence when no usable period start date exists
    pub const UNLOGGED_CONFIDENCE: f64 = 0.45;
    /// Confidence multiplier for combined oral contraceptive users
    pub const COMBINED_OCP_CONFIDENCE_FACTOR: f64 = 0.6;
    /// Confidence floor applied when heavy flow is reported
    pub const HEAVY_FLOW_CONFIDENCE_FLOOR: f64 = 0.7;
    /// Lowest confidence ever reported
    pub const MIN_CONFIDENCE: f64 = 0.2;
    /// Highest confidence ever reported
    pub const MAX_CONFIDENCE: f64 = 1.0;
    /// Fixed key under which client-local signals are stored
    pub const SIGNALS_STORAGE_KEY: &str = "stridesafe.phase_signals.v1";
}

/// Training policy constants derived from a phase estimate
pub mod policy {
    /// Baseline extra warm-up minutes
    pub const BASELINE_WARMUP_EXTRA_MIN: u32 = 4;
    /// Baseline change in cutting volume
    pub const BASELINE_CUT_DENSITY_DELTA: f64 = -0.10;
    /// Extra warm-up minutes during menstruation or with symptoms
    pub const SYMPTOMATIC_WARMUP_EXTRA_MIN: u32 = 6;
    /// Cutting-volume change during menstruation or with symptoms
    pub const SYMPTOMATIC_CUT_DENSITY_DELTA: f64 = -0.20;
    /// Cutting-volume change in the ovulatory window
    pub const OVULATORY_CUT_DENSITY_DELTA: f64 = -0.05;
    /// Estimates below this confidence get a softened workload change
    pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;
    /// Multiplier applied to the delta when confidence is low
    pub const LOW_CONFIDENCE_DELTA_FACTOR: f64 = 0.5;
    /// Multiplier applied to the delta for combined oral contraceptive users
    pub const COMBINED_OCP_DELTA_FACTOR: f64 = 0.6;
    /// Warm-up minutes removed for combined oral contraceptive users
    pub const COMBINED_OCP_WARMUP_REDUCTION: u32 = 2;
    /// Warm-up never drops below this for combined oral contraceptive users
    pub const COMBINED_OCP_MIN_WARMUP: u32 = 2;
    /// Lower bound of the "high" confidence bucket
    pub const HIGH_BUCKET_MIN: f64 = 0.75;
    /// Lower bound of the "med" confidence bucket
    pub const MED_BUCKET_MIN: f64 = 0.5;
}

/// Assessment normalization constants
pub mod assessment {
    /// View quality below this score recommends a retake by default
    pub const RETRY_SCORE_THRESHOLD: f64 = 0.6;
    /// Highest ordinal risk rating
    pub const MAX_RISK_RATING: u8 = 3;
    /// Serialized default for the cues column
    pub const EMPTY_CUES: &str = "[]";
    /// Serialized default for the metrics column
    pub const EMPTY_METRICS: &str = "{}";
}

/// Risk snapshot constants
pub mod risk {
    /// Number of most recent assessments summarised
    pub const SNAPSHOT_WINDOW: usize = 10;
    /// Number of earlier assessments the latest one is compared with
    pub const TREND_LOOKBACK: usize = 3;
    /// Minimum rating difference that counts as a trend
    pub const TREND_THRESHOLD: f64 = 0.5;
}

/// Rehab scoring constants
pub mod rehab {
    /// Limb symmetry index required for return to sport (percent)
    pub const RETURN_TO_SPORT_LSI: f64 = 90.0;
    /// Pain score (0-10) at or above which a test is flagged
    pub const PAIN_FLAG_THRESHOLD: u8 = 3;
    /// Highest accepted pain score
    pub const MAX_PAIN_SCORE: u8 = 10;
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Service identifiers used in structured logs
pub mod service_names {
    /// HTTP server
    pub const STRIDESAFE_SERVER: &str = "stridesafe-server";
    /// Remote phase inference service
    pub const PHASE_INFERENCE: &str = "phase-inference";
}
