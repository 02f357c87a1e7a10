// ABOUTME: Menstrual cycle models: client-local signals, phase estimate, training policy, shareable label
// ABOUTME: Enum tags serialize snake_case; structs serialize camelCase to match the client payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::cycle::DEFAULT_CYCLE_DAYS;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Self-reported symptom tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    /// Explicit "no symptoms" sentinel
    None,
    /// Heavy menstrual flow
    HeavyFlow,
    /// Cramps
    Cramps,
    /// Bloating
    Bloating,
    /// Fatigue
    Fatigue,
    /// Headache
    Headache,
    /// Low mood
    LowMood,
    /// Breast tenderness
    BreastTenderness,
    /// Any tag this build does not know
    #[serde(other)]
    Other,
}

/// Direction of a tracked physiological trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Rising
    Up,
    /// Falling
    Down,
    /// No meaningful change
    #[default]
    Flat,
}

/// Contraception in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contraception {
    /// None
    #[default]
    None,
    /// Combined oral contraceptive pill
    CombinedOcp,
    /// Intrauterine device
    Iud,
    /// Hormonal implant
    Implant,
    /// Anything else
    Other,
}

impl Contraception {
    /// Parse a CLI or storage tag; unknown tags map to `Other`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "none" => Self::None,
            "combined_ocp" => Self::CombinedOcp,
            "iud" => Self::Iud,
            "implant" => Self::Implant,
            _ => Self::Other,
        }
    }
}

fn default_cycle_days() -> u32 {
    DEFAULT_CYCLE_DAYS
}

/// Treat an explicit `null` like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_cycle_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(DEFAULT_CYCLE_DAYS))
}

/// User-entered signals; stored only on the athlete's device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSignals {
    /// Start of the last period (`YYYY-MM-DD` or RFC 3339), may be empty
    #[serde(rename = "lastPeriodISO", default, deserialize_with = "null_as_default")]
    pub last_period_iso: String,
    /// Average cycle length in days; 0 means unknown
    #[serde(
        default = "default_cycle_days",
        deserialize_with = "null_as_default_cycle_days"
    )]
    pub avg_cycle_days: u32,
    /// Logged symptom tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: BTreeSet<Symptom>,
    /// Heart-rate variability trend
    #[serde(default, deserialize_with = "null_as_default")]
    pub hrv_trend: Trend,
    /// Basal temperature trend
    #[serde(default, deserialize_with = "null_as_default")]
    pub temp_trend: Trend,
    /// Contraception in use
    #[serde(default, deserialize_with = "null_as_default")]
    pub contraception: Contraception,
}

impl Default for CycleSignals {
    fn default() -> Self {
        Self {
            last_period_iso: String::new(),
            avg_cycle_days: DEFAULT_CYCLE_DAYS,
            symptoms: BTreeSet::new(),
            hrv_trend: Trend::Flat,
            temp_trend: Trend::Flat,
            contraception: Contraception::None,
        }
    }
}

impl CycleSignals {
    /// Whether any symptom other than the `none` sentinel is logged
    #[must_use]
    pub fn has_symptoms(&self) -> bool {
        self.symptoms.iter().any(|s| *s != Symptom::None)
    }
}

/// Estimated menstrual cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    /// Days 0-4 of the cycle
    Menstrual,
    /// Up to 45% of the cycle
    Follicular,
    /// Up to 65% of the cycle
    Ovulatory,
    /// Remainder of the cycle
    Luteal,
    /// No usable period log
    Unsure,
}

impl CyclePhase {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Menstrual => "menstrual",
            Self::Follicular => "follicular",
            Self::Ovulatory => "ovulatory",
            Self::Luteal => "luteal",
            Self::Unsure => "unsure",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "menstrual" => Some(Self::Menstrual),
            "follicular" => Some(Self::Follicular),
            "ovulatory" => Some(Self::Ovulatory),
            "luteal" => Some(Self::Luteal),
            "unsure" => Some(Self::Unsure),
            _ => None,
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of phase inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEstimate {
    /// Estimated phase
    pub phase: CyclePhase,
    /// Confidence in [0.2, 1.0]
    #[serde(rename = "confidence0to1")]
    pub confidence_0_to_1: f64,
    /// Human-readable justification, in order
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// How closely the coach should watch cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueVigilance {
    /// Usual attention
    Normal,
    /// Heightened attention
    High,
}

/// Training adjustments implied by a phase estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePolicy {
    /// Extra warm-up minutes
    pub warmup_extra_min: u32,
    /// Change in cutting volume; negative is a reduction
    pub cut_density_delta: f64,
    /// Emphasize landing mechanics
    pub landing_focus: bool,
    /// Cue vigilance level
    pub cue_vigilance: CueVigilance,
}

/// Coarse confidence category safe to share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBucket {
    /// >= 0.75
    High,
    /// >= 0.5
    Med,
    /// Below 0.5
    Low,
}

impl ConfidenceBucket {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Med => "med",
            Self::Low => "low",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "med" => Some(Self::Med),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// The only cycle data that ever leaves the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhaseLabel {
    /// Estimated phase
    pub phase: CyclePhase,
    /// Coarse confidence
    pub confidence_bucket: ConfidenceBucket,
}

/// Where a phase estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    /// Deterministic on-device computation
    Local,
    /// Remote inference service
    Remote,
}
