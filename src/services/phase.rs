// ABOUTME: Resolves a cycle phase estimate from the local engine or an optional remote estimator
// ABOUTME: Remote failures fall back to the local estimate with a soft notice, never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::inference::PhaseEstimator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stridesafe_core::models::{
    CycleSignals, EstimateSource, PhaseEstimate, PhaseLabel, PhasePolicy,
};
use stridesafe_intelligence::{derive_phase_policy, infer_phase_at, share_label};
use tracing::{debug, warn};

/// Notice shown inline when the remote estimator could not be used
const REMOTE_FALLBACK_NOTICE: &str = "Using on-device estimate; remote service unavailable";

/// A phase estimate with everything derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResolution {
    /// The estimate that was used
    pub estimate: PhaseEstimate,
    /// Training policy derived from `estimate`
    pub policy: PhasePolicy,
    /// Shareable label for `estimate`
    pub label: PhaseLabel,
    /// Where `estimate` came from
    pub source: EstimateSource,
    /// Soft, displayable message when the remote estimator failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Phase estimate resolution
#[derive(Clone, Default)]
pub struct PhaseService {
    estimator: Option<Arc<dyn PhaseEstimator>>,
}

impl PhaseService {
    /// Service that only uses the on-device engine
    #[must_use]
    pub fn local() -> Self {
        Self { estimator: None }
    }

    /// Service that asks `estimator` first
    #[must_use]
    pub fn with_estimator(estimator: Arc<dyn PhaseEstimator>) -> Self {
        Self {
            estimator: Some(estimator),
        }
    }

    /// Whether a remote estimator is configured
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.estimator.is_some()
    }

    /// Resolve as of the current time
    pub async fn resolve(&self, signals: &CycleSignals) -> PhaseResolution {
        self.resolve_at(signals, Utc::now()).await
    }

    /// Resolve as of `now`
    ///
    /// The local estimate is always computed. A remote success replaces it;
    /// a remote failure is logged and reported through `notice`.
    pub async fn resolve_at(&self, signals: &CycleSignals, now: DateTime<Utc>) -> PhaseResolution {
        let local = infer_phase_at(signals, now);

        let (estimate, source, notice) = match &self.estimator {
            None => (local, EstimateSource::Local, None),
            Some(estimator) => match estimator.estimate(signals).await {
                Ok(remote) => {
                    debug!(
                        phase = %remote.phase,
                        local_phase = %local.phase,
                        "Using remote phase estimate"
                    );
                    (remote, EstimateSource::Remote, None)
                }
                Err(e) => {
                    warn!(error = %e, "Remote phase estimate failed, using local estimate");
                    (
                        local,
                        EstimateSource::Local,
                        Some(REMOTE_FALLBACK_NOTICE.to_owned()),
                    )
                }
            },
        };

        PhaseResolution {
            policy: derive_phase_policy(&estimate, signals),
            label: share_label(&estimate),
            estimate,
            source,
            notice,
        }
    }
}
