// ABOUTME: Remote phase inference seam: the PhaseEstimator trait and its HTTP implementation
// ABOUTME: POSTs cycle signals to a remote estimator and validates the returned PhaseEstimate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Remote phase estimation
//!
//! The local engine in `stridesafe-intelligence` is always available. A
//! [`PhaseEstimator`] is an optional second opinion the phase service consults
//! first; any error it returns sends the caller back to the local estimate.

use crate::config::InferenceConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use stridesafe_core::constants::service_names::PHASE_INFERENCE;
use stridesafe_core::errors::{AppError, AppResult, ErrorCode};
use stridesafe_core::models::{CycleSignals, PhaseEstimate};
use tracing::{debug, error};

/// Source of phase estimates other than the on-device engine
#[async_trait]
pub trait PhaseEstimator: Send + Sync {
    /// Estimate the phase for the given signals
    async fn estimate(&self, signals: &CycleSignals) -> AppResult<PhaseEstimate>;
}

/// Phase estimator backed by a remote HTTP service
pub struct HttpPhaseEstimator {
    client: Client,
    endpoint: String,
}

impl HttpPhaseEstimator {
    /// Create an estimator posting to `endpoint` with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Build an estimator from configuration; `None` when no remote URL is set
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn from_config(config: &InferenceConfig) -> AppResult<Option<Self>> {
        config
            .endpoint()
            .map(|endpoint| Self::new(endpoint, config.timeout))
            .transpose()
    }

    /// Endpoint this estimator posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PhaseEstimator for HttpPhaseEstimator {
    async fn estimate(&self, signals: &CycleSignals) -> AppResult<PhaseEstimate> {
        debug!(endpoint = %self.endpoint, "Requesting remote phase estimate");

        let response = self
            .client
            .post(&self.endpoint)
            .json(signals)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {PHASE_INFERENCE}: {e}");
                if e.is_connect() || e.is_timeout() {
                    AppError::new(
                        ErrorCode::ExternalServiceUnavailable,
                        format!("Cannot reach {PHASE_INFERENCE} at {}: {e}", self.endpoint),
                    )
                } else {
                    AppError::external_service(PHASE_INFERENCE, format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(PHASE_INFERENCE, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(AppError::external_service(
                PHASE_INFERENCE,
                format!("Estimator returned {status}"),
            ));
        }

        let estimate: PhaseEstimate = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(PHASE_INFERENCE, format!("Malformed estimate: {e}"))
        })?;

        if !(0.0..=1.0).contains(&estimate.confidence_0_to_1) {
            return Err(AppError::external_service(
                PHASE_INFERENCE,
                format!(
                    "Confidence {} outside [0, 1]",
                    estimate.confidence_0_to_1
                ),
            ));
        }

        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_url_is_none() {
        let estimator = HttpPhaseEstimator::from_config(&InferenceConfig::default()).unwrap();
        assert!(estimator.is_none());
    }

    #[test]
    fn test_from_config_builds_endpoint() {
        let config = InferenceConfig {
            base_url: Some("http://127.0.0.1:9".to_owned()),
            ..InferenceConfig::default()
        };
        let estimator = HttpPhaseEstimator::from_config(&config).unwrap().unwrap();
        assert_eq!(
            estimator.endpoint(),
            "http://127.0.0.1:9/api/cycle/phase-estimate"
        );
    }
}
