// ABOUTME: Phase command for stridesafe-cli
// ABOUTME: Merges flags into the stored signals, saves them, and prints the resolved plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use stridesafe_server::{
    config::{InferenceConfig, SignalsConfig},
    constants::cycle::MAX_CYCLE_DAYS,
    errors::{AppError, AppResult},
    inference::HttpPhaseEstimator,
    models::{Contraception, CycleSignals, Symptom},
    services::PhaseService,
    signals::{FileSignalsRepository, SignalsRepository},
};
use stridesafe_intelligence::cycle_phase::parse_period_start;
use tracing::{debug, info};

use crate::helpers::display::{print_json, print_notice};

type Result<T> = AppResult<T>;

/// Flags of the `phase` subcommand
#[derive(Args)]
pub struct PhaseArgs {
    /// Directory holding the signals file (defaults to `SIGNALS_STORE_DIR` or the platform data dir)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Start of the last period (`YYYY-MM-DD` or RFC 3339)
    #[arg(long)]
    last_period: Option<String>,

    /// Average cycle length in days (0 = unknown)
    #[arg(long)]
    cycle_days: Option<u32>,

    /// Symptom tag to add (repeatable), e.g. `cramps`, `heavy_flow`, `none`
    #[arg(long = "symptom")]
    symptoms: Vec<String>,

    /// Remove all stored symptoms before adding any given with `--symptom`
    #[arg(long)]
    clear_symptoms: bool,

    /// Contraception in use: `none`, `combined_ocp`, `iud`, `implant`, `other`
    #[arg(long)]
    contraception: Option<String>,

    /// Remote estimator base URL (defaults to `PHASE_INFERENCE_URL`)
    #[arg(long)]
    remote: Option<String>,
}

/// Run the `phase` subcommand
pub async fn run(args: PhaseArgs) -> Result<()> {
    let store_dir = args
        .store
        .clone()
        .unwrap_or_else(|| SignalsConfig::from_env().store_dir);
    let repository = FileSignalsRepository::new(&store_dir);

    let mut signals = repository.load()?;
    apply_flags(&mut signals, &args)?;
    repository.save(&signals)?;
    debug!(path = %repository.path().display(), "Signals saved");

    let service = phase_service(args.remote)?;
    let resolution = service.resolve(&signals).await;
    info!(phase = %resolution.estimate.phase, "Phase resolved");

    if let Some(notice) = &resolution.notice {
        print_notice(notice);
    }
    print_json(&resolution)
}

fn apply_flags(signals: &mut CycleSignals, args: &PhaseArgs) -> Result<()> {
    if let Some(last_period) = &args.last_period {
        let trimmed = last_period.trim();
        if !trimmed.is_empty() && parse_period_start(trimmed).is_none() {
            return Err(AppError::invalid_input(format!(
                "--last-period '{trimmed}' is not YYYY-MM-DD or RFC 3339"
            )));
        }
        trimmed.clone_into(&mut signals.last_period_iso);
    }

    if let Some(cycle_days) = args.cycle_days {
        if cycle_days > MAX_CYCLE_DAYS {
            return Err(AppError::invalid_input(format!(
                "--cycle-days must be between 0 and {MAX_CYCLE_DAYS}"
            )));
        }
        signals.avg_cycle_days = cycle_days;
    }

    if args.clear_symptoms {
        signals.symptoms.clear();
    }
    for tag in &args.symptoms {
        signals.symptoms.insert(parse_symptom(tag)?);
    }

    if let Some(contraception) = &args.contraception {
        signals.contraception = Contraception::parse(contraception.trim());
    }

    Ok(())
}

/// Same mapping as stored signals: unknown tags become `other`
fn parse_symptom(tag: &str) -> Result<Symptom> {
    Ok(serde_json::from_value(Value::String(tag.trim().to_owned()))?)
}

fn phase_service(remote: Option<String>) -> Result<PhaseService> {
    let mut inference = InferenceConfig::from_env()?;
    if let Some(url) = remote {
        inference.base_url = Some(url.trim_end_matches('/').to_owned());
    }

    Ok(match HttpPhaseEstimator::from_config(&inference)? {
        Some(estimator) => PhaseService::with_estimator(Arc::new(estimator)),
        None => PhaseService::local(),
    })
}
