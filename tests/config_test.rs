// ABOUTME: Integration tests for environment-driven configuration loading
// ABOUTME: Env vars are process-global, so every test runs serially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use stridesafe_server::{
    config::{DatabaseUrl, InferenceConfig, ServerConfig, SignalsConfig},
    errors::ErrorCode,
};

const VARS: [&str; 7] = [
    "HTTP_PORT",
    "HOST",
    "DATABASE_URL",
    "PHASE_INFERENCE_URL",
    "PHASE_INFERENCE_TIMEOUT_SECS",
    "CORS_ALLOWED_ORIGINS",
    "SIGNALS_STORE_DIR",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8081);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.bind_address(), "127.0.0.1:8081");
    assert_eq!(config.cors_allowed_origins, "*");
    assert!(config.inference.base_url.is_none());
    assert!(!config.database.is_memory());
}

#[test]
#[serial]
fn test_server_settings_from_environment() {
    clear_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("HOST", "0.0.0.0");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://coach.example.com");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.bind_address(), "0.0.0.0:9090");
    assert_eq!(config.database, DatabaseUrl::Memory);
    assert_eq!(config.cors_allowed_origins, "https://coach.example.com");
    assert!(config.summary().contains("local only"));
}

#[test]
#[serial]
fn test_invalid_port_is_config_error() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.message.contains("HTTP_PORT"));
}

#[test]
#[serial]
fn test_inference_url_is_trimmed() {
    clear_env();
    env::set_var("PHASE_INFERENCE_URL", " http://estimator.local:9000/ ");
    env::set_var("PHASE_INFERENCE_TIMEOUT_SECS", "3");

    let inference = InferenceConfig::from_env().unwrap();
    clear_env();

    assert_eq!(
        inference.base_url.as_deref(),
        Some("http://estimator.local:9000")
    );
    assert_eq!(inference.timeout, Duration::from_secs(3));
    assert_eq!(
        inference.endpoint().as_deref(),
        Some("http://estimator.local:9000/api/cycle/phase-estimate")
    );
}

#[test]
#[serial]
fn test_blank_inference_url_means_local_only() {
    clear_env();
    env::set_var("PHASE_INFERENCE_URL", "   ");

    let inference = InferenceConfig::from_env().unwrap();
    clear_env();

    assert!(inference.base_url.is_none());
    assert!(inference.endpoint().is_none());
}

#[test]
#[serial]
fn test_invalid_inference_timeout() {
    clear_env();
    env::set_var("PHASE_INFERENCE_TIMEOUT_SECS", "soon");

    let error = InferenceConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_signals_store_dir_override() {
    clear_env();
    env::set_var("SIGNALS_STORE_DIR", "/tmp/stridesafe-signals");

    let config = SignalsConfig::from_env();
    clear_env();

    assert_eq!(config.store_dir, PathBuf::from("/tmp/stridesafe-signals"));
}

#[test]
#[serial]
fn test_signals_store_dir_default_is_app_specific() {
    clear_env();

    let config = SignalsConfig::from_env();

    assert!(config.store_dir.ends_with("stridesafe"));
}
