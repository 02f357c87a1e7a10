// ABOUTME: Environment-based configuration for the StrideSafe server and CLI
// ABOUTME: Server address, database URL, remote phase inference, and signal storage settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `HTTP_PORT` | `8081` |
//! | `HOST` | `127.0.0.1` |
//! | `DATABASE_URL` | `sqlite:./data/stridesafe.db` |
//! | `PHASE_INFERENCE_URL` | unset (local estimates only) |
//! | `PHASE_INFERENCE_TIMEOUT_SECS` | `5` |
//! | `SIGNALS_STORE_DIR` | platform data dir + `stridesafe` |
//! | `CORS_ALLOWED_ORIGINS` | `*` |

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use stridesafe_core::constants::ports::DEFAULT_HTTP_PORT;
use stridesafe_core::errors::{AppError, AppResult, ErrorCode};
use tracing::info;

/// Default bind host
const DEFAULT_HOST: &str = "127.0.0.1";
/// Default `SQLite` database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/stridesafe.db";
/// Default remote inference timeout
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 5;
/// Path the remote estimator serves phase estimates on
const PHASE_ESTIMATE_PATH: &str = "/api/cycle/phase-estimate";

/// Database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse `sqlite:<path>`, `sqlite::memory:`, or a bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

/// Remote phase inference settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Base URL of the remote estimator; `None` keeps every estimate local
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS),
        }
    }
}

impl InferenceConfig {
    /// Load from `PHASE_INFERENCE_URL` and `PHASE_INFERENCE_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the timeout is not a whole number of seconds
    pub fn from_env() -> AppResult<Self> {
        let base_url = env::var("PHASE_INFERENCE_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty());
        let timeout_secs: u64 = parse_env(
            "PHASE_INFERENCE_TIMEOUT_SECS",
            &DEFAULT_INFERENCE_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Full URL of the remote phase-estimate endpoint
    #[must_use]
    pub fn endpoint(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{base}{PHASE_ESTIMATE_PATH}"))
    }
}

/// Where client-local cycle signals are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalsConfig {
    /// Directory holding the signals file
    pub store_dir: PathBuf,
}

impl SignalsConfig {
    /// Load from `SIGNALS_STORE_DIR`, falling back to the platform data directory
    #[must_use]
    pub fn from_env() -> Self {
        let store_dir = env::var("SIGNALS_STORE_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(
                || {
                    dirs::data_local_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join("stridesafe")
                },
                PathBuf::from,
            );
        Self { store_dir }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind host
    pub host: String,
    /// Database location
    pub database: DatabaseUrl,
    /// Remote phase inference
    pub inference: InferenceConfig,
    /// Comma-separated allowed origins, or `*`
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            host: DEFAULT_HOST.to_owned(),
            database: DatabaseUrl::default(),
            inference: InferenceConfig::default(),
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a numeric variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())?,
            host: env_var_or("HOST", DEFAULT_HOST),
            database: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
            inference: InferenceConfig::from_env()?,
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        Ok(config)
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// One-line summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "StrideSafe server on {} (database: {}, phase inference: {})",
            self.bind_address(),
            self.database.to_connection_string(),
            self.inference.base_url.as_deref().unwrap_or("local only"),
        )
    }
}

/// Read an environment variable with a default
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read and parse an environment variable with a default
fn parse_env<T>(key: &str, default: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env_var_or(key, default);
    raw.trim().parse().map_err(|e| {
        AppError::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid {key} value '{raw}': {e}"),
        )
    })
}
