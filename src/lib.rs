// ABOUTME: Main library entry point for the StrideSafe movement-safety backend
// ABOUTME: HTTP API, SQLite persistence, phase service, and client-local signal storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # StrideSafe Server
//!
//! Backend for athlete movement-safety and rehab tracking. Coaches record
//! drop-jump and cutting assessments scored by an external model; the server
//! stores them and serves one normalized view of each. Athletes get an
//! offline-first menstrual cycle phase estimate and the training adjustments
//! it implies.
//!
//! ## Architecture
//!
//! - **`stridesafe-core`**: errors, constants, and data models
//! - **`stridesafe-intelligence`**: the pure engines (normalizer, phase policy,
//!   risk snapshot, limb symmetry)
//! - **This crate**: configuration, logging, database, HTTP routes, the phase
//!   service with its optional remote estimator, and the signal repositories
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use stridesafe_server::config::ServerConfig;
//! use stridesafe_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("StrideSafe configured on {}", config.bind_address());
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// `SQLite` persistence
pub mod database;

/// Remote phase estimator seam
pub mod inference;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (tracing, CORS)
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Domain services
pub mod services;

/// Client-local cycle signal storage
pub mod signals;

pub use stridesafe_core::{constants, errors, models};
