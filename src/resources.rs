// ABOUTME: Shared resource container handed to every route handler
// ABOUTME: Holds the database, the phase service, and the loaded configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and shared as `Arc<ServerResources>` router state.

use crate::config::ServerConfig;
use crate::database::Database;
use crate::services::PhaseService;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Assessment and phase label storage
    pub database: Arc<Database>,
    /// Phase estimate resolution
    pub phase_service: Arc<PhaseService>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources
    #[must_use]
    pub fn new(database: Database, phase_service: PhaseService, config: Arc<ServerConfig>) -> Self {
        Self {
            database: Arc::new(database),
            phase_service: Arc::new(phase_service),
            config,
        }
    }
}
