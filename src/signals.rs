// ABOUTME: Storage for client-local cycle signals behind a load/save repository interface
// ABOUTME: In-memory backend for tests and a single-JSON-file backend for the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Cycle signals never leave the athlete's device. The phase engine takes
//! signals as an argument; loading and saving them is the caller's job.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use stridesafe_core::constants::cycle::SIGNALS_STORAGE_KEY;
use stridesafe_core::errors::{AppError, AppResult};
use stridesafe_core::models::CycleSignals;
use tracing::{debug, warn};

/// Load/save access to the athlete's cycle signals
pub trait SignalsRepository: Send + Sync {
    /// Current signals; defaults when nothing has been saved
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn load(&self) -> AppResult<CycleSignals>;

    /// Replace the stored signals
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written
    fn save(&self, signals: &CycleSignals) -> AppResult<()>;
}

/// Process-local repository
#[derive(Debug, Default)]
pub struct InMemorySignalsRepository {
    signals: Mutex<Option<CycleSignals>>,
}

impl InMemorySignalsRepository {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalsRepository for InMemorySignalsRepository {
    fn load(&self) -> AppResult<CycleSignals> {
        let guard = self
            .signals
            .lock()
            .map_err(|e| AppError::internal(format!("Signals lock poisoned: {e}")))?;
        Ok(guard.clone().unwrap_or_default())
    }

    fn save(&self, signals: &CycleSignals) -> AppResult<()> {
        let mut guard = self
            .signals
            .lock()
            .map_err(|e| AppError::internal(format!("Signals lock poisoned: {e}")))?;
        *guard = Some(signals.clone());
        Ok(())
    }
}

/// Repository keeping one JSON file inside a directory
#[derive(Debug, Clone)]
pub struct FileSignalsRepository {
    path: PathBuf,
}

impl FileSignalsRepository {
    /// Repository storing `stridesafe.phase_signals.v1.json` in `dir`
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SIGNALS_STORAGE_KEY}.json")),
        }
    }

    /// Full path of the signals file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalsRepository for FileSignalsRepository {
    fn load(&self) -> AppResult<CycleSignals> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored signals, using defaults");
                return Ok(CycleSignals::default());
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        // A corrupt file must not lock the athlete out of estimates
        match serde_json::from_str(&contents) {
            Ok(signals) => Ok(signals),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Stored signals unreadable, using defaults");
                Ok(CycleSignals::default())
            }
        }
    }

    fn save(&self, signals: &CycleSignals) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::storage(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(signals)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| AppError::storage(format!("Failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::storage(format!("Failed to replace {}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), "Saved signals");
        Ok(())
    }
}
