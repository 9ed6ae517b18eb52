// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cross-invocation lock serializing zone updates.
//!
//! Kea may run several hook processes at once. Every invocation takes an
//! exclusive `flock` on one shared lock file before reading either zone file
//! and holds it until it exits, so read-modify-write-reload cycles never
//! interleave. Acquisition blocks without a timeout.

use crate::errors::LockError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Held exclusive lock; released on drop.
#[derive(Debug)]
pub struct ZoneLock {
    file: File,
    path: PathBuf,
}

impl ZoneLock {
    /// Open (creating if needed) and exclusively lock `path`, blocking until
    /// any other holder releases it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or locked.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| LockError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "Waiting for zone update lock");
        file.lock().map_err(|source| LockError::Acquire {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Zone update lock acquired");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ZoneLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!(path = %self.path.display(), "Failed to release zone update lock: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod lock_tests;
