// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the kea-ddns-nsd hook.
//!
//! This module provides specialized error types for:
//! - Reading and atomically replacing zone files
//! - Acquiring the cross-invocation lock
//! - Triggering the name-server reload
//! - Loading the hook configuration
//!
//! Only lock and configuration failures are fatal to an invocation. Everything
//! else is logged where it happens and processing moves on to the next zone.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or replacing a zone file.
///
/// Every variant carries the path involved so the log line alone is enough
/// to find the file on disk.
#[derive(Error, Debug)]
pub enum ZoneFileError {
    /// The live zone file could not be read
    #[error("Failed to read zone file {}: {source}", .path.display())]
    Read {
        /// Zone file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The staging file could not be created or written
    ///
    /// The live zone file is untouched when this is returned.
    #[error("Failed to write staging file {}: {source}", .path.display())]
    WriteStaging {
        /// Staging file path (`<zone>.new`)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A stale staging or backup file from an earlier run could not be removed
    ///
    /// The live zone file is untouched when this is returned.
    #[error("Failed to remove stale file {}: {source}", .path.display())]
    RemoveStale {
        /// Path of the stale file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A rename in the backup rotation failed
    #[error("Failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the cross-invocation lock file.
#[derive(Error, Debug)]
pub enum LockError {
    /// The lock file could not be opened or created (typically permission denied)
    #[error("Failed to open lock file {}: {source}", .path.display())]
    Open {
        /// Lock file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The exclusive lock could not be taken
    #[error("Failed to lock {}: {source}", .path.display())]
    Acquire {
        /// Lock file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a reload trigger.
///
/// Reload failures never undo a zone file replacement; callers log them and
/// carry on.
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The control program could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that was executed
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The control program ran but reported failure
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        /// Program that was executed
        program: String,
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },
}

/// Errors raised while loading the hook configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        /// Configuration file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`crate::config::HookConfig`]
    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        /// Configuration file path
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },
}

/// A hook action name the hook does not handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Action {0} ignored")]
pub struct UnknownActionError(pub String);

/// Top-level error returned by [`crate::coordinator::UpdateCoordinator::run`].
///
/// Only conditions that must stop the invocation surface here.
#[derive(Error, Debug)]
pub enum HookError {
    /// Lock acquisition failed, no zone was touched
    #[error(transparent)]
    Lock(#[from] LockError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
