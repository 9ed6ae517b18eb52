// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Asking the name server to re-read its zone files.
//!
//! The hook only needs to know whether a reload request succeeded. The default
//! trigger runs `nsd-control reload`; tests substitute their own trigger to
//! count reloads without a name server.

use crate::constants::{DEFAULT_RELOAD_PROGRAM, RELOAD_ARGUMENT};
use crate::errors::ReloadError;
use serde::{Deserialize, Serialize};
use std::process::Command;
use tracing::debug;

/// Something that can ask the name server to reload its zones.
pub trait ReloadTrigger {
    /// Request a reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be made or was rejected.
    fn reload(&self) -> Result<(), ReloadError>;
}

/// Reload by running an external control command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReload {
    /// Control program, e.g. `/usr/sbin/nsd-control`
    pub program: String,
    /// Arguments passed to the program
    #[serde(default = "default_reload_args")]
    pub args: Vec<String>,
}

fn default_reload_args() -> Vec<String> {
    vec![RELOAD_ARGUMENT.to_string()]
}

impl Default for CommandReload {
    fn default() -> Self {
        Self {
            program: DEFAULT_RELOAD_PROGRAM.to_string(),
            args: default_reload_args(),
        }
    }
}

impl ReloadTrigger for CommandReload {
    fn reload(&self) -> Result<(), ReloadError> {
        debug!(program = %self.program, args = ?self.args, "Requesting name server reload");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| ReloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ReloadError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
#[path = "reload_tests.rs"]
mod reload_tests;
