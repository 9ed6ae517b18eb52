// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Top-level orchestration of one hook invocation.
//!
//! # Flow
//!
//! 1. Take the zone update lock (blocking)
//! 2. Parse the action and derive forward/reverse updates from the environment
//! 3. Update the forward zone (A records), persisting and reloading on change
//! 4. Update the reverse zone (PTR records), likewise
//!
//! A failure in one zone is logged and does not stop the other. Only lock
//! failure aborts the invocation, before any zone is read.

use crate::config::HookConfig;
use crate::errors::HookError;
use crate::lease::{LeaseAction, LeaseEnvironment, LeaseEventAdapter};
use crate::lock::ZoneLock;
use crate::reload::ReloadTrigger;
use crate::zonefile::{RecordType, UpdateMapping, ZoneFileStore};
use tracing::{debug, error, info, warn};

/// Outcome of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// The action that was handled, `None` if missing or unknown
    pub action: Option<LeaseAction>,
    /// The forward zone file was rewritten
    pub forward_changed: bool,
    /// The reverse zone file was rewritten
    pub reverse_changed: bool,
}

/// Runs hook invocations against one forward/reverse zone pair.
pub struct UpdateCoordinator {
    config: HookConfig,
    reload: Box<dyn ReloadTrigger + Send>,
}

impl UpdateCoordinator {
    /// Create a coordinator for the zones named in `config`.
    #[must_use]
    pub fn new(config: HookConfig, reload: Box<dyn ReloadTrigger + Send>) -> Self {
        Self { config, reload }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Handle one hook invocation.
    ///
    /// A missing or unknown `action` is logged and leaves both zones alone.
    ///
    /// # Errors
    ///
    /// Returns an error only if the lock cannot be acquired.
    pub fn run(
        &self,
        action: Option<&str>,
        env: &dyn LeaseEnvironment,
    ) -> Result<RunSummary, HookError> {
        let _lock = ZoneLock::acquire(&self.config.lock_file)?;

        let Some(action) = action else {
            warn!("No action specified");
            return Ok(RunSummary::default());
        };

        let action = match action.parse::<LeaseAction>() {
            Ok(action) => action,
            Err(e) => {
                warn!("{}", e);
                return Ok(RunSummary::default());
            }
        };

        info!(action = %action, "Handling lease event");
        let updates = LeaseEventAdapter::new(&self.config).adapt(action, env);
        if updates.is_empty() {
            debug!(action = %action, "Lease event produced no zone updates");
        }

        let forward = ZoneFileStore::new(&self.config.forward_zone);
        let reverse = ZoneFileStore::new(&self.config.reverse_zone);

        Ok(RunSummary {
            action: Some(action),
            forward_changed: self.update_zone(&forward, &updates.forward, RecordType::A),
            reverse_changed: self.update_zone(&reverse, &updates.reverse, RecordType::Ptr),
        })
    }

    fn update_zone(
        &self,
        store: &ZoneFileStore,
        mapping: &UpdateMapping,
        record_type: RecordType,
    ) -> bool {
        if mapping.is_empty() {
            return false;
        }

        match store.update(mapping, record_type, self.reload.as_ref()) {
            Ok(changed) => changed,
            Err(e) => {
                error!(zone = %store.path().display(), "Failed to update zone: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
