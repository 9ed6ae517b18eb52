// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hook configuration.
//!
//! Every setting has a built-in default matching a stock NSD + Kea install, so
//! the hook runs without any configuration file. A YAML file can override any
//! subset of the fields:
//!
//! ```yaml
//! forwardZone: /var/lib/nsd/home.arpa.forward
//! reverseZone: /var/lib/nsd/home.arpa.reverse
//! lockFile: /run/kea/zone_update.lock
//! zoneSuffix: home.arpa
//! qualifyBatchPtr: true
//! reloadCommand:
//!   program: /usr/sbin/nsd-control
//!   args: [reload]
//! staticHosts:
//!   "24:46:c8:8b:bb:f1": motoG7
//! ```

use crate::constants::{
    DEFAULT_FORWARD_ZONE_PATH, DEFAULT_LOCK_FILE_PATH, DEFAULT_REVERSE_ZONE_PATH,
    DEFAULT_ZONE_SUFFIX,
};
use crate::errors::ConfigError;
use crate::reload::CommandReload;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Settings for one forward/reverse zone pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HookConfig {
    /// Forward zone file (A records)
    pub forward_zone: PathBuf,

    /// Reverse zone file (PTR records)
    pub reverse_zone: PathBuf,

    /// Lock file serializing all invocations against this zone pair
    pub lock_file: PathBuf,

    /// Command run after a zone file is replaced
    pub reload_command: CommandReload,

    /// Domain appended to hostnames in PTR targets, without trailing dot
    pub zone_suffix: String,

    /// Whether batch commits write fully qualified PTR targets.
    ///
    /// Single-lease events always qualify the target. When this is `false`,
    /// batch commits write the bare hostname instead.
    pub qualify_batch_ptr: bool,

    /// Names for clients that never send a hostname, keyed by hardware address.
    ///
    /// Keys may use `:` or `_` separators and any letter case.
    pub static_hosts: BTreeMap<String, String>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            forward_zone: PathBuf::from(DEFAULT_FORWARD_ZONE_PATH),
            reverse_zone: PathBuf::from(DEFAULT_REVERSE_ZONE_PATH),
            lock_file: PathBuf::from(DEFAULT_LOCK_FILE_PATH),
            reload_command: CommandReload::default(),
            zone_suffix: DEFAULT_ZONE_SUFFIX.to_string(),
            qualify_batch_ptr: true,
            static_hosts: BTreeMap::new(),
        }
    }
}

impl HookConfig {
    /// Load configuration from a YAML file, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fully qualified name for `hostname` in this zone, with trailing dot.
    #[must_use]
    pub fn fqdn(&self, hostname: &str) -> String {
        let suffix = self.zone_suffix.trim_matches('.');
        if suffix.is_empty() {
            format!("{hostname}.")
        } else {
            format!("{hostname}.{suffix}.")
        }
    }

    /// Configured name for a hardware-address derived hostname such as
    /// `24_46_c8_8b_bb_f1`.
    #[must_use]
    pub fn static_hostname(&self, synthesized: &str) -> Option<&str> {
        let wanted = normalize_hwaddr(synthesized);
        self.static_hosts
            .iter()
            .find(|(hwaddr, _)| normalize_hwaddr(hwaddr) == wanted)
            .map(|(_, name)| name.as_str())
    }
}

fn normalize_hwaddr(hwaddr: &str) -> String {
    hwaddr.replace(':', "_").to_ascii_lowercase()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
