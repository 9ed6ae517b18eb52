// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Translating Kea lease hook events into zone updates.
//!
//! Kea's `run_script` hook passes lease data through environment variables:
//!
//! - single lease events: `LEASE4_HOSTNAME`, `LEASE4_ADDRESS`, `LEASE4_HWADDR`
//! - batch commits: `LEASES4_SIZE` plus `LEASES4_AT<i>_HOSTNAME`,
//!   `LEASES4_AT<i>_ADDRESS` and `LEASES4_AT<i>_HWADDR` for each index
//!
//! Each usable lease yields one forward entry (`hostname -> address`) and one
//! reverse entry (`last octet -> hostname.zone.`). Leases without an address
//! are skipped with a warning; the rest of the batch is still applied.
//!
//! Client hostnames are lowercased and must be a single DNS label made of
//! letters, digits and `-`. A client name that is not falls back to the
//! hardware address, exactly as if the client had sent none.

use crate::config::HookConfig;
use crate::constants::{
    ACTION_LEASE4_RECOVER, ACTION_LEASE4_RENEW, ACTION_LEASES4_COMMITTED, ENV_LEASE4_ADDRESS,
    ENV_LEASE4_HOSTNAME, ENV_LEASE4_HWADDR, ENV_LEASES4_AT_PREFIX, ENV_LEASES4_SIZE,
    MAX_BATCH_LEASES, MAX_LABEL_LENGTH,
};
use crate::errors::UnknownActionError;
use crate::zonefile::UpdateMapping;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::{info, warn};

/// Hook actions handled by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseAction {
    /// `lease4_renew`
    Renew,
    /// `lease4_recover`, handled exactly like a renewal
    Recover,
    /// `leases4_committed`
    Committed,
}

impl LeaseAction {
    /// Hook name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Renew => ACTION_LEASE4_RENEW,
            Self::Recover => ACTION_LEASE4_RECOVER,
            Self::Committed => ACTION_LEASES4_COMMITTED,
        }
    }
}

impl fmt::Display for LeaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaseAction {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ACTION_LEASE4_RENEW => Ok(Self::Renew),
            ACTION_LEASE4_RECOVER => Ok(Self::Recover),
            ACTION_LEASES4_COMMITTED => Ok(Self::Committed),
            other => Err(UnknownActionError(other.to_string())),
        }
    }
}

/// Read-only view of the variables Kea sets for the hook.
pub trait LeaseEnvironment {
    /// Value of `key`, or `None` if unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl LeaseEnvironment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl LeaseEnvironment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Forward and reverse zone updates derived from one hook event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaseUpdates {
    /// hostname -> IPv4 address
    pub forward: UpdateMapping,
    /// last octet -> PTR target
    pub reverse: UpdateMapping,
}

impl LeaseUpdates {
    /// Whether the event produced no updates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}

/// Raw lease variables as Kea supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LeaseRecord {
    hostname: Option<String>,
    address: Option<String>,
    hwaddr: Option<String>,
}

impl LeaseRecord {
    fn single(env: &dyn LeaseEnvironment) -> Self {
        Self {
            hostname: env.var(ENV_LEASE4_HOSTNAME),
            address: env.var(ENV_LEASE4_ADDRESS),
            hwaddr: env.var(ENV_LEASE4_HWADDR),
        }
    }

    fn indexed(env: &dyn LeaseEnvironment, index: usize) -> Self {
        let key = |field: &str| format!("{ENV_LEASES4_AT_PREFIX}{index}_{field}");
        Self {
            hostname: env.var(&key("HOSTNAME")),
            address: env.var(&key("ADDRESS")),
            hwaddr: env.var(&key("HWADDR")),
        }
    }
}

/// Builds zone updates from hook events.
#[derive(Debug, Clone, Copy)]
pub struct LeaseEventAdapter<'a> {
    config: &'a HookConfig,
}

impl<'a> LeaseEventAdapter<'a> {
    /// Create an adapter using the zone suffix and static hosts of `config`.
    #[must_use]
    pub const fn new(config: &'a HookConfig) -> Self {
        Self { config }
    }

    /// Derive the updates for `action` from `env`.
    #[must_use]
    pub fn adapt(&self, action: LeaseAction, env: &dyn LeaseEnvironment) -> LeaseUpdates {
        let mut updates = LeaseUpdates::default();

        match action {
            LeaseAction::Renew | LeaseAction::Recover => {
                self.add_lease(&LeaseRecord::single(env), true, &mut updates);
            }
            LeaseAction::Committed => {
                let Some(count) = lease_count(env) else {
                    return updates;
                };
                for index in 0..count {
                    self.add_lease(
                        &LeaseRecord::indexed(env, index),
                        self.config.qualify_batch_ptr,
                        &mut updates,
                    );
                }
            }
        }

        updates
    }

    fn add_lease(&self, lease: &LeaseRecord, qualify: bool, updates: &mut LeaseUpdates) {
        let Some(address) = lease.address.as_deref().map(str::trim).filter(|a| !a.is_empty())
        else {
            warn!("No IP address specified in lease");
            return;
        };

        let ip = match address.parse::<Ipv4Addr>() {
            Ok(ip) => ip,
            Err(e) => {
                warn!(address = %address, "Ignoring lease with invalid IPv4 address: {}", e);
                return;
            }
        };

        let Some(hostname) = self.clean_hostname(
            lease.hostname.as_deref().unwrap_or_default(),
            lease.hwaddr.as_deref().unwrap_or_default(),
        ) else {
            warn!(address = %ip, "No usable hostname or hardware address in lease");
            return;
        };

        info!("{} -> {}", hostname, ip);

        let target = if qualify {
            self.config.fqdn(&hostname)
        } else {
            hostname.clone()
        };
        updates.reverse.insert(reverse_key(ip), target);
        updates.forward.insert(hostname, ip.to_string());
    }

    /// Zone-local hostname for a lease.
    ///
    /// A client-supplied name is cut down to its first label and lowercased.
    /// Without a valid one the hardware address stands in, with `:` replaced
    /// by `_`, unless a static name is configured for it.
    fn clean_hostname(&self, hostname: &str, hwaddr: &str) -> Option<String> {
        let hostname = hostname.trim();
        let first_label = hostname.split('.').next().unwrap_or_default();
        if is_label(first_label, false) {
            return Some(first_label.to_ascii_lowercase());
        }
        if !first_label.is_empty() {
            warn!(
                hostname = %hostname,
                "Ignoring client hostname that is not a valid DNS label"
            );
        }

        let hwaddr = hwaddr.trim();
        if hwaddr.is_empty() {
            return None;
        }
        let synthesized = hwaddr.replace(':', "_").to_ascii_lowercase();
        if let Some(name) = self.config.static_hostname(&synthesized) {
            return Some(name.to_string());
        }
        if !is_label(&synthesized, true) {
            warn!(
                hwaddr = %hwaddr,
                "Ignoring hardware address that cannot form a hostname"
            );
            return None;
        }
        Some(synthesized)
    }
}

/// Whether `label` is one DNS label of letters, digits and `-`, plus `_`
/// when `allow_underscore` is set.
fn is_label(label: &str, allow_underscore: bool) -> bool {
    (1..=MAX_LABEL_LENGTH).contains(&label.len())
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || (allow_underscore && b == b'_'))
}

/// Reverse zone owner name for `ip`: its last octet.
#[must_use]
pub fn reverse_key(ip: Ipv4Addr) -> String {
    ip.octets()[3].to_string()
}

fn lease_count(env: &dyn LeaseEnvironment) -> Option<usize> {
    let Some(raw) = env.var(ENV_LEASES4_SIZE) else {
        warn!("No {} specified in batch commit", ENV_LEASES4_SIZE);
        return None;
    };
    match raw.trim().parse::<usize>() {
        Ok(count) if count > MAX_BATCH_LEASES => {
            warn!(
                count,
                "{} exceeds {}, reading only the first {}",
                ENV_LEASES4_SIZE,
                MAX_BATCH_LEASES,
                MAX_BATCH_LEASES
            );
            Some(MAX_BATCH_LEASES)
        }
        Ok(count) => Some(count),
        Err(e) => {
            warn!(value = %raw, "Invalid {}: {}", ENV_LEASES4_SIZE, e);
            None
        }
    }
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod lease_tests;
