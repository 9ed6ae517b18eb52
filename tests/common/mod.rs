// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use kea_ddns_nsd::config::HookConfig;
use kea_ddns_nsd::coordinator::UpdateCoordinator;
use kea_ddns_nsd::errors::ReloadError;
use kea_ddns_nsd::reload::ReloadTrigger;
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const FORWARD_ZONE: &str = "\
$ORIGIN home.arpa.
$TTL 3600
@\tIN\tSOA\tns1.home.arpa. hostmaster.home.arpa. (
\t\t2024010100 ;Serial
\t\t3600 ; refresh
\t\t900 ; retry
\t\t604800 ; expire
\t\t3600 ; minimum
\t\t)
@\tIN\tNS\tns1
ns1\tIN\tA\t192.168.11.1
";

pub const REVERSE_ZONE: &str = "\
$ORIGIN 11.168.192.in-addr.arpa.
$TTL 3600
@\tIN\tSOA\tns1.home.arpa. hostmaster.home.arpa. (
\t\t2024010100 ;Serial
\t\t3600 ; refresh
\t\t900 ; retry
\t\t604800 ; expire
\t\t3600 ; minimum
\t\t)
@\tIN\tNS\tns1.home.arpa.
1\tIN\tPTR\tns1.home.arpa.
";

/// Reload trigger counting calls through a shared counter.
#[derive(Clone, Default)]
pub struct CountingReload(pub Arc<AtomicUsize>);

impl CountingReload {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ReloadTrigger for CountingReload {
    fn reload(&self) -> Result<(), ReloadError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A forward/reverse zone pair in a temporary directory.
pub struct ZoneFixture {
    pub dir: TempDir,
    pub config: HookConfig,
    pub reloads: CountingReload,
}

impl ZoneFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = HookConfig {
            forward_zone: dir.path().join("home.arpa.forward"),
            reverse_zone: dir.path().join("home.arpa.reverse"),
            lock_file: dir.path().join("zone_update.lock"),
            ..HookConfig::default()
        };
        fs::write(&config.forward_zone, FORWARD_ZONE).expect("write forward zone");
        fs::write(&config.reverse_zone, REVERSE_ZONE).expect("write reverse zone");

        Self {
            dir,
            config,
            reloads: CountingReload::default(),
        }
    }

    pub fn coordinator(&self) -> UpdateCoordinator {
        UpdateCoordinator::new(self.config.clone(), Box::new(self.reloads.clone()))
    }

    pub fn forward(&self) -> String {
        fs::read_to_string(&self.config.forward_zone).expect("read forward zone")
    }

    pub fn reverse(&self) -> String {
        fs::read_to_string(&self.config.reverse_zone).expect("read reverse zone")
    }
}

/// Serial value found on the `;Serial` line of `zone`.
pub fn serial_of(zone: &str) -> u32 {
    zone.lines()
        .find_map(|line| line.trim_end().strip_suffix(";Serial"))
        .and_then(|number| number.trim().parse().ok())
        .expect("zone has a serial line")
}

/// Build a hook environment from key/value pairs.
pub fn lease_env(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Environment of a single lease event.
pub fn single_lease(hostname: &str, address: &str) -> HashMap<String, String> {
    lease_env(&[("LEASE4_HOSTNAME", hostname), ("LEASE4_ADDRESS", address)])
}
