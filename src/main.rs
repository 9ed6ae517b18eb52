// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use kea_ddns_nsd::{
    config::HookConfig, constants::CONFIG_PATH_ENV, coordinator::UpdateCoordinator,
    lease::ProcessEnvironment, logging::init_tracing,
};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Keep NSD forward and reverse zone files in sync with Kea DHCPv4 leases.
///
/// Meant to be run by Kea's `run_script` hook, which passes the hook point
/// name as the only argument and the lease data in the environment.
#[derive(Debug, Parser)]
#[command(name = "kea-ddns-nsd", version, about)]
struct Cli {
    /// Hook point: lease4_renew, lease4_recover or leases4_committed
    action: Option<String>,

    /// YAML configuration file
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Forward zone file, overriding the configuration
    #[arg(long)]
    forward_zone: Option<PathBuf>,

    /// Reverse zone file, overriding the configuration
    #[arg(long)]
    reverse_zone: Option<PathBuf>,

    /// Lock file, overriding the configuration
    #[arg(long)]
    lock_file: Option<PathBuf>,

    /// Zone suffix for PTR targets, overriding the configuration
    #[arg(long)]
    zone_suffix: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut HookConfig) {
        if let Some(path) = &self.forward_zone {
            config.forward_zone.clone_from(path);
        }
        if let Some(path) = &self.reverse_zone {
            config.reverse_zone.clone_from(path);
        }
        if let Some(path) = &self.lock_file {
            config.lock_file.clone_from(path);
        }
        if let Some(suffix) = &self.zone_suffix {
            config.zone_suffix.clone_from(suffix);
        }
    }
}

fn main() -> Result<()> {
    // Format and filter follow RUST_LOG_FORMAT and RUST_LOG
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli, "Parsed command line");

    let mut config = HookConfig::load(cli.config.as_deref())
        .inspect_err(|e| error!("{}", e))
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    let reload = Box::new(config.reload_command.clone());
    let coordinator = UpdateCoordinator::new(config, reload);

    match coordinator.run(cli.action.as_deref(), &ProcessEnvironment) {
        Ok(summary) => {
            info!(
                forward_changed = summary.forward_changed,
                reverse_changed = summary.reverse_changed,
                "Lease hook finished"
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to acquire lock: {}", e);
            Err(e).context("Zone update aborted")
        }
    }
}
