// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end tests for the lease hook.
//!
//! These tests drive `UpdateCoordinator` and the compiled binary against zone
//! files in a temporary directory. No name server is needed: reloads are
//! counted, or replaced by `true` for the binary.
//!
//! Run with: cargo test --test lease_hook_integration

mod common;

use common::{lease_env, serial_of, single_lease, ZoneFixture, FORWARD_ZONE, REVERSE_ZONE};
use std::fs;
use std::process::Command;
use std::thread;

#[test]
fn test_renew_end_to_end() {
    let fixture = ZoneFixture::new();

    let summary = fixture
        .coordinator()
        .run(
            Some("lease4_renew"),
            &single_lease("frodo", "192.168.11.26"),
        )
        .unwrap();

    assert!(summary.forward_changed);
    assert!(summary.reverse_changed);

    let forward = fixture.forward();
    let reverse = fixture.reverse();
    assert!(forward.ends_with("frodo\t\tIN\tA\t192.168.11.26\n"));
    assert!(reverse.ends_with("26\t\tIN\tPTR\tfrodo.home.arpa.\n"));
    assert_eq!(serial_of(&forward), 2_024_010_101);
    assert_eq!(serial_of(&reverse), 2_024_010_101);

    // Exactly one reload per modified zone
    assert_eq!(fixture.reloads.count(), 2);

    // Previous versions are kept as backups
    let backup = fs::read_to_string(fixture.config.forward_zone.with_extension("forward.old"))
        .unwrap();
    assert_eq!(backup, FORWARD_ZONE);
}

#[test]
fn test_unrelated_content_survives() {
    let fixture = ZoneFixture::new();

    fixture
        .coordinator()
        .run(
            Some("lease4_renew"),
            &single_lease("frodo", "192.168.11.26"),
        )
        .unwrap();

    let expected_forward = FORWARD_ZONE.replace("2024010100 ;Serial", "2024010101 ;Serial")
        + "frodo\t\tIN\tA\t192.168.11.26\n";
    assert_eq!(fixture.forward(), expected_forward);

    let expected_reverse = REVERSE_ZONE.replace("2024010100 ;Serial", "2024010101 ;Serial")
        + "26\t\tIN\tPTR\tfrodo.home.arpa.\n";
    assert_eq!(fixture.reverse(), expected_reverse);
}

#[test]
fn test_repeated_renewal_is_idempotent() {
    let fixture = ZoneFixture::new();
    let coordinator = fixture.coordinator();
    let env = single_lease("frodo", "192.168.11.26");

    coordinator.run(Some("lease4_renew"), &env).unwrap();
    let forward = fixture.forward();
    let reverse = fixture.reverse();

    let summary = coordinator.run(Some("lease4_recover"), &env).unwrap();

    assert!(!summary.forward_changed);
    assert!(!summary.reverse_changed);
    assert_eq!(fixture.forward(), forward);
    assert_eq!(fixture.reverse(), reverse);
    assert_eq!(fixture.reloads.count(), 2);
}

#[test]
fn test_host_moving_address_cleans_up_old_records() {
    let fixture = ZoneFixture::new();
    let coordinator = fixture.coordinator();

    coordinator
        .run(
            Some("lease4_renew"),
            &single_lease("frodo", "192.168.11.26"),
        )
        .unwrap();
    // sam takes over .26, frodo moves to .30
    coordinator
        .run(Some("lease4_renew"), &single_lease("sam", "192.168.11.26"))
        .unwrap();
    coordinator
        .run(
            Some("lease4_renew"),
            &single_lease("frodo", "192.168.11.30"),
        )
        .unwrap();

    let forward = fixture.forward();
    assert!(forward.contains("sam\t\tIN\tA\t192.168.11.26"));
    assert!(forward.contains("frodo\t\tIN\tA\t192.168.11.30"));
    assert_eq!(forward.matches("192.168.11.26").count(), 1);

    let reverse = fixture.reverse();
    assert!(reverse.contains("26\t\tIN\tPTR\tsam.home.arpa."));
    assert!(reverse.contains("30\t\tIN\tPTR\tfrodo.home.arpa."));
    assert_eq!(reverse.matches("frodo.home.arpa.").count(), 1);

    // Three runs, each changing both zones
    assert_eq!(serial_of(&forward), 2_024_010_103);
    assert_eq!(serial_of(&reverse), 2_024_010_103);
}

#[test]
fn test_batch_commit_skips_incomplete_leases() {
    let fixture = ZoneFixture::new();
    let env = lease_env(&[
        ("LEASES4_SIZE", "3"),
        ("LEASES4_AT0_HOSTNAME", "frodo"),
        ("LEASES4_AT0_ADDRESS", "192.168.11.26"),
        ("LEASES4_AT1_HOSTNAME", "gollum"),
        ("LEASES4_AT2_HOSTNAME", "sam.shire"),
        ("LEASES4_AT2_ADDRESS", "192.168.11.27"),
    ]);

    let summary = fixture
        .coordinator()
        .run(Some("leases4_committed"), &env)
        .unwrap();

    assert!(summary.forward_changed);
    assert!(summary.reverse_changed);
    let forward = fixture.forward();
    assert!(forward.contains("frodo\t\tIN\tA\t192.168.11.26"));
    assert!(forward.contains("sam\t\tIN\tA\t192.168.11.27"));
    assert!(!forward.contains("gollum"));
    assert!(fixture.reverse().contains("27\t\tIN\tPTR\tsam.home.arpa."));
    assert_eq!(serial_of(&forward), 2_024_010_101);
}

#[test]
fn test_concurrent_invocations_are_serialized() {
    let fixture = ZoneFixture::new();
    let hosts: Vec<(String, String)> = (0..8)
        .map(|i| (format!("host{i}"), format!("192.168.11.{}", 100 + i)))
        .collect();

    thread::scope(|scope| {
        for (hostname, address) in &hosts {
            let coordinator = fixture.coordinator();
            scope.spawn(move || {
                coordinator
                    .run(Some("lease4_renew"), &single_lease(hostname, address))
                    .unwrap();
            });
        }
    });

    // No lost updates: every host present, one serial bump per invocation
    let forward = fixture.forward();
    for (hostname, address) in &hosts {
        assert!(forward.contains(&format!("{hostname}\t\tIN\tA\t{address}")));
    }
    assert_eq!(serial_of(&forward), 2_024_010_108);
    assert_eq!(serial_of(&fixture.reverse()), 2_024_010_108);
    assert_eq!(fixture.reloads.count(), 16);
}

#[test]
fn test_binary_runs_renew_hook() {
    let fixture = ZoneFixture::new();
    let config_path = fixture.dir.path().join("kea-ddns-nsd.yaml");
    fs::write(
        &config_path,
        format!(
            "forwardZone: {}\nreverseZone: {}\nlockFile: {}\nreloadCommand:\n  program: \"true\"\n",
            fixture.config.forward_zone.display(),
            fixture.config.reverse_zone.display(),
            fixture.config.lock_file.display(),
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_kea-ddns-nsd"))
        .arg("lease4_renew")
        .env("KEA_DDNS_NSD_CONFIG", &config_path)
        .env("LEASE4_HOSTNAME", "frodo")
        .env("LEASE4_ADDRESS", "192.168.11.26")
        .env("LEASE4_HWADDR", "aa:bb:cc:dd:ee:ff")
        .env("RUST_LOG_FORMAT", "text")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "hook failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(fixture
        .forward()
        .contains("frodo\t\tIN\tA\t192.168.11.26"));
    assert!(fixture
        .reverse()
        .contains("26\t\tIN\tPTR\tfrodo.home.arpa."));
}

#[test]
fn test_binary_ignores_unknown_action() {
    let fixture = ZoneFixture::new();

    let output = Command::new(env!("CARGO_BIN_EXE_kea-ddns-nsd"))
        .arg("--forward-zone")
        .arg(&fixture.config.forward_zone)
        .arg("--reverse-zone")
        .arg(&fixture.config.reverse_zone)
        .arg("--lock-file")
        .arg(&fixture.config.lock_file)
        .arg("lease4_expire")
        .env_remove("KEA_DDNS_NSD_CONFIG")
        .env("LEASE4_HOSTNAME", "frodo")
        .env("LEASE4_ADDRESS", "192.168.11.26")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(fixture.forward(), FORWARD_ZONE);
    assert_eq!(fixture.reverse(), REVERSE_ZONE);
}

#[test]
fn test_binary_fails_when_lock_unavailable() {
    let fixture = ZoneFixture::new();

    let output = Command::new(env!("CARGO_BIN_EXE_kea-ddns-nsd"))
        .arg("--forward-zone")
        .arg(&fixture.config.forward_zone)
        .arg("--reverse-zone")
        .arg(&fixture.config.reverse_zone)
        .arg("--lock-file")
        .arg(fixture.dir.path().join("missing").join("zone_update.lock"))
        .arg("lease4_renew")
        .env_remove("KEA_DDNS_NSD_CONFIG")
        .env("LEASE4_HOSTNAME", "frodo")
        .env("LEASE4_ADDRESS", "192.168.11.26")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(fixture.forward(), FORWARD_ZONE);
}
