// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the kea-ddns-nsd hook.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Default Path Constants
// ============================================================================

/// Default forward zone file (hostname -> address)
pub const DEFAULT_FORWARD_ZONE_PATH: &str = "/var/lib/nsd/home.arpa.forward";

/// Default reverse zone file (last octet -> hostname)
pub const DEFAULT_REVERSE_ZONE_PATH: &str = "/var/lib/nsd/home.arpa.reverse";

/// Default lock file shared by every invocation of the hook
pub const DEFAULT_LOCK_FILE_PATH: &str = "/run/kea/zone_update.lock";

/// Default name-server control program
pub const DEFAULT_RELOAD_PROGRAM: &str = "/usr/sbin/nsd-control";

/// Argument passed to the control program to request a reload
pub const RELOAD_ARGUMENT: &str = "reload";

/// Default zone suffix appended to hostnames in PTR records
pub const DEFAULT_ZONE_SUFFIX: &str = "home.arpa";

/// Environment variable naming an optional YAML configuration file
pub const CONFIG_PATH_ENV: &str = "KEA_DDNS_NSD_CONFIG";

// ============================================================================
// Zone File Constants
// ============================================================================

/// Marker that terminates the serial number line of a zone file
pub const SERIAL_MARKER: &str = ";Serial";

/// Suffix of the staging file written before the live file is replaced
pub const STAGING_SUFFIX: &str = ".new";

/// Suffix of the backup file holding the previous zone contents
pub const BACKUP_SUFFIX: &str = ".old";

/// Record class accepted on managed record lines
pub const RECORD_CLASS_IN: &str = "IN";

/// Longest DNS label accepted as a hostname
pub const MAX_LABEL_LENGTH: usize = 63;

// ============================================================================
// Kea Hook Action Constants
// ============================================================================

/// Single lease renewal
pub const ACTION_LEASE4_RENEW: &str = "lease4_renew";

/// Single lease recovery (handled like a renewal)
pub const ACTION_LEASE4_RECOVER: &str = "lease4_recover";

/// Batch commit of several leases
pub const ACTION_LEASES4_COMMITTED: &str = "leases4_committed";

// ============================================================================
// Kea Hook Environment Constants
// ============================================================================

/// Hostname of a single lease
pub const ENV_LEASE4_HOSTNAME: &str = "LEASE4_HOSTNAME";

/// IPv4 address of a single lease
pub const ENV_LEASE4_ADDRESS: &str = "LEASE4_ADDRESS";

/// Hardware address of a single lease
pub const ENV_LEASE4_HWADDR: &str = "LEASE4_HWADDR";

/// Number of leases in a batch commit
pub const ENV_LEASES4_SIZE: &str = "LEASES4_SIZE";

/// Prefix of per-index batch variables (`LEASES4_AT0_ADDRESS`, ...)
pub const ENV_LEASES4_AT_PREFIX: &str = "LEASES4_AT";

/// Upper bound on the leases read from one batch commit
pub const MAX_BATCH_LEASES: usize = 1024;

// ============================================================================
// Logging Constants
// ============================================================================

/// Syslog datagram socket
pub const SYSLOG_SOCKET_PATH: &str = "/dev/log";

/// Tag attached to every syslog message
pub const SYSLOG_TAG: &str = "kea-ddns-nsd";

/// Syslog facility `user`
pub const SYSLOG_FACILITY_USER: u8 = 1;
