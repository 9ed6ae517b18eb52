// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # kea-ddns-nsd - Kea lease hook for NSD zone files
//!
//! kea-ddns-nsd is run by the Kea DHCPv4 server on lease renewal, recovery and
//! batch commit. It keeps the A records of a forward zone file and the PTR
//! records of a reverse zone file in line with the current leases, then asks
//! NSD to reload.
//!
//! ## Overview
//!
//! - Unrelated zone file content is preserved line for line
//! - The serial is bumped exactly once per change, never on a no-op
//! - Zone files are replaced atomically, keeping a `.old` backup
//! - Concurrent invocations are serialized by a lock file
//!
//! ## Modules
//!
//! - [`zonefile`] - Line classification, reconciliation and atomic persistence
//! - [`lease`] - Translating Kea hook environment variables into updates
//! - [`coordinator`] - One locked invocation across both zones
//! - [`lock`] - Cross-invocation lock file
//! - [`reload`] - Name server reload trigger
//! - [`config`] - Paths, zone suffix and static host names
//! - [`logging`] - Tracing subscriber setup, including syslog output
//!
//! ## Example
//!
//! ```rust
//! use kea_ddns_nsd::zonefile::{reconcile, RecordType, UpdateMapping};
//!
//! let zone = vec!["\t1 ;Serial".to_string()];
//! let mut forwards = UpdateMapping::new();
//! forwards.insert("frodo", "192.168.11.26");
//!
//! let result = reconcile(&zone, &forwards, RecordType::A);
//! assert!(result.changed);
//! assert_eq!(result.lines, vec!["\t2 ;Serial", "frodo\t\tIN\tA\t192.168.11.26"]);
//! ```

pub mod config;
pub mod constants;
pub mod coordinator;
pub mod errors;
pub mod lease;
pub mod lock;
pub mod logging;
pub mod reload;
pub mod zonefile;
