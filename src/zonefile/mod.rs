// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flat-text zone file maintenance.
//!
//! This module keeps the A and PTR records of an NSD zone file in line with
//! the current DHCP leases. It handles:
//!
//! - Classifying zone file lines (serial, managed record, opaque text)
//! - Merging name -> value updates while preserving unrelated content
//! - Bumping the serial exactly once per change
//! - Replacing the file atomically with a `.old` backup
//!
//! # Example
//!
//! ```rust,no_run
//! use kea_ddns_nsd::reload::CommandReload;
//! use kea_ddns_nsd::zonefile::{RecordType, UpdateMapping, ZoneFileStore};
//!
//! # fn example() -> Result<(), kea_ddns_nsd::errors::ZoneFileError> {
//! let mut forwards = UpdateMapping::new();
//! forwards.insert("frodo", "192.168.11.26");
//!
//! let store = ZoneFileStore::new("/var/lib/nsd/home.arpa.forward");
//! let changed = store.update(&forwards, RecordType::A, &CommandReload::default())?;
//! # let _ = changed;
//! # Ok(())
//! # }
//! ```

pub mod line;
pub mod reconcile;
pub mod store;

pub use line::{is_record_field, RecordType, SerialDirective, ZoneLine, ZoneRecord};
pub use reconcile::{reconcile, Reconciliation, UpdateMapping};
pub use store::ZoneFileStore;
