// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Merging lease-derived updates into the lines of a zone file.
//!
//! # Merge rules
//!
//! Lines are processed in their original order:
//!
//! 1. A record whose name is in the mapping is rewritten to the mapped value
//!    (or kept when it already matches) and the entry is marked applied.
//! 2. A later record with an already applied name is a duplicate and dropped.
//! 3. A record whose name is not in the mapping but whose value is claimed by
//!    some mapped name is stale and dropped.
//! 4. Everything else is kept verbatim.
//!
//! Entries never matched are appended at the end in mapping order. The serial
//! line keeps its position and is bumped by one only when the pass changed
//! something, so applying the same mapping twice leaves the file alone.
//!
//! Owner names and values are compared ignoring ASCII case, as DNS does.
//! Entries whose name or value could not be written back as a single record
//! field are skipped with a warning.

use super::line::{is_record_field, RecordType, SerialDirective, ZoneLine, ZoneRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Insertion-ordered mapping from record name to desired value.
///
/// Re-inserting a name replaces its value but keeps its original position,
/// which is the order new records are appended in. Names differing only in
/// ASCII case are the same name; the first spelling is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl UpdateMapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let key = name.to_ascii_lowercase();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    /// Desired value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name)
            .map(|position| self.entries[position].1.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    /// Number of names in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping holds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for UpdateMapping {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (name, value) in iter {
            mapping.insert(name, value);
        }
        mapping
    }
}

/// Merge state of one mapping entry during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState<'a> {
    /// No existing record matched yet; holds the desired value
    Pending(&'a str),
    /// An existing record was rewritten or confirmed
    Applied,
    /// Name or value cannot be rendered as a record field; never written
    Rejected,
}

/// Result of merging a mapping into a zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Lines of the merged zone file
    pub lines: Vec<String>,
    /// Whether any record line was rewritten, dropped or appended
    pub changed: bool,
    /// Serial value present in `lines`, if the file has a serial line
    pub serial: Option<u32>,
}

/// Merge `mapping` into the `lines` of a zone file.
///
/// `record_type` is the type written for appended records: A in the forward
/// zone, PTR in the reverse zone. Rewritten records keep their own type.
pub fn reconcile<S: AsRef<str>>(
    lines: &[S],
    mapping: &UpdateMapping,
    record_type: RecordType,
) -> Reconciliation {
    let mut states: Vec<EntryState<'_>> = mapping
        .iter()
        .map(|(name, value)| {
            if is_record_field(name) && is_record_field(value) {
                EntryState::Pending(value)
            } else {
                warn!(
                    name = %name,
                    value = %value,
                    "Skipping update that is not a valid record field"
                );
                EntryState::Rejected
            }
        })
        .collect();
    let collisions: HashSet<String> = mapping
        .iter()
        .zip(&states)
        .filter(|(_, state)| **state != EntryState::Rejected)
        .map(|((_, value), _)| value.to_ascii_lowercase())
        .collect();

    let mut output = Vec::with_capacity(lines.len() + mapping.len());
    let mut serial: Option<(usize, SerialDirective)> = None;
    let mut changed = false;

    for raw in lines {
        let raw = raw.as_ref();
        match ZoneLine::classify(raw) {
            ZoneLine::Serial(directive) if serial.is_none() => {
                serial = Some((output.len(), directive));
                output.push(raw.to_string());
            }
            ZoneLine::Record(record) => match mapping.position(&record.name) {
                Some(position) => match states[position] {
                    EntryState::Rejected => output.push(raw.to_string()),
                    EntryState::Applied => {
                        debug!(name = %record.name, "Dropping duplicate record");
                        changed = true;
                    }
                    EntryState::Pending(value) => {
                        if record.value == value {
                            output.push(raw.to_string());
                        } else {
                            debug!(
                                name = %record.name,
                                old = %record.value,
                                new = %value,
                                "Rewriting record"
                            );
                            output.push(
                                ZoneRecord::new(record.name, record.record_type, value).render(),
                            );
                            changed = true;
                        }
                        states[position] = EntryState::Applied;
                    }
                },
                None if collisions.contains(&record.value.to_ascii_lowercase()) => {
                    debug!(
                        name = %record.name,
                        value = %record.value,
                        "Dropping stale record whose value now belongs to another name"
                    );
                    changed = true;
                }
                None => output.push(raw.to_string()),
            },
            _ => output.push(raw.to_string()),
        }
    }

    for ((name, _), state) in mapping.iter().zip(&states) {
        if let EntryState::Pending(value) = state {
            debug!(name = %name, value = %value, "Appending record");
            output.push(ZoneRecord::new(name, record_type, *value).render());
            changed = true;
        }
    }

    let serial = serial.map(|(position, directive)| {
        if changed {
            let next = directive.next_value();
            output[position] = directive.render(next);
            next
        } else {
            directive.value
        }
    });

    Reconciliation {
        lines: output,
        changed,
        serial,
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
