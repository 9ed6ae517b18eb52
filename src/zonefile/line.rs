// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Classification of individual zone file lines.
//!
//! Only two shapes are ever rewritten: the serial line (anything ending in
//! `;Serial`) and four-token `name IN A|PTR value` records. Every other line,
//! including comments, blank lines, `$ORIGIN`/`$TTL` directives and records of
//! other types, is opaque and must round-trip untouched.

use crate::constants::{RECORD_CLASS_IN, SERIAL_MARKER};
use std::fmt;
use std::str::FromStr;

/// Record types managed by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address record (forward zone)
    A,
    /// Pointer record (reverse zone)
    Ptr,
}

impl RecordType {
    /// Zone file spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ptr => "PTR",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "PTR" => Ok(Self::Ptr),
            _ => Err(()),
        }
    }
}

/// The zone serial number line.
///
/// Keeps the text surrounding the number so that a bumped serial is written
/// back with the same indentation and spacing as the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialDirective {
    /// Current serial value
    pub value: u32,
    leading: String,
    trailing: String,
}

impl SerialDirective {
    fn parse(line: &str) -> Option<Self> {
        let trimmed_end = line.trim_end();
        let before_marker = trimmed_end.strip_suffix(SERIAL_MARKER)?;
        let number = before_marker.trim();
        let value = number.parse::<u32>().ok()?;

        let start = before_marker.len() - before_marker.trim_start().len();
        let end = start + number.len();

        Some(Self {
            value,
            leading: before_marker[..start].to_string(),
            trailing: line[end..].to_string(),
        })
    }

    /// Render the line with `value` in place of the current serial.
    #[must_use]
    pub fn render(&self, value: u32) -> String {
        format!("{}{value}{}", self.leading, self.trailing)
    }

    /// Serial that follows the current one, wrapping at the top of the range.
    #[must_use]
    pub const fn next_value(&self) -> u32 {
        self.value.wrapping_add(1)
    }
}

/// A managed `name IN A|PTR value` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// Owner name, zone-relative (hostname or last octet)
    pub name: String,
    /// A or PTR
    pub record_type: RecordType,
    /// Address or target hostname
    pub value: String,
}

impl ZoneRecord {
    /// Create a record.
    pub fn new(name: impl Into<String>, record_type: RecordType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type,
            value: value.into(),
        }
    }

    fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        if tokens.next()? != RECORD_CLASS_IN {
            return None;
        }
        let record_type = tokens.next()?.parse().ok()?;
        let value = tokens.next()?;
        if tokens.next().is_some() {
            return None;
        }

        Some(Self::new(name, record_type, value))
    }

    /// Render the record in the tab-separated layout used for new lines.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{}\t\t{RECORD_CLASS_IN}\t{}\t{}",
            self.name, self.record_type, self.value
        )
    }
}

/// Whether `text` can stand as one field of a managed record.
///
/// It must be non-empty and free of whitespace, comment and grouping
/// characters, and must not look like a `$` directive. Anything else would
/// render a line that no longer classifies as a record.
#[must_use]
pub fn is_record_field(text: &str) -> bool {
    !text.is_empty()
        && !text.starts_with('$')
        && !text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '(' | ')' | '"'))
}

/// One classified line of a zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneLine {
    /// The `;Serial` line
    Serial(SerialDirective),
    /// A managed A or PTR record
    Record(ZoneRecord),
    /// Anything else, kept verbatim
    Opaque(String),
}

impl ZoneLine {
    /// Classify a raw line without altering it.
    ///
    /// Malformed serial or record lines are opaque, never an error.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        if let Some(serial) = SerialDirective::parse(line) {
            return Self::Serial(serial);
        }
        if let Some(record) = ZoneRecord::parse(line) {
            return Self::Record(record);
        }
        Self::Opaque(line.to_string())
    }
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod line_tests;
