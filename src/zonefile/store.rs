// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reading and atomically replacing zone files on disk.
//!
//! A new zone version is written to `<zone>.new` first. Only once that file is
//! complete and synced does the rotation happen: the live file becomes
//! `<zone>.old` and the staging file takes its place. Any failure before the
//! rotation leaves the live file exactly as it was.

use super::line::RecordType;
use super::reconcile::{reconcile, UpdateMapping};
use crate::constants::{BACKUP_SUFFIX, STAGING_SUFFIX};
use crate::errors::ZoneFileError;
use crate::reload::ReloadTrigger;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One zone file and its staging and backup siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFileStore {
    path: PathBuf,
}

impl ZoneFileStore {
    /// Create a store for the zone file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the live zone file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the staging file (`<zone>.new`).
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        sibling(&self.path, STAGING_SUFFIX)
    }

    /// Path of the backup file (`<zone>.old`).
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.path, BACKUP_SUFFIX)
    }

    /// Read the zone file, one entry per line with trailing whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(&self) -> Result<Vec<String>, ZoneFileError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ZoneFileError::Read {
            path: self.path.clone(),
            source,
        })?;

        Ok(content
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect())
    }

    /// Replace the zone file with `lines` and trigger a reload.
    ///
    /// A reload failure is logged and does not fail the call; the new zone is
    /// already in place by then.
    ///
    /// # Errors
    ///
    /// Returns an error if staging, cleanup or rotation fails. Errors raised
    /// before the live file is renamed leave it untouched.
    pub fn persist<S: AsRef<str>>(
        &self,
        lines: &[S],
        reload: &dyn ReloadTrigger,
    ) -> Result<(), ZoneFileError> {
        let staging = self.staging_path();
        let backup = self.backup_path();

        remove_stale(&staging)?;
        write_lines(&staging, lines).map_err(|source| ZoneFileError::WriteStaging {
            path: staging.clone(),
            source,
        })?;
        remove_stale(&backup)?;
        self.rotate(&staging, &backup)?;

        info!(zone = %self.path.display(), "Zone file replaced");

        if let Err(e) = reload.reload() {
            warn!(zone = %self.path.display(), "Name server reload failed: {}", e);
        }

        Ok(())
    }

    /// Move the live file to `backup`, then `staging` into its place.
    ///
    /// Once the first rename succeeds the previous contents always survive
    /// in `backup`, even if the second rename fails.
    fn rotate(&self, staging: &Path, backup: &Path) -> Result<(), ZoneFileError> {
        rename(&self.path, backup)?;
        rename(staging, &self.path)
    }

    /// Merge `mapping` into the zone and persist it if anything changed.
    ///
    /// Returns whether the zone changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone cannot be read or replaced.
    pub fn update(
        &self,
        mapping: &UpdateMapping,
        record_type: RecordType,
        reload: &dyn ReloadTrigger,
    ) -> Result<bool, ZoneFileError> {
        let lines = self.load()?;
        let result = reconcile(&lines, mapping, record_type);

        if !result.changed {
            debug!(zone = %self.path.display(), "Zone already up to date");
            return Ok(false);
        }

        match result.serial {
            Some(serial) => debug!(zone = %self.path.display(), serial, "Zone serial bumped"),
            None => warn!(zone = %self.path.display(), "Zone file has no ;Serial line"),
        }

        self.persist(&result.lines, reload)?;
        Ok(true)
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_stale(path: &Path) -> Result<(), ZoneFileError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed stale file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ZoneFileError::RemoveStale {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()
}

fn rename(from: &Path, to: &Path) -> Result<(), ZoneFileError> {
    fs::rename(from, to).map_err(|source| ZoneFileError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
