//! Backup and restore of the whole store.
//!
//! The store is treated as one portable file. Export snapshots the live
//! store into the staging directory and hands the copy to a
//! [`BackupTransport`](crate::transport::BackupTransport). Import replaces
//! the store file with a chosen backup and reopens it.
//!
//! # Submodules
//!
//! - [`export`] - Snapshot and handoff
//! - [`restore`] - File replacement and reopen
//! - [`cloud`] - Listing and pulling backups from a cloud drive

pub mod cloud;
pub mod export;
pub mod restore;

pub use export::{ExportReport, export_store, snapshot};
pub use restore::{RestoreReport, replace_store_file, resolve_source};

use chrono::NaiveDate;
use std::fmt;

use crate::transport::CLOUD_BACKUP_PREFIX;

/// Name of the staged copy written by an export.
#[must_use]
pub fn staged_file_name(date: NaiveDate) -> String {
    format!("fitlog_backup_{}.db", date.format("%Y-%m-%d"))
}

/// Name a backup is uploaded under.
#[must_use]
pub fn cloud_file_name(date: NaiveDate) -> String {
    format!("{CLOUD_BACKUP_PREFIX}_{}.db", date.format("%Y-%m-%d"))
}

/// Export progress. Every run returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Locating,
    Copying,
    Handoff,
}

/// Import progress. Every run returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Validating,
    Staging,
    Replacing,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Locating => "locating",
            Self::Copying => "copying",
            Self::Handoff => "handoff",
        })
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Staging => "staging",
            Self::Replacing => "replacing",
        })
    }
}
