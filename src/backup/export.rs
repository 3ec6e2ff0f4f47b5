//! Export: `Locating → Copying → Handoff`.

use crate::error::{Error, Result};
use crate::storage::FitStore;
use crate::storage::codec::local_today;
use crate::transport::{BackupTransport, Delivery};
use chrono::NaiveDate;
use rusqlite::DatabaseName;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{ExportPhase, staged_file_name};

/// Outcome of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// The staged copy. Left in place after handoff.
    pub staged: PathBuf,
    pub bytes: u64,
    pub delivery: Delivery,
}

/// Copy the live store into `staging_dir` as `fitlog_backup_<date>.db`.
///
/// Uses SQLite's online backup, so pages still in the WAL are included and
/// the copy is consistent even while the store is open. The live store is
/// only read.
///
/// # Errors
///
/// Returns [`Error::StoreNotFound`] if the store has no file on disk, or a
/// database/IO error if the copy fails.
pub fn snapshot(store: &FitStore, staging_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    info!(phase = %ExportPhase::Locating, "Export");
    let live = store
        .path()
        .filter(|p| p.is_file())
        .ok_or_else(|| Error::StoreNotFound {
            path: store
                .path()
                .map_or_else(|| PathBuf::from(":memory:"), Path::to_path_buf),
        })?;

    info!(phase = %ExportPhase::Copying, from = %live.display(), "Export");
    std::fs::create_dir_all(staging_dir)?;
    let staged = staging_dir.join(staged_file_name(date));
    if staged.exists() {
        std::fs::remove_file(&staged)?;
    }
    store.conn().backup(DatabaseName::Main, &staged, None)?;
    Ok(staged)
}

/// Snapshot the store and hand the copy to `transport`.
///
/// # Errors
///
/// Returns [`Error::StoreNotFound`] when there is nothing to export, and
/// [`Error::Transport`] when the handoff fails. The live store is untouched
/// in every case.
pub async fn export_store<T: BackupTransport>(
    store: &FitStore,
    staging_dir: &Path,
    transport: &T,
    file_name: impl FnOnce(NaiveDate) -> String,
) -> Result<ExportReport> {
    let today = local_today();
    let staged = snapshot(store, staging_dir, today)?;
    let bytes = std::fs::metadata(&staged)?.len();

    info!(phase = %ExportPhase::Handoff, transport = transport.name(), bytes, "Export");
    let delivery = transport.deliver(&staged, &file_name(today)).await?;

    info!(phase = %ExportPhase::Idle, "Export finished");
    Ok(ExportReport {
        staged,
        bytes,
        delivery,
    })
}
