//! Import: `Validating → Staging → Replacing`.
//!
//! The backup replaces the store file wholesale. The copy goes to a
//! temporary file next to the store, is synced, and is then renamed over the
//! store, so a crash leaves either the old file or the new one.

use crate::error::{Error, Result};
use crate::storage::{FitStore, SchemaReport};
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::ImportPhase;

/// Outcome of a restore.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub source: PathBuf,
    pub store: PathBuf,
    pub bytes: u64,
    /// Schema checks run when the restored file was reopened.
    pub schema: SchemaReport,
}

/// Turn a user-supplied location (plain path or `file://` URI) into a path.
///
/// # Errors
///
/// Returns [`Error::BackupNotFound`] for URIs that do not name a local file.
pub fn resolve_source(input: &str) -> Result<PathBuf> {
    let input = input.trim();
    if !input.starts_with("file:") {
        return Ok(PathBuf::from(input));
    }

    url::Url::parse(input)
        .ok()
        .filter(|u| u.scheme() == "file")
        .and_then(|u| u.to_file_path().ok())
        .ok_or_else(|| Error::BackupNotFound {
            path: PathBuf::from(input),
        })
}

fn sidecar(store: &Path, suffix: &str) -> PathBuf {
    let mut name = store.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Replace the file at `store_path` with the content of `source`.
///
/// The store must be closed. Returns the number of bytes copied. The file's
/// content is not inspected.
///
/// # Errors
///
/// - [`Error::BackupNotFound`] if `source` is not a readable file
/// - [`Error::Replace`] if the copy or rename fails
pub fn replace_store_file(source: &Path, store_path: &Path) -> Result<u64> {
    info!(phase = %ImportPhase::Validating, source = %source.display(), "Import");
    if !source.is_file() {
        return Err(Error::BackupNotFound {
            path: source.to_path_buf(),
        });
    }

    info!(phase = %ImportPhase::Staging, "Import");
    if let Some(dir) = store_path.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::Replace {
            path: store_path.to_path_buf(),
            source,
        })?;
    }

    info!(phase = %ImportPhase::Replacing, store = %store_path.display(), "Import");
    let temp = sidecar(store_path, ".restore-tmp");
    let replace = || -> io::Result<u64> {
        let bytes = fs::copy(source, &temp)?;
        File::open(&temp)?.sync_all()?;
        // Sidecars from the old file would be replayed against the new one.
        remove_if_present(&sidecar(store_path, "-wal"))?;
        remove_if_present(&sidecar(store_path, "-shm"))?;
        fs::rename(&temp, store_path)?;
        Ok(bytes)
    };

    match replace() {
        Ok(bytes) => {
            info!(phase = %ImportPhase::Idle, bytes, "Import finished");
            Ok(bytes)
        }
        Err(source) => {
            if let Err(e) = remove_if_present(&temp) {
                warn!(path = %temp.display(), error = %e, "Could not remove temporary restore file");
            }
            Err(Error::Replace {
                path: store_path.to_path_buf(),
                source,
            })
        }
    }
}

impl FitStore {
    /// Replace this store with the backup at `source` and reopen it.
    ///
    /// Consumes the handle: the connection is closed before the file is
    /// replaced. The reopened store has been through the startup schema
    /// checks, so a backup from an older version is upgraded in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for in-memory stores,
    /// [`Error::BackupNotFound`] if `source` is unreachable (checked before the
    /// store is closed), and [`Error::Replace`] if replacement fails.
    pub fn restore(self, source: &Path) -> Result<(FitStore, RestoreReport)> {
        if self.path().is_none() {
            return Err(Error::InvalidArgument(
                "an in-memory store cannot be restored".into(),
            ));
        }
        if !source.is_file() {
            return Err(Error::BackupNotFound {
                path: source.to_path_buf(),
            });
        }

        let store_path = self.close()?.unwrap_or_default();
        let bytes = replace_store_file(source, &store_path)?;
        let store = FitStore::open(&store_path)?;

        let report = RestoreReport {
            source: source.to_path_buf(),
            store: store_path,
            bytes,
            schema: store.schema_report().clone(),
        };
        Ok((store, report))
    }
}
