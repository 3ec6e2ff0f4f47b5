//! Command implementations.
//!
//! Each command resolves the store path, opens the store once and passes it
//! to the library operations it needs.

pub mod backup;
pub mod completions;
pub mod exercise;
pub mod food;
pub mod init;
pub mod profile;
pub mod reset;
pub mod status;
pub mod version;
pub mod weight;
pub mod workout;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::FitStore;
use serde::Serialize;
use std::path::PathBuf;

/// Resolve the store path or fail with a configuration error.
pub(crate) fn store_path(db_path: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("could not determine the store location".into()))
}

/// Open the store, creating it if needed.
pub(crate) fn open_store(db_path: Option<&PathBuf>) -> Result<FitStore> {
    FitStore::open(&store_path(db_path)?)
}

/// Open the store only if its file already exists.
pub(crate) fn open_existing_store(db_path: Option<&PathBuf>) -> Result<FitStore> {
    let path = store_path(db_path)?;
    if !path.is_file() {
        return Err(Error::StoreNotFound { path });
    }
    FitStore::open(&path)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Destructive commands require `--yes`.
pub(crate) fn confirm(yes: bool, action: &str) -> Result<()> {
    if yes {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{action} is destructive; re-run with --yes to confirm"
        )))
    }
}

pub(crate) fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    Ok(rt.block_on(future))
}
