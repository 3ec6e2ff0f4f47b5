//! Cloud-drive backups: list what was uploaded, pull one back and restore it.

use crate::error::{Error, Result};
use crate::storage::FitStore;
use crate::transport::{
    CLOUD_BACKUP_PREFIX, CloudDrive, LEGACY_CLOUD_BACKUP_PREFIX, RemoteFile, sort_newest_first,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use super::RestoreReport;

/// Backups on the drive under either name prefix, newest first.
///
/// # Errors
///
/// Returns [`Error::Transport`] if the drive rejects the request.
pub async fn list_backups<D: CloudDrive>(drive: &D, token: &str) -> Result<Vec<RemoteFile>> {
    let mut files = drive.list(token, CLOUD_BACKUP_PREFIX).await?;
    files.extend(drive.list(token, LEGACY_CLOUD_BACKUP_PREFIX).await?);

    let mut seen = HashSet::new();
    files.retain(|f| seen.insert(f.id.clone()));
    sort_newest_first(&mut files);
    Ok(files)
}

/// Drive file ids are URL-safe base64: letters, digits, `-` and `_`.
fn check_file_id(file_id: &str) -> Result<&str> {
    let id = file_id.trim();
    if id.is_empty() {
        return Err(Error::InvalidArgument("backup id must not be empty".into()));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidArgument(format!(
            "invalid backup id '{id}': expected letters, digits, '-' or '_'"
        )));
    }
    Ok(id)
}

/// Download a backup into `staging_dir`. Returns the local path.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty or malformed id and
/// [`Error::Transport`] if the download fails.
pub async fn pull_backup<D: CloudDrive>(
    drive: &D,
    token: &str,
    file_id: &str,
    staging_dir: &Path,
) -> Result<PathBuf> {
    let file_id = check_file_id(file_id)?;
    std::fs::create_dir_all(staging_dir)?;
    // The remote name may not be a valid file name; the checked id is.
    let dest = staging_dir.join(format!("drive_{file_id}.db"));
    let path = drive.download(token, file_id, &dest).await?;
    info!(id = file_id, path = %path.display(), "Backup downloaded");
    Ok(path)
}

/// Download a backup and restore the store from it.
///
/// # Errors
///
/// Returns the transport error if the download fails, or any restore
/// error. The store file is unchanged when the download fails; the caller
/// reopens it.
pub async fn restore_from_drive<D: CloudDrive>(
    store: FitStore,
    drive: &D,
    token: &str,
    file_id: &str,
    staging_dir: &Path,
) -> Result<(FitStore, RestoreReport)> {
    let local = pull_backup(drive, token, file_id, staging_dir).await?;
    store.restore(&local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::{cloud_file_name, export_store};
    use crate::model::NewFoodEntry;
    use crate::transport::DriveTransport;
    use crate::transport::testing::FakeDrive;

    #[tokio::test]
    async fn test_upload_list_pull_restore() {
        let tmp = tempfile::TempDir::new().unwrap();
        let staging = tmp.path().join("staging");
        let mut store = FitStore::open(&tmp.path().join("fitlog.db")).unwrap();
        store
            .add_food_entry(&NewFoodEntry::new("Banana", 105.0, 1.3, 27.0, 0.4))
            .unwrap();

        let transport = DriveTransport::new(FakeDrive::default(), "token");
        export_store(&store, &staging, &transport, cloud_file_name)
            .await
            .unwrap();
        let drive = transport.drive();

        let listed = list_backups(drive, "token").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].name.starts_with("FitLog_Backup_"));

        store.reset_all().unwrap();
        let (store, report) = restore_from_drive(store, drive, "token", &listed[0].id, &staging)
            .await
            .unwrap();

        assert!(report.source.starts_with(&staging));
        assert_eq!(store.table_counts().unwrap().food_entries, 1);
    }

    #[tokio::test]
    async fn test_list_without_token_fails() {
        let drive = FakeDrive::default();
        let err = list_backups(&drive, "").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_pull_rejects_empty_id() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = pull_backup(&FakeDrive::default(), "token", "  ", tmp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_pull_rejects_ids_that_are_not_file_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let staging = tmp.path().join("staging");
        for id in ["../escape", "a/b", "x.db", "id with space"] {
            let err = pull_backup(&FakeDrive::default(), "token", id, &staging)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{id}");
        }
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_list_includes_backups_under_former_name() {
        let tmp = tempfile::TempDir::new().unwrap();
        let local = tmp.path().join("b.db");
        std::fs::write(&local, b"SQLite format 3\0").unwrap();

        let drive = FakeDrive::default();
        drive
            .upload("token", &local, "FitX_Backup_2024-12-01.db", "application/x-sqlite3")
            .await
            .unwrap();
        drive
            .upload("token", &local, "FitLog_Backup_2025-01-02.db", "application/x-sqlite3")
            .await
            .unwrap();
        drive
            .upload("token", &local, "notes.txt", "text/plain")
            .await
            .unwrap();

        let listed = list_backups(&drive, "token").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["FitLog_Backup_2025-01-02.db", "FitX_Backup_2024-12-01.db"]
        );
    }
}
