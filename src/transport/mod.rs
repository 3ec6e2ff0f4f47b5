//! Backup transports.
//!
//! A transport receives the staged backup file produced by an export and
//! delivers it somewhere the user can get it back from. Two are provided:
//!
//! - [`DirectoryTransport`] copies the file into a local directory
//! - [`DriveTransport`] uploads it through a [`CloudDrive`] client
//!
//! Transports are async because the cloud path is HTTP-based. Failures are
//! reported as [`Error::Transport`](crate::error::Error::Transport) with the
//! underlying message passed through.

pub mod google_drive;

pub use google_drive::GoogleDrive;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name prefix shared by every cloud backup.
pub const CLOUD_BACKUP_PREFIX: &str = "FitLog_Backup";

/// Prefix of backups uploaded under the app's former name. Listed, never written.
pub const LEGACY_CLOUD_BACKUP_PREFIX: &str = "FitX_Backup";

/// MIME type used when uploading a backup.
pub const BACKUP_MIME_TYPE: &str = "application/x-sqlite3";

/// A file stored in the cloud drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// RFC 3339 creation time as reported by the drive.
    #[serde(default)]
    pub created_time: Option<String>,
}

/// Where a backup ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum Delivery {
    Directory { path: PathBuf },
    Cloud { file: RemoteFile },
}

/// Receives a staged backup file.
pub trait BackupTransport: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Deliver `staged` under `file_name`.
    fn deliver(
        &self,
        staged: &Path,
        file_name: &str,
    ) -> impl Future<Output = Result<Delivery>> + Send;
}

/// Cloud-drive client contract. Token acquisition happens elsewhere.
pub trait CloudDrive: Send + Sync {
    /// Upload a local file. Returns the created remote file.
    fn upload(
        &self,
        token: &str,
        local: &Path,
        remote_name: &str,
        mime_type: &str,
    ) -> impl Future<Output = Result<RemoteFile>> + Send;

    /// Non-trashed files whose name contains `pattern`, newest first.
    fn list(
        &self,
        token: &str,
        pattern: &str,
    ) -> impl Future<Output = Result<Vec<RemoteFile>>> + Send;

    /// Download a file's content to `dest`. Returns `dest`.
    fn download(
        &self,
        token: &str,
        file_id: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Copies backups into a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryTransport {
    dir: PathBuf,
}

impl DirectoryTransport {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl BackupTransport for DirectoryTransport {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn deliver(&self, staged: &Path, file_name: &str) -> Result<Delivery> {
        let target = self.dir.join(file_name);
        if target == staged {
            return Ok(Delivery::Directory { path: target });
        }
        std::fs::create_dir_all(&self.dir)
            .and_then(|()| std::fs::copy(staged, &target))
            .map_err(|e| Error::Transport(format!("{}: {e}", target.display())))?;
        info!(path = %target.display(), "Backup copied");
        Ok(Delivery::Directory { path: target })
    }
}

/// Uploads backups to a cloud drive.
#[derive(Debug, Clone)]
pub struct DriveTransport<D> {
    drive: D,
    token: String,
}

impl<D: CloudDrive> DriveTransport<D> {
    #[must_use]
    pub fn new(drive: D, token: impl Into<String>) -> Self {
        Self {
            drive,
            token: token.into(),
        }
    }

    /// The underlying drive client.
    #[must_use]
    pub fn drive(&self) -> &D {
        &self.drive
    }
}

impl<D: CloudDrive> BackupTransport for DriveTransport<D> {
    fn name(&self) -> &'static str {
        "drive"
    }

    async fn deliver(&self, staged: &Path, file_name: &str) -> Result<Delivery> {
        let file = self
            .drive
            .upload(&self.token, staged, file_name, BACKUP_MIME_TYPE)
            .await?;
        info!(id = %file.id, name = %file.name, "Backup uploaded");
        Ok(Delivery::Cloud { file })
    }
}

/// Sort remote files newest first. Files without a creation time go last.
pub fn sort_newest_first(files: &mut [RemoteFile]) {
    files.sort_by(|a, b| b.created_time.cmp(&a.created_time));
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory drive used by transport and backup tests.

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct FakeDrive {
        pub files: Mutex<Vec<(RemoteFile, Vec<u8>)>>,
        pub fail_with: Option<String>,
    }

    impl FakeDrive {
        pub fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn check(&self, token: &str) -> Result<()> {
            if let Some(msg) = &self.fail_with {
                return Err(Error::Transport(msg.clone()));
            }
            if token.is_empty() {
                return Err(Error::Transport("Invalid Credentials".into()));
            }
            Ok(())
        }
    }

    impl CloudDrive for FakeDrive {
        async fn upload(
            &self,
            token: &str,
            local: &Path,
            remote_name: &str,
            mime_type: &str,
        ) -> Result<RemoteFile> {
            self.check(token)?;
            let bytes = std::fs::read(local)?;
            let mut files = self.files.lock().unwrap();
            let file = RemoteFile {
                id: format!("file-{}", files.len() + 1),
                name: remote_name.to_string(),
                mime_type: Some(mime_type.to_string()),
                created_time: Some(format!("2025-01-{:02}T10:00:00.000Z", files.len() + 1)),
            };
            files.push((file.clone(), bytes));
            Ok(file)
        }

        async fn list(&self, token: &str, pattern: &str) -> Result<Vec<RemoteFile>> {
            self.check(token)?;
            let mut found: Vec<RemoteFile> = self
                .files
                .lock()
                .unwrap()
                .iter()
                .filter(|(f, _)| f.name.contains(pattern))
                .map(|(f, _)| f.clone())
                .collect();
            sort_newest_first(&mut found);
            Ok(found)
        }

        async fn download(&self, token: &str, file_id: &str, dest: &Path) -> Result<PathBuf> {
            self.check(token)?;
            let files = self.files.lock().unwrap();
            let (_, bytes) = files
                .iter()
                .find(|(f, _)| f.id == file_id)
                .ok_or_else(|| Error::Transport("File not found".into()))?;
            std::fs::write(dest, bytes)?;
            Ok(dest.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeDrive;
    use super::*;

    fn staged_file(dir: &Path) -> PathBuf {
        let path = dir.join("fitlog_backup_2025-01-01.db");
        std::fs::write(&path, b"SQLite format 3\0payload").unwrap();
        path
    }

    #[tokio::test]
    async fn test_directory_transport_copies_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let staged = staged_file(tmp.path());
        let target_dir = tmp.path().join("exports");

        let transport = DirectoryTransport::new(&target_dir);
        let delivery = transport
            .deliver(&staged, "fitlog_backup_2025-01-01.db")
            .await
            .unwrap();

        let Delivery::Directory { path } = delivery else {
            panic!("expected directory delivery");
        };
        assert_eq!(path, target_dir.join("fitlog_backup_2025-01-01.db"));
        assert_eq!(std::fs::read(path).unwrap(), std::fs::read(&staged).unwrap());
    }

    #[tokio::test]
    async fn test_directory_transport_leaves_staged_file_in_place() {
        let tmp = tempfile::TempDir::new().unwrap();
        let staged = staged_file(tmp.path());
        let before = std::fs::read(&staged).unwrap();

        let transport = DirectoryTransport::new(tmp.path());
        let delivery = transport
            .deliver(&staged, "fitlog_backup_2025-01-01.db")
            .await
            .unwrap();

        assert_eq!(delivery, Delivery::Directory { path: staged.clone() });
        assert_eq!(std::fs::read(&staged).unwrap(), before);
    }

    #[tokio::test]
    async fn test_drive_transport_uploads_with_mime() {
        let tmp = tempfile::TempDir::new().unwrap();
        let staged = staged_file(tmp.path());

        let transport = DriveTransport::new(FakeDrive::default(), "token");
        let delivery = transport
            .deliver(&staged, "FitLog_Backup_2025-01-01.db")
            .await
            .unwrap();

        let Delivery::Cloud { file } = delivery else {
            panic!("expected cloud delivery");
        };
        assert_eq!(file.name, "FitLog_Backup_2025-01-01.db");
        assert_eq!(file.mime_type.as_deref(), Some(BACKUP_MIME_TYPE));
    }

    #[tokio::test]
    async fn test_drive_failure_is_passed_through() {
        let tmp = tempfile::TempDir::new().unwrap();
        let staged = staged_file(tmp.path());

        let transport = DriveTransport::new(FakeDrive::failing("Insufficient Permission"), "t");
        let err = transport.deliver(&staged, "x.db").await.unwrap_err();
        assert!(matches!(err, Error::Transport(ref m) if m == "Insufficient Permission"));
    }

    #[test]
    fn test_sort_newest_first() {
        let file = |id: &str, created: Option<&str>| RemoteFile {
            id: id.into(),
            name: format!("{CLOUD_BACKUP_PREFIX}_{id}.db"),
            mime_type: None,
            created_time: created.map(str::to_string),
        };
        let mut files = vec![
            file("a", Some("2025-01-01T00:00:00Z")),
            file("b", None),
            file("c", Some("2025-03-01T00:00:00Z")),
        ];
        sort_newest_first(&mut files);
        let ids: Vec<_> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remote_file_decodes_drive_json() {
        let json = r#"{"id":"1AbC","name":"FitLog_Backup_2025-02-03.db","mimeType":"application/x-sqlite3","createdTime":"2025-02-03T09:00:00.000Z"}"#;
        let file: RemoteFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.mime_type.as_deref(), Some("application/x-sqlite3"));
        assert_eq!(file.created_time.as_deref(), Some("2025-02-03T09:00:00.000Z"));
    }
}
