//! Google Drive v3 client.
//!
//! Uses the REST API directly: a multipart upload, a `files.list` query and
//! an `alt=media` download. The caller supplies an OAuth access token.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CloudDrive, RemoteFile, sort_newest_first};

const DEFAULT_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FILE_FIELDS: &str = "id,name,mimeType,createdTime";

/// Google Drive REST client.
#[derive(Debug, Clone)]
pub struct GoogleDrive {
    client: reqwest::Client,
    files_url: String,
    upload_url: String,
}

impl GoogleDrive {
    /// Create a client for the public Drive endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_FILES_URL, DEFAULT_UPLOAD_URL)
    }

    /// Create a client for custom endpoints.
    #[must_use]
    pub fn with_endpoints(files_url: &str, upload_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            files_url: files_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.trim_end_matches('/').to_string(),
        }
    }

    fn list_url(&self, pattern: &str) -> Result<url::Url> {
        let query = format!(
            "name contains '{}' and trashed = false",
            pattern.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let fields = format!("files({FILE_FIELDS})");
        url::Url::parse_with_params(
            &self.files_url,
            [
                ("q", query.as_str()),
                ("fields", fields.as_str()),
                ("orderBy", "createdTime desc"),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid Drive endpoint: {e}")))
    }

    fn upload_url(&self) -> Result<url::Url> {
        url::Url::parse_with_params(
            &self.upload_url,
            [("uploadType", "multipart"), ("fields", FILE_FIELDS)],
        )
        .map_err(|e| Error::Config(format!("invalid Drive endpoint: {e}")))
    }
}

impl Default for GoogleDrive {
    fn default() -> Self {
        Self::new()
    }
}

/// `multipart/related` upload body: JSON metadata, then the file content.
fn multipart_body(boundary: &str, metadata: &serde_json::Value, mime_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<RemoteFile>,
}

/// The API's own error message, or `fallback` when the body has none.
fn api_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

async fn fail(response: reqwest::Response, fallback: &str) -> Error {
    let body = response.text().await.unwrap_or_default();
    Error::Transport(api_error_message(&body, fallback))
}

impl CloudDrive for GoogleDrive {
    async fn upload(
        &self,
        token: &str,
        local: &Path,
        remote_name: &str,
        mime_type: &str,
    ) -> Result<RemoteFile> {
        let content = std::fs::read(local)?;
        let metadata = serde_json::json!({ "name": remote_name, "mimeType": mime_type });
        let boundary = format!("fitlog-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_body(&boundary, &metadata, mime_type, &content);

        debug!(name = remote_name, bytes = content.len(), "Uploading to Drive");
        let response = self
            .client
            .post(self.upload_url()?)
            .bearer_auth(token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(fail(response, "Failed to upload to Drive").await);
        }
        Ok(response.json::<RemoteFile>().await?)
    }

    async fn list(&self, token: &str, pattern: &str) -> Result<Vec<RemoteFile>> {
        let response = self
            .client
            .get(self.list_url(pattern)?)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(fail(response, "Failed to list backups").await);
        }

        let mut files = response.json::<FileList>().await?.files;
        sort_newest_first(&mut files);
        Ok(files)
    }

    async fn download(&self, token: &str, file_id: &str, dest: &Path) -> Result<PathBuf> {
        let mut url = url::Url::parse(&self.files_url)
            .map_err(|e| Error::Config(format!("invalid Drive endpoint: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::Config("invalid Drive endpoint".into()))?
            .push(file_id);
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.client.get(url).bearer_auth(token).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(fail(response, "Failed to download file from Drive").await);
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, &bytes)?;
        debug!(id = file_id, bytes = bytes.len(), "Downloaded from Drive");
        Ok(dest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_url_query() {
        let drive = GoogleDrive::new();
        let url = drive.list_url("FitLog_Backup").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&(
            "q".to_string(),
            "name contains 'FitLog_Backup' and trashed = false".to_string()
        )));
        assert!(pairs.contains(&("orderBy".to_string(), "createdTime desc".to_string())));
        assert!(pairs.contains(&(
            "fields".to_string(),
            "files(id,name,mimeType,createdTime)".to_string()
        )));
    }

    #[test]
    fn test_list_url_escapes_quotes() {
        let drive = GoogleDrive::new();
        let url = drive.list_url("it's").unwrap();
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(q, "name contains 'it\\'s' and trashed = false");
    }

    #[test]
    fn test_upload_url_is_multipart() {
        let drive = GoogleDrive::with_endpoints("http://localhost/files/", "http://localhost/upload");
        let url = drive.upload_url().unwrap();
        assert_eq!(url.path(), "/upload");
        assert!(url.query().unwrap().contains("uploadType=multipart"));
    }

    #[test]
    fn test_multipart_body_layout() {
        let meta = serde_json::json!({ "name": "b.db", "mimeType": "application/x-sqlite3" });
        let body = multipart_body("xyz", &meta, "application/x-sqlite3", b"DATA");
        let text = String::from_utf8(body).unwrap();

        assert!(text.starts_with("--xyz\r\nContent-Type: application/json"));
        assert!(text.contains("\"name\":\"b.db\""));
        assert!(text.contains("Content-Type: application/x-sqlite3\r\n\r\nDATA\r\n--xyz--\r\n"));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":403,"message":"Insufficient Permission"}}"#;
        assert_eq!(api_error_message(body, "fallback"), "Insufficient Permission");
        assert_eq!(api_error_message("<html>", "fallback"), "fallback");
        assert_eq!(api_error_message(r#"{"error":{}}"#, "fallback"), "fallback");
    }
}
