//! Configuration management.
//!
//! This module resolves where FitLog keeps its files:
//! - **Store**: `<data dir>/fitlog/SQLite/fitlog.db`
//! - **Staging**: `<cache dir>/fitlog/`, where backups are written before
//!   they are handed to a transport and where downloads land before a restore
//!
//! Each location can be overridden by a CLI flag or an environment variable.

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// Environment variable overriding the store path.
pub const DB_ENV: &str = "FITLOG_DB";

/// Environment variable enabling the isolated test store.
pub const TEST_DB_ENV: &str = "FITLOG_TEST_DB";

/// Environment variable overriding the staging directory.
pub const STAGING_ENV: &str = "FITLOG_STAGING_DIR";

/// Environment variable holding a Drive access token.
pub const DRIVE_TOKEN_ENV: &str = "FITLOG_DRIVE_TOKEN";

/// Get the global FitLog data directory.
#[must_use]
pub fn global_data_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.data_dir().join("fitlog"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `FITLOG_TEST_DB=1` (or any non-empty value).
/// This redirects all store operations to an isolated test store.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var(TEST_DB_ENV).is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Get the test store path: `<data dir>/fitlog/test/fitlog.db`.
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_data_dir().map(|dir| dir.join("test").join("fitlog.db"))
}

/// Resolve the store path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `FITLOG_TEST_DB` environment variable → uses test store
/// 3. `FITLOG_DB` environment variable
/// 4. Global location: `<data dir>/fitlog/SQLite/fitlog.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    if let Some(path) = non_empty_env(DB_ENV) {
        return Some(PathBuf::from(path));
    }

    global_data_dir().map(|dir| dir.join("SQLite").join("fitlog.db"))
}

/// Resolve the staging directory.
///
/// Priority: explicit path, `FITLOG_STAGING_DIR`, then `<cache dir>/fitlog/`.
/// The staging directory never sits inside the store's own directory.
///
/// # Errors
///
/// Returns [`Error::Config`] if no location can be determined.
pub fn resolve_staging_dir(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(STAGING_ENV) {
        return Ok(PathBuf::from(path));
    }

    directories::BaseDirs::new()
        .map(|b| b.cache_dir().join("fitlog"))
        .ok_or_else(|| Error::Config("could not determine a cache directory for staging".into()))
}

/// Resolve the Drive access token: explicit value, then `FITLOG_DRIVE_TOKEN`.
///
/// # Errors
///
/// Returns [`Error::Config`] when no token is available.
pub fn resolve_drive_token(explicit: Option<&str>) -> Result<String> {
    explicit
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| non_empty_env(DRIVE_TOKEN_ENV))
        .ok_or_else(|| Error::Config("no Drive access token provided".into()))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
