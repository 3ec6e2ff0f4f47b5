//! Backup command implementations.
//!
//! Export writes a snapshot into the staging directory, then copies it to
//! `--to` or uploads it with `--drive`. Without either, the staged file is
//! the backup. Import and pull replace the current store and require
//! `--yes`.

use crate::backup::{self, ExportReport, RestoreReport, cloud, resolve_source};
use crate::cli::BackupCommands;
use crate::config::{resolve_drive_token, resolve_staging_dir};
use crate::error::Result;
use crate::transport::{Delivery, DirectoryTransport, DriveTransport, GoogleDrive};
use colored::Colorize;
use std::path::PathBuf;

use super::{block_on, confirm, open_existing_store, open_store, print_json};

/// Execute backup commands.
///
/// # Errors
///
/// Returns an error if the store, the source or the transport fails.
pub fn execute(
    command: &BackupCommands,
    db_path: Option<&PathBuf>,
    staging: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let staging_dir = resolve_staging_dir(staging.map(PathBuf::as_path))?;

    match command {
        BackupCommands::Export { to, drive, token } => {
            let store = open_existing_store(db_path)?;
            let report = if *drive {
                let token = resolve_drive_token(token.as_deref())?;
                let transport = DriveTransport::new(GoogleDrive::new(), token);
                block_on(backup::export_store(
                    &store,
                    &staging_dir,
                    &transport,
                    backup::cloud_file_name,
                ))??
            } else {
                let target = to.clone().unwrap_or_else(|| staging_dir.clone());
                let transport = DirectoryTransport::new(target);
                block_on(backup::export_store(
                    &store,
                    &staging_dir,
                    &transport,
                    backup::staged_file_name,
                ))??
            };
            print_export(&report, json)
        }
        BackupCommands::Import { source, yes } => {
            confirm(*yes, "Importing a backup")?;
            let source = resolve_source(source)?;
            let store = open_store(db_path)?;
            let (_store, report) = store.restore(&source)?;
            print_restore(&report, json)
        }
        BackupCommands::List { token } => {
            let token = resolve_drive_token(token.as_deref())?;
            let files = block_on(cloud::list_backups(&GoogleDrive::new(), &token))??;
            if json {
                return print_json(&files);
            }
            if files.is_empty() {
                println!("No backups found on Drive.");
            }
            for f in &files {
                println!(
                    "{}  {:<32} {}",
                    f.created_time.as_deref().unwrap_or("-"),
                    f.name,
                    f.id.dimmed()
                );
            }
            Ok(())
        }
        BackupCommands::Pull { id, token, yes } => {
            confirm(*yes, "Restoring from Drive")?;
            let token = resolve_drive_token(token.as_deref())?;
            let store = open_store(db_path)?;
            let (_store, report) = block_on(cloud::restore_from_drive(
                store,
                &GoogleDrive::new(),
                &token,
                id,
                &staging_dir,
            ))??;
            print_restore(&report, json)
        }
    }
}

fn print_export(report: &ExportReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("{} ({} bytes)", "Backup created".green(), report.bytes);
    match &report.delivery {
        Delivery::Directory { path } => println!("  Saved to: {}", path.display()),
        Delivery::Cloud { file } => println!("  Uploaded: {} ({})", file.name, file.id),
    }
    Ok(())
}

fn print_restore(report: &RestoreReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("{} from {}", "Store restored".green(), report.source.display());
    println!("  Store: {}", report.store.display());
    if !report.schema.added_columns.is_empty() {
        println!("  Upgraded columns: {}", report.schema.added_columns.join(", "));
    }
    for issue in &report.schema.issues {
        println!("  {} {}: {}", "warning".yellow(), issue.step, issue.message);
    }
    Ok(())
}
