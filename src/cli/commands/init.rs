//! Create or upgrade the store.
//!
//! Opening the store runs the startup schema checks, so `init` is safe on
//! an existing store: it only adds missing columns and seeds an empty
//! exercise table.

use crate::error::Result;
use crate::storage::SchemaReport;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{open_store, print_json, store_path};

#[derive(Serialize)]
struct InitOutput<'a> {
    path: PathBuf,
    created: bool,
    schema: &'a SchemaReport,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let path = store_path(db_path)?;
    let created = !path.exists();
    let store = open_store(Some(&path))?;
    let report = store.schema_report();

    if json {
        return print_json(&InitOutput {
            path,
            created,
            schema: report,
        });
    }

    if created {
        println!("{} {}", "Created store".green(), path.display());
    } else {
        println!("Store at {}", path.display());
    }
    if !report.added_columns.is_empty() {
        println!("  Added columns: {}", report.added_columns.join(", "));
    }
    if report.seeded_exercises > 0 {
        println!("  Seeded {} exercises", report.seeded_exercises);
    }
    for issue in &report.issues {
        println!("  {} {}: {}", "warning".yellow(), issue.step, issue.message);
    }
    Ok(())
}
