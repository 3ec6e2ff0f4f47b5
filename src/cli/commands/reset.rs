//! Reset command implementation.

use crate::error::Result;
use colored::Colorize;
use std::path::PathBuf;

use super::{confirm, open_existing_store, print_json};

/// Delete every record in one transaction, then re-seed the catalog.
///
/// # Errors
///
/// Returns an error without `--yes`, or if any delete fails (in which case
/// nothing is deleted).
pub fn execute(yes: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    confirm(yes, "Reset")?;

    let mut store = open_existing_store(db_path)?;
    let removed = store.reset_all()?;
    let reseeded = store.ensure_schema().seeded_exercises;

    if json {
        return print_json(&serde_json::json!({
            "removed": removed,
            "total_removed": removed.total(),
            "reseeded_exercises": reseeded,
        }));
    }
    println!("{} {} records deleted", "Reset:".red().bold(), removed.total());
    println!("  Re-seeded {reseeded} exercises");
    Ok(())
}
