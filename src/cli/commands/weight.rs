//! Body-weight commands.

use crate::cli::WeightCommands;
use crate::error::{Error, Result};
use std::path::PathBuf;

use super::{open_store, print_json};

/// Execute weight commands.
///
/// # Errors
///
/// Returns an error if the weight is invalid or the store operation fails.
pub fn execute(command: &WeightCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        WeightCommands::Add { weight, note } => {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(Error::InvalidArgument("weight must be a positive number".into()));
            }
            let mut store = open_store(db_path)?;
            let id = store.add_weight(*weight, note.as_deref(), None)?;
            if json {
                return print_json(&serde_json::json!({ "id": id }));
            }
            println!("Logged {weight:.1} kg");
            Ok(())
        }
        WeightCommands::History { limit } => {
            let store = open_store(db_path)?;
            let history = store.weight_history(*limit)?;
            if json {
                return print_json(&history);
            }
            if history.is_empty() {
                println!("No weights logged.");
            }
            for sample in &history {
                let note = sample.note.as_deref().unwrap_or_default();
                println!("{}  {:>6.1} kg  {note}", sample.timestamp, sample.weight);
            }
            Ok(())
        }
        WeightCommands::Latest => {
            let store = open_store(db_path)?;
            let latest = store.latest_weight()?;
            if json {
                return print_json(&latest);
            }
            match latest {
                Some(sample) => println!("{:.1} kg ({})", sample.weight, sample.timestamp),
                None => println!("No weights logged."),
            }
            Ok(())
        }
    }
}
