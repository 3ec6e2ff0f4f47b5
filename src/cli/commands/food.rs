//! Food log commands.

use crate::cli::FoodCommands;
use crate::error::{Error, Result};
use crate::model::{FoodEntry, NewFoodEntry, NutritionTotals};
use crate::storage::codec::local_today;
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{open_store, print_json};

#[derive(Serialize)]
struct DayOutput {
    date: NaiveDate,
    entries: Vec<FoodEntry>,
    totals: NutritionTotals,
}

/// Execute food commands.
///
/// # Errors
///
/// Returns an error if a value is invalid or the store operation fails.
pub fn execute(command: &FoodCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        FoodCommands::Add {
            name,
            calories,
            protein,
            carbs,
            fat,
        } => {
            if name.trim().is_empty() {
                return Err(Error::InvalidArgument("food name must not be empty".into()));
            }
            if [calories, protein, carbs, fat]
                .iter()
                .any(|v| !v.is_finite() || **v < 0.0)
            {
                return Err(Error::InvalidArgument(
                    "nutrient values must be non-negative numbers".into(),
                ));
            }

            let mut store = open_store(db_path)?;
            let entry = NewFoodEntry::new(name.trim(), *calories, *protein, *carbs, *fat);
            let id = store.add_food_entry(&entry)?;
            if json {
                return print_json(&serde_json::json!({ "id": id }));
            }
            println!("Logged {} ({calories:.0} kcal)", entry.name);
            Ok(())
        }
        FoodCommands::List { date } => {
            let store = open_store(db_path)?;
            let date = date.unwrap_or_else(local_today);
            let output = DayOutput {
                date,
                entries: store.food_entries_on(date)?,
                totals: store.totals_on(date)?,
            };
            if json {
                return print_json(&output);
            }
            print_day(&output);
            Ok(())
        }
        FoodCommands::Delete { id } => {
            let mut store = open_store(db_path)?;
            if !store.delete_food_entry(*id)? {
                return Err(Error::RecordNotFound {
                    entity: "Food entry",
                    id: *id,
                });
            }
            if json {
                return print_json(&serde_json::json!({ "id": id, "deleted": true }));
            }
            println!("Deleted food entry {id}");
            Ok(())
        }
    }
}

fn print_day(day: &DayOutput) {
    println!("{}", format!("Food on {}", day.date).bold());
    if day.entries.is_empty() {
        println!("  Nothing logged.");
    }
    for e in &day.entries {
        println!(
            "  {:>4}  {:<24} {:>6.0} kcal  P {:.0}  C {:.0}  F {:.0}",
            e.id, e.name, e.calories, e.protein, e.carbs, e.fat
        );
    }
    let t = &day.totals;
    println!(
        "  Total: {:.0} kcal  P {:.0}g  C {:.0}g  F {:.0}g",
        t.calories, t.protein, t.carbs, t.fat
    );
}
