//! Status command implementation.

use crate::error::Result;
use crate::model::{NutritionTotals, WeightSample};
use crate::storage::codec::local_today;
use crate::storage::{StoreCounts, StructuralIssue};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{open_existing_store, print_json};

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    path: Option<PathBuf>,
    user: Option<String>,
    account_created_at: Option<String>,
    counts: StoreCounts,
    today: NutritionTotals,
    sessions_today: usize,
    latest_weight: Option<WeightSample>,
    issues: Vec<StructuralIssue>,
}

/// Execute status command.
///
/// # Errors
///
/// Returns [`crate::Error::StoreNotFound`] if the store was never created.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_existing_store(db_path)?;
    let user = store.current_user()?;

    let output = StatusOutput {
        path: store.path().map(PathBuf::from),
        user: user.and_then(|u| u.name),
        account_created_at: store.account_created_at()?,
        counts: store.table_counts()?,
        today: store.today_totals()?,
        sessions_today: store.count_sessions_on(local_today())?,
        latest_weight: store.latest_weight()?,
        issues: store.schema_report().issues.clone(),
    };

    if json {
        return print_json(&output);
    }

    println!("{}", "FitLog Status".bold());
    println!("=============");
    println!();
    if let Some(path) = &output.path {
        println!("Store:   {}", path.display());
    }
    match (&output.user, &output.account_created_at) {
        (Some(name), Some(since)) => println!("User:    {name} (since {since})"),
        (Some(name), None) => println!("User:    {name}"),
        (None, _) => println!("User:    {}", "not set up".dimmed()),
    }
    println!();

    let c = &output.counts;
    println!("Records:");
    println!("  Exercises:  {}", c.exercises);
    println!("  Workouts:   {}", c.workouts);
    println!("  Sessions:   {}", c.workout_sessions);
    println!("  Food:       {}", c.food_entries);
    println!("  Weights:    {}", c.weights);
    println!();

    let t = &output.today;
    println!(
        "Today: {:.0} kcal  P {:.0}g  C {:.0}g  F {:.0}g  ({} sessions)",
        t.calories, t.protein, t.carbs, t.fat, output.sessions_today
    );
    if let Some(w) = &output.latest_weight {
        println!("Latest weight: {:.1} kg ({})", w.weight, w.timestamp);
    }

    for issue in &output.issues {
        println!("{} {}: {}", "warning".yellow(), issue.step, issue.message);
    }
    Ok(())
}
