//! Profile command implementations.

use crate::cli::{ProfileArgs, ProfileCommands};
use crate::error::{Error, Result};
use crate::model::{User, UserProfile};
use std::path::PathBuf;

use super::{open_store, print_json};

/// Execute profile commands.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written.
pub fn execute(command: &ProfileCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        ProfileCommands::Show => show(db_path, json),
        ProfileCommands::Set(args) => set(args, db_path, json),
    }
}

fn show(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let user = store.current_user()?;

    if json {
        return print_json(&user);
    }

    match user {
        Some(user) => print_user(&user),
        None => println!("No profile yet. Create one with `fitlog profile set --name <name>`."),
    }
    Ok(())
}

/// Merge the given fields over the current profile and save.
fn set(args: &ProfileArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    for (label, value) in [("height", args.height), ("starting weight", args.starting_weight)] {
        if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
            return Err(Error::InvalidArgument(format!("{label} must be a positive number")));
        }
    }

    let mut store = open_store(db_path)?;
    let current = store.current_user()?.unwrap_or_default();

    let pick = |new: &Option<String>, old: Option<String>| new.clone().or(old);
    let profile = UserProfile {
        name: pick(&args.name, current.name),
        email: pick(&args.email, current.email),
        phone: pick(&args.phone, current.phone),
        dob: pick(&args.dob, current.dob),
        gender: pick(&args.gender, current.gender),
        height: args.height.or(current.height),
        starting_weight: args.starting_weight.or(current.starting_weight),
        activity_level: pick(&args.activity_level, current.activity_level),
        goal: pick(&args.goal, current.goal),
    };

    let id = store.save_user(&profile)?;
    if json {
        return print_json(&store.current_user()?);
    }
    println!("Saved profile {id}");
    Ok(())
}

fn print_user(user: &User) {
    let field = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            println!("{label:<16}{value}");
        }
    };
    field("Name:", user.name.clone());
    field("Email:", user.email.clone());
    field("Phone:", user.phone.clone());
    field("Date of birth:", user.dob.clone());
    field("Gender:", user.gender.clone());
    field("Height:", user.height.map(|h| format!("{h} cm")));
    field("Start weight:", user.starting_weight.map(|w| format!("{w} kg")));
    field("Activity:", user.activity_level.clone());
    field("Goal:", user.goal.clone());
    field("Created:", user.created_at.clone());
}
