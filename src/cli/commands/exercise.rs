//! Exercise library commands.

use crate::cli::{ExerciseAddArgs, ExerciseCommands};
use crate::error::{Error, Result};
use crate::model::{CueList, Exercise, ExerciseCategory, NewExercise};
use colored::Colorize;
use std::path::PathBuf;

use super::{open_store, print_json};

/// Execute exercise commands.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, or the id is unknown.
pub fn execute(command: &ExerciseCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        ExerciseCommands::List {
            category,
            favorites,
        } => list(category.as_deref(), *favorites, db_path, json),
        ExerciseCommands::Search { query } => search(query, db_path, json),
        ExerciseCommands::Show { id } => show(*id, db_path, json),
        ExerciseCommands::Favorite { id } => favorite(*id, db_path, json),
        ExerciseCommands::Add(args) => add(args, db_path, json),
    }
}

fn list(
    category: Option<&str>,
    favorites: bool,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let store = open_store(db_path)?;
    let exercises = match (category, favorites) {
        (_, true) => {
            let mut favs = store.favorite_exercises()?;
            if let Some(cat) = category {
                favs.retain(|e| e.category.eq_ignore_ascii_case(cat));
            }
            favs
        }
        (Some(cat), false) => {
            // Canonical spelling when known, otherwise stored as typed.
            let cat = ExerciseCategory::parse(cat).map_or(cat, |c| c.as_str());
            store.list_exercises_by_category(cat)?
        }
        (None, false) => store.list_exercises()?,
    };
    print_list(&exercises, json)
}

fn search(query: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let exercises = store.search_exercises(query)?;
    print_list(&exercises, json)
}

fn show(id: i64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let exercise = store.get_exercise(id)?.ok_or(Error::RecordNotFound {
        entity: "Exercise",
        id,
    })?;

    if json {
        return print_json(&exercise);
    }

    let star = if exercise.is_favorite { " ★" } else { "" };
    println!("{}{star}", exercise.name.bold());
    println!("  Category:  {}", exercise.category);
    println!("  Muscles:   {}", exercise.muscles);
    println!("  Equipment: {}", exercise.equipment);
    let unit = if exercise.is_timed { "s" } else { " reps" };
    println!(
        "  Default:   {} x {}{unit}",
        exercise.default_sets, exercise.default_reps
    );
    if !exercise.cues.is_empty() {
        println!("  Cues:");
        for cue in exercise.cues.iter() {
            println!("    - {cue}");
        }
    }
    if let Some(note) = &exercise.note {
        println!("  Note: {note}");
    }
    Ok(())
}

fn favorite(id: i64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut store = open_store(db_path)?;
    let is_favorite = store.toggle_favorite(id)?;

    if json {
        return print_json(&serde_json::json!({ "id": id, "is_favorite": is_favorite }));
    }
    if is_favorite {
        println!("Exercise {id} added to favorites");
    } else {
        println!("Exercise {id} removed from favorites");
    }
    Ok(())
}

fn add(args: &ExerciseAddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if args.sets <= 0 || args.reps <= 0 {
        return Err(Error::InvalidArgument(
            "sets and reps must be positive".to_string(),
        ));
    }
    let category = ExerciseCategory::parse(&args.category)
        .map_or_else(|| args.category.trim().to_string(), |c| c.as_str().to_string());

    let exercise = NewExercise {
        name: args.name.trim().to_string(),
        category,
        muscles: args.muscles.clone(),
        equipment: args.equipment.clone(),
        default_sets: args.sets,
        default_reps: args.reps,
        is_timed: args.timed,
        demo_video_url: None,
        cues: CueList::new(&args.cues),
        note: args.note.clone(),
    };

    let mut store = open_store(db_path)?;
    let id = store.add_custom_exercise(&exercise)?;
    if json {
        return print_json(&serde_json::json!({ "id": id, "name": exercise.name }));
    }
    println!("Added exercise {id}: {}", exercise.name);
    Ok(())
}

fn print_list(exercises: &[Exercise], json: bool) -> Result<()> {
    if json {
        return print_json(exercises);
    }
    if exercises.is_empty() {
        println!("No exercises found.");
        return Ok(());
    }
    for e in exercises {
        let marker = match (e.is_favorite, e.is_custom) {
            (true, _) => "★".yellow().to_string(),
            (false, true) => "+".cyan().to_string(),
            (false, false) => " ".to_string(),
        };
        println!(
            "{marker} {:>4}  {:<28} {:<11} {}",
            e.id,
            e.name,
            e.category,
            e.muscles.dimmed()
        );
    }
    Ok(())
}
