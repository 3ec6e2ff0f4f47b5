//! Workout template and session commands.

use crate::cli::{QuickLogArgs, WorkoutCommands};
use crate::error::{Error, Result};
use crate::model::{
    NewWorkout, NewWorkoutSession, PerformedExercise, SetLog, Workout, WorkoutExercise,
};
use crate::storage::FitStore;
use colored::Colorize;
use std::path::PathBuf;

use super::{open_store, print_json};

/// Execute workout commands.
///
/// # Errors
///
/// Returns an error if a referenced record is missing or the store
/// operation fails.
pub fn execute(command: &WorkoutCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        WorkoutCommands::Create { title, exercises } => create(title, exercises, db_path, json),
        WorkoutCommands::List => {
            let store = open_store(db_path)?;
            let templates = store.list_templates()?;
            if json {
                return print_json(&templates);
            }
            if templates.is_empty() {
                println!("No workout templates.");
            }
            for w in &templates {
                println!(
                    "{:>4}  {:<24} {} exercises",
                    w.id,
                    w.title.as_deref().unwrap_or("(untitled)"),
                    w.exercises.len()
                );
            }
            Ok(())
        }
        WorkoutCommands::Show { id } => {
            let store = open_store(db_path)?;
            let workout = get_workout(&store, *id)?;
            if json {
                return print_json(&workout);
            }
            print_workout(&workout);
            Ok(())
        }
        WorkoutCommands::Delete { id } => {
            let mut store = open_store(db_path)?;
            if !store.delete_workout(*id)? {
                return Err(Error::RecordNotFound {
                    entity: "Workout",
                    id: *id,
                });
            }
            if json {
                return print_json(&serde_json::json!({ "id": id, "deleted": true }));
            }
            println!("Deleted workout {id}");
            Ok(())
        }
        WorkoutCommands::Log {
            id,
            duration,
            weight,
        } => log(*id, *duration, *weight, db_path, json),
        WorkoutCommands::Quick(args) => quick(args, db_path, json),
        WorkoutCommands::History { limit } => {
            let store = open_store(db_path)?;
            let mut sessions = store.list_sessions()?;
            if let Some(limit) = limit {
                sessions.truncate(*limit);
            }
            if json {
                return print_json(&sessions);
            }
            if sessions.is_empty() {
                println!("No sessions logged.");
            }
            for s in &sessions {
                let kind = if s.is_quick_log() {
                    "quick".cyan().to_string()
                } else {
                    format!("workout {}", s.workout_id)
                };
                let names: Vec<&str> = s.exercises_done.iter().map(|e| e.name.as_str()).collect();
                println!("{}  {kind:<12} {}", s.date, names.join(", "));
            }
            Ok(())
        }
    }
}

fn get_workout(store: &FitStore, id: i64) -> Result<Workout> {
    store.get_workout(id)?.ok_or(Error::RecordNotFound {
        entity: "Workout",
        id,
    })
}

fn create(title: &str, ids: &[i64], db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut store = open_store(db_path)?;

    let mut slots = Vec::with_capacity(ids.len());
    for &exercise_id in ids {
        let exercise = store.get_exercise(exercise_id)?.ok_or(Error::RecordNotFound {
            entity: "Exercise",
            id: exercise_id,
        })?;
        slots.push(WorkoutExercise {
            exercise_id,
            name: exercise.name,
            sets: exercise.default_sets,
            reps: exercise.default_reps,
            order: 0,
        });
    }

    let id = store.create_workout(&NewWorkout::template(title, slots))?;
    if json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("Created workout {id}: {}", title.trim());
    Ok(())
}

fn log(id: i64, duration: i64, weight: f64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if duration < 0 {
        return Err(Error::InvalidArgument("duration must not be negative".into()));
    }
    let mut store = open_store(db_path)?;
    let workout = get_workout(&store, id)?;

    let exercises_done = workout
        .exercises
        .iter()
        .map(|slot| {
            let sets = (0..slot.sets)
                .map(|_| SetLog {
                    reps: slot.reps,
                    weight,
                    completed: true,
                })
                .collect();
            PerformedExercise::from_template(slot, sets)
        })
        .collect();

    let session_id = store.log_session(&NewWorkoutSession {
        workout_id: id,
        date: None,
        duration_seconds: duration,
        exercises_done,
        calories_burned: 0,
    })?;

    if json {
        return print_json(&serde_json::json!({ "id": session_id, "workout_id": id }));
    }
    println!("Logged session {session_id} for workout {id}");
    Ok(())
}

fn quick(args: &QuickLogArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut store = open_store(db_path)?;
    let exercise = store.get_exercise(args.exercise)?.ok_or(Error::RecordNotFound {
        entity: "Exercise",
        id: args.exercise,
    })?;

    let performed = PerformedExercise {
        exercise_id: exercise.id,
        name: exercise.name,
        sets: args.sets,
        reps: args.reps,
        weight: args.weight,
        duration: args.duration,
        is_timed: exercise.is_timed,
        ..PerformedExercise::default()
    };
    let name = performed.name.clone();
    let id = store.quick_log(performed)?;

    if json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("Logged {name}");
    Ok(())
}

fn print_workout(workout: &Workout) {
    println!(
        "{}",
        workout.title.as_deref().unwrap_or("(untitled)").bold()
    );
    for slot in &workout.exercises {
        println!(
            "  {}. {} ({} x {})",
            slot.order + 1,
            slot.name,
            slot.sets,
            slot.reps
        );
    }
}
