//! CLI definitions using clap.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// FitLog - local workout, nutrition and weight store
#[derive(Parser, Debug)]
#[command(name = "fitlog", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store path (default: <data dir>/fitlog/SQLite/fitlog.db)
    #[arg(long, global = true, env = "FITLOG_DB")]
    pub db: Option<PathBuf>,

    /// Staging directory for backups (default: <cache dir>/fitlog)
    #[arg(long, global = true, env = "FITLOG_STAGING_DIR")]
    pub staging: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the store (or upgrade an existing one) and report what changed
    Init,

    /// Print version information
    Version,

    /// Show store location, record counts and today's summary
    Status,

    /// User profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Exercise library
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Food log
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },

    /// Body-weight log
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },

    /// Workout templates and session log
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },

    /// Backup and restore the whole store
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },

    /// Delete every record (the exercise catalog is re-seeded on next open)
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Profile Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the current profile
    Show,

    /// Create or update the profile
    Set(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    /// Height in centimetres
    #[arg(long)]
    pub height: Option<f64>,

    /// Starting weight in kilograms
    #[arg(long)]
    pub starting_weight: Option<f64>,

    #[arg(long)]
    pub activity_level: Option<String>,

    #[arg(long)]
    pub goal: Option<String>,
}

// ============================================================================
// Exercise Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ExerciseCommands {
    /// List exercises
    List {
        /// Only this category (Barbell, Dumbbell, Bodyweight, ...)
        #[arg(long, short)]
        category: Option<String>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Search by name or muscle group
    Search {
        query: String,
    },

    /// Show one exercise with its cues
    Show {
        id: i64,
    },

    /// Toggle the favorite flag
    Favorite {
        id: i64,
    },

    /// Add a custom exercise
    Add(ExerciseAddArgs),
}

#[derive(Args, Debug)]
pub struct ExerciseAddArgs {
    pub name: String,

    #[arg(long, short)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub muscles: String,

    #[arg(long, default_value = "")]
    pub equipment: String,

    #[arg(long, default_value_t = 3)]
    pub sets: i64,

    #[arg(long, default_value_t = 10)]
    pub reps: i64,

    /// Reps are seconds
    #[arg(long)]
    pub timed: bool,

    /// Coaching cue (repeatable)
    #[arg(long = "cue")]
    pub cues: Vec<String>,

    #[arg(long)]
    pub note: Option<String>,
}

// ============================================================================
// Food Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum FoodCommands {
    /// Log a food entry
    Add {
        name: String,

        #[arg(long)]
        calories: f64,

        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        #[arg(long, default_value_t = 0.0)]
        fat: f64,
    },

    /// Entries and totals for a day (default: today)
    List {
        /// Local date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete an entry
    Delete {
        id: i64,
    },
}

// ============================================================================
// Weight Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum WeightCommands {
    /// Log a weight sample (kg)
    Add {
        weight: f64,

        #[arg(long)]
        note: Option<String>,
    },

    /// Recent samples, newest first
    History {
        #[arg(long, short)]
        limit: Option<u32>,
    },

    /// Most recent sample
    Latest,
}

// ============================================================================
// Workout Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum WorkoutCommands {
    /// Create a template from exercise ids, in order
    Create {
        title: String,

        /// Exercise ids
        #[arg(long = "exercise", required = true)]
        exercises: Vec<i64>,
    },

    /// List templates, newest first
    List,

    /// Show a template
    Show {
        id: i64,
    },

    /// Delete a template (its sessions are kept)
    Delete {
        id: i64,
    },

    /// Log a completed session of a template, every set done as planned
    Log {
        id: i64,

        #[arg(long, default_value_t = 0)]
        duration: i64,

        /// Weight used for every set (kg)
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
    },

    /// Log a single exercise without a template
    Quick(QuickLogArgs),

    /// Session history, most recent first
    History {
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct QuickLogArgs {
    /// Exercise id
    pub exercise: i64,

    #[arg(long, default_value_t = 3)]
    pub sets: i64,

    #[arg(long, default_value_t = 0)]
    pub reps: i64,

    #[arg(long, default_value_t = 0.0)]
    pub weight: f64,

    /// Seconds, for timed exercises
    #[arg(long, default_value_t = 0)]
    pub duration: i64,
}

// ============================================================================
// Backup Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Snapshot the store and deliver it
    Export {
        /// Copy the backup into this directory
        #[arg(long, conflicts_with = "drive")]
        to: Option<PathBuf>,

        /// Upload the backup to Google Drive
        #[arg(long)]
        drive: bool,

        /// Drive access token
        #[arg(long, env = "FITLOG_DRIVE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Replace the store with a backup file (path or file:// URI)
    Import {
        source: String,

        /// Confirm replacing the current store
        #[arg(long)]
        yes: bool,
    },

    /// List backups on Google Drive, newest first
    List {
        #[arg(long, env = "FITLOG_DRIVE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Download a Drive backup and restore from it
    Pull {
        /// Drive file id (see `fitlog backup list`)
        id: String,

        #[arg(long, env = "FITLOG_DRIVE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Confirm replacing the current store
        #[arg(long)]
        yes: bool,
    },
}
