//! SQLite storage implementation.
//!
//! [`FitStore`] owns the single connection to the store file. It is opened
//! once by the application's composition root and passed to whatever needs
//! it: `&FitStore` for reads, `&mut FitStore` for writes. Multi-statement
//! writes go through [`FitStore::mutate`], which wraps them in one
//! transaction.

use crate::error::{Error, Result};
use crate::model::{
    DEFAULT_WEIGHT_HISTORY, Exercise, FoodEntry, NewExercise, NewFoodEntry, NewWorkout,
    NewWorkoutSession, NutritionTotals, PerformedExercise, QUICK_LOG_WORKOUT_ID, User,
    UserProfile, WeightSample, Workout, WorkoutSession,
};
use crate::storage::codec::{
    contains_pattern, decode_column, encode, format_timestamp, local_day_bounds, local_today,
    now_timestamp,
};
use crate::storage::schema::{
    DEFAULT_BUSY_TIMEOUT, SchemaReport, TABLES, configure_connection, ensure_schema,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, Transaction};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// SQLite-based store for all FitLog records.
#[derive(Debug)]
pub struct FitStore {
    conn: Connection,
    path: Option<PathBuf>,
    schema_report: SchemaReport,
}

/// Row counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreCounts {
    pub users: usize,
    pub exercises: usize,
    pub workouts: usize,
    pub workout_sessions: usize,
    pub food_entries: usize,
    pub weights: usize,
}

impl StoreCounts {
    /// Returns total number of records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.users
            + self.exercises
            + self.workouts
            + self.workout_sessions
            + self.food_entries
            + self.weights
    }

    fn set(&mut self, table: &str, count: usize) {
        match table {
            "users" => self.users = count,
            "exercises" => self.exercises = count,
            "workouts" => self.workouts = count,
            "workout_sessions" => self.workout_sessions = count,
            "food_entries" => self.food_entries = count,
            "weights" => self.weights = count,
            _ => {}
        }
    }
}

impl FitStore {
    /// Open the store at the given path.
    ///
    /// Creates the file and its directory if needed, configures the
    /// connection, then runs the startup schema checks. Schema problems do
    /// not fail the open; see [`FitStore::schema_report`].
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or configured.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open the store with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or configured.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let timeout = timeout_ms.map_or(DEFAULT_BUSY_TIMEOUT, Duration::from_millis);
        configure_connection(&conn, timeout)?;

        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
            schema_report: SchemaReport::default(),
        };
        store.ensure_schema();
        info!(path = %path.display(), "Store opened");
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure_connection(&conn, DEFAULT_BUSY_TIMEOUT)?;
        let mut store = Self {
            conn,
            path: None,
            schema_report: SchemaReport::default(),
        };
        store.ensure_schema();
        Ok(store)
    }

    /// Re-run the startup schema checks. Idempotent.
    pub fn ensure_schema(&mut self) -> SchemaReport {
        let report = ensure_schema(&mut self.conn);
        if !report.added_columns.is_empty() {
            info!(columns = ?report.added_columns, "Store schema upgraded");
        }
        self.schema_report = report.clone();
        report
    }

    /// Result of the most recent schema check.
    #[must_use]
    pub fn schema_report(&self) -> &SchemaReport {
        &self.schema_report
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Path of the store file, `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, returning the store path.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite refuses to close (e.g. unfinalized statements).
    pub fn close(self) -> Result<Option<PathBuf>> {
        let Self { conn, path, .. } = self;
        conn.close().map_err(|(_, e)| Error::Database(e))?;
        Ok(path)
    }

    /// Execute a multi-statement write in one IMMEDIATE transaction.
    ///
    /// The transaction is rolled back if the closure fails.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        debug!(op, "Mutation committed");
        Ok(result)
    }

    // ===============
    // User Operations
    // ===============

    /// The current user: the row with the lowest id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn current_user(&self) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, phone, dob, gender, height, starting_weight,
                        activity_level, goal, created_at
                 FROM users ORDER BY id ASC LIMIT 1",
                [],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// When the current user's profile was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn account_created_at(&self) -> Result<Option<String>> {
        Ok(self.current_user()?.and_then(|u| u.created_at))
    }

    /// Save the profile: update the current user, or create it if none exists.
    ///
    /// Returns the user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or write fails.
    pub fn save_user(&mut self, profile: &UserProfile) -> Result<i64> {
        self.mutate("save_user", |tx| {
            let existing: Option<i64> = tx
                .query_row("SELECT id FROM users ORDER BY id ASC LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?;

            let p = profile;
            if let Some(id) = existing {
                tx.execute(
                    "UPDATE users SET name = ?1, email = ?2, phone = ?3, dob = ?4, gender = ?5,
                        height = ?6, starting_weight = ?7, activity_level = ?8, goal = ?9
                     WHERE id = ?10",
                    rusqlite::params![
                        p.name, p.email, p.phone, p.dob, p.gender, p.height, p.starting_weight,
                        p.activity_level, p.goal, id
                    ],
                )?;
                Ok(id)
            } else {
                tx.execute(
                    "INSERT INTO users (name, email, phone, dob, gender, height, starting_weight,
                        activity_level, goal, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    rusqlite::params![
                        p.name, p.email, p.phone, p.dob, p.gender, p.height, p.starting_weight,
                        p.activity_level, p.goal, now_timestamp()
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            }
        })
    }

    // ===================
    // Exercise Operations
    // ===================

    /// All exercises ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.query_exercises("1 = 1", &[])
    }

    /// Exercises in one category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_exercises_by_category(&self, category: &str) -> Result<Vec<Exercise>> {
        self.query_exercises("category = ?1", &[&category])
    }

    /// Exercises whose name or muscles contain `query`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>> {
        let pattern = contains_pattern(query.trim());
        self.query_exercises(
            "(name LIKE ?1 ESCAPE '\\' OR muscles LIKE ?1 ESCAPE '\\')",
            &[&pattern],
        )
    }

    /// Exercises marked favorite, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn favorite_exercises(&self) -> Result<Vec<Exercise>> {
        self.query_exercises("is_favorite = 1", &[])
    }

    /// Get an exercise by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_exercise(&self, id: i64) -> Result<Option<Exercise>> {
        let sql = format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], map_exercise).optional()?)
    }

    fn query_exercises(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Exercise>> {
        let sql = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE {filter}
             ORDER BY name COLLATE NOCASE, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, map_exercise)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Flip an exercise's favorite flag. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] for an unknown id.
    pub fn toggle_favorite(&mut self, id: i64) -> Result<bool> {
        let flag: Option<bool> = self
            .conn
            .query_row(
                "UPDATE exercises
                 SET is_favorite = CASE WHEN COALESCE(is_favorite, 0) = 0 THEN 1 ELSE 0 END
                 WHERE id = ?1
                 RETURNING is_favorite",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        flag.ok_or(Error::RecordNotFound {
            entity: "Exercise",
            id,
        })
    }

    /// Add a user-defined exercise. Always stored with `is_custom = true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub fn add_custom_exercise(&mut self, exercise: &NewExercise) -> Result<i64> {
        if exercise.name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "exercise name must not be empty".to_string(),
            ));
        }
        let id = insert_exercise_row(&self.conn, exercise, true)?;
        info!(id, name = %exercise.name, "Custom exercise added");
        Ok(id)
    }

    // ===============
    // Food Operations
    // ===============

    /// Log a food entry. The timestamp defaults to now.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_food_entry(&mut self, entry: &NewFoodEntry) -> Result<i64> {
        let timestamp = entry.timestamp.map_or_else(now_timestamp, format_timestamp);
        self.conn.execute(
            "INSERT INTO food_entries (name, calories, protein, carbs, fat, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                entry.name,
                entry.calories,
                entry.protein,
                entry.carbs,
                entry.fat,
                timestamp
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Food entries logged on a local calendar day, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn food_entries_on(&self, day: NaiveDate) -> Result<Vec<FoodEntry>> {
        let (start, end) = local_day_bounds(day);
        let mut stmt = self.conn.prepare(
            "SELECT id, COALESCE(name, ''), COALESCE(calories, 0), COALESCE(protein, 0),
                    COALESCE(carbs, 0), COALESCE(fat, 0), timestamp
             FROM food_entries
             WHERE timestamp >= ?1 AND timestamp < ?2
             ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([start, end], |row| {
                Ok(FoodEntry {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    calories: row.get(2)?,
                    protein: row.get(3)?,
                    carbs: row.get(4)?,
                    fat: row.get(5)?,
                    timestamp: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Food entries logged today (local time).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn today_food_entries(&self) -> Result<Vec<FoodEntry>> {
        self.food_entries_on(local_today())
    }

    /// Summed macros for a local calendar day. Zero-filled when empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn totals_on(&self, day: NaiveDate) -> Result<NutritionTotals> {
        let (start, end) = local_day_bounds(day);
        let totals = self.conn.query_row(
            "SELECT COALESCE(SUM(calories), 0), COALESCE(SUM(protein), 0),
                    COALESCE(SUM(carbs), 0), COALESCE(SUM(fat), 0)
             FROM food_entries
             WHERE timestamp >= ?1 AND timestamp < ?2",
            [start, end],
            |row| {
                Ok(NutritionTotals {
                    calories: row.get(0)?,
                    protein: row.get(1)?,
                    carbs: row.get(2)?,
                    fat: row.get(3)?,
                })
            },
        )?;
        Ok(totals)
    }

    /// Today's summed macros (local time).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn today_totals(&self) -> Result<NutritionTotals> {
        self.totals_on(local_today())
    }

    /// Delete a food entry. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_food_entry(&mut self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM food_entries WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    // =================
    // Weight Operations
    // =================

    /// Log a weight sample. The timestamp defaults to now.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_weight(
        &mut self,
        weight: f64,
        note: Option<&str>,
        at: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let timestamp = at.map_or_else(now_timestamp, format_timestamp);
        self.conn.execute(
            "INSERT INTO weights (weight, timestamp, note) VALUES (?1, ?2, ?3)",
            rusqlite::params![weight, timestamp, note],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent weight samples, newest first. Defaults to 30.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn weight_history(&self, limit: Option<u32>) -> Result<Vec<WeightSample>> {
        let limit = limit.unwrap_or(DEFAULT_WEIGHT_HISTORY);
        let mut stmt = self.conn.prepare(
            "SELECT id, COALESCE(weight, 0), timestamp, note
             FROM weights ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit], map_weight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The most recent weight sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn latest_weight(&self) -> Result<Option<WeightSample>> {
        let sample = self
            .conn
            .query_row(
                "SELECT id, COALESCE(weight, 0), timestamp, note
                 FROM weights ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                map_weight,
            )
            .optional()?;
        Ok(sample)
    }

    // ==================
    // Workout Operations
    // ==================

    /// Save a workout. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or the insert fails.
    pub fn create_workout(&mut self, workout: &NewWorkout) -> Result<i64> {
        if workout.title.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "workout title must not be empty".to_string(),
            ));
        }
        self.conn.execute(
            "INSERT INTO workouts (title, exercises, is_template, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                workout.title,
                encode(&workout.exercises)?,
                workout.is_template,
                now_timestamp()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, title = %workout.title, "Workout saved");
        Ok(id)
    }

    /// Workout templates, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_templates(&self) -> Result<Vec<Workout>> {
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts
             WHERE is_template = 1
             ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_workout)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Get a workout by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored exercise list is invalid.
    pub fn get_workout(&self, id: i64) -> Result<Option<Workout>> {
        let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], map_workout).optional()?)
    }

    /// Delete a workout. Sessions that referenced it are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_workout(&mut self, id: i64) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    // ==================
    // Session Operations
    // ==================

    /// Append a workout session. The date defaults to now.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn log_session(&mut self, session: &NewWorkoutSession) -> Result<i64> {
        let date = session.date.map_or_else(now_timestamp, format_timestamp);
        self.conn.execute(
            "INSERT INTO workout_sessions (workout_id, date, duration_seconds, exercises_done, calories_burned)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                session.workout_id,
                date,
                session.duration_seconds,
                encode(&session.exercises_done)?,
                session.calories_burned
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, workout_id = session.workout_id, "Session logged");
        Ok(id)
    }

    /// Log a single exercise without a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn quick_log(&mut self, performed: PerformedExercise) -> Result<i64> {
        self.log_session(&NewWorkoutSession {
            workout_id: QUICK_LOG_WORKOUT_ID,
            date: None,
            duration_seconds: 0,
            exercises_done: vec![performed],
            calories_burned: 0,
        })
    }

    /// All sessions, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sessions(&self) -> Result<Vec<WorkoutSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, COALESCE(workout_id, 0), COALESCE(date, ''), COALESCE(duration_seconds, 0),
                    exercises_done, COALESCE(calories_burned, 0)
             FROM workout_sessions ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(WorkoutSession {
                    id: row.get(0)?,
                    workout_id: row.get(1)?,
                    date: row.get(2)?,
                    duration_seconds: row.get(3)?,
                    exercises_done: decode_column(row, 4)?,
                    calories_burned: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of sessions on a local calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_sessions_on(&self, day: NaiveDate) -> Result<usize> {
        let (start, end) = local_day_bounds(day);
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM workout_sessions WHERE date >= ?1 AND date < ?2",
            [start, end],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ======================
    // Maintenance Operations
    // ======================

    /// Row counts for every table.
    ///
    /// # Errors
    ///
    /// Returns an error if any count fails.
    pub fn table_counts(&self) -> Result<StoreCounts> {
        let mut counts = StoreCounts::default();
        for table in TABLES {
            let n: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table.name),
                [],
                |row| row.get(0),
            )?;
            counts.set(table.name, usize::try_from(n).unwrap_or(0));
        }
        Ok(counts)
    }

    /// Delete every row of every table in one transaction.
    ///
    /// Returns the counts that were removed. The next schema check re-seeds
    /// the exercise catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if any delete fails; nothing is deleted in that case.
    pub fn reset_all(&mut self) -> Result<StoreCounts> {
        let removed = self.mutate("reset_all", |tx| {
            let mut counts = StoreCounts::default();
            for table in TABLES.iter().rev() {
                let n = tx.execute(&format!("DELETE FROM {}", table.name), [])?;
                counts.set(table.name, n);
            }
            Ok(counts)
        })?;
        info!(rows = removed.total(), "Store reset");
        Ok(removed)
    }
}

// ===========
// Row mapping
// ===========

const EXERCISE_COLUMNS: &str = "id, COALESCE(name, ''), COALESCE(category, ''),
    COALESCE(muscles, ''), COALESCE(equipment, ''), COALESCE(default_sets, 0),
    COALESCE(default_reps, 0), COALESCE(is_timed, 0), demo_video_url, cues,
    COALESCE(is_favorite, 0), COALESCE(is_custom, 0), note";

const WORKOUT_COLUMNS: &str = "id, title, exercises, COALESCE(is_template, 0), created_at";

fn map_exercise(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        muscles: row.get(3)?,
        equipment: row.get(4)?,
        default_sets: row.get(5)?,
        default_reps: row.get(6)?,
        is_timed: row.get(7)?,
        demo_video_url: row.get(8)?,
        cues: decode_column(row, 9)?,
        is_favorite: row.get(10)?,
        is_custom: row.get(11)?,
        note: row.get(12)?,
    })
}

fn map_workout(row: &Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        title: row.get(1)?,
        exercises: decode_column(row, 2)?,
        is_template: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_weight(row: &Row<'_>) -> rusqlite::Result<WeightSample> {
    Ok(WeightSample {
        id: row.get(0)?,
        weight: row.get(1)?,
        timestamp: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        note: row.get(3)?,
    })
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        dob: row.get(4)?,
        gender: row.get(5)?,
        height: row.get(6)?,
        starting_weight: row.get(7)?,
        activity_level: row.get(8)?,
        goal: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert one exercise row. Shared by catalog seeding and custom adds.
pub(crate) fn insert_exercise_row(
    conn: &Connection,
    ex: &NewExercise,
    is_custom: bool,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO exercises (name, category, muscles, equipment, default_sets, default_reps,
            is_timed, demo_video_url, cues, is_favorite, is_custom, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11)",
        rusqlite::params![
            ex.name.trim(),
            ex.category,
            ex.muscles,
            ex.equipment,
            ex.default_sets,
            ex.default_reps,
            ex.is_timed,
            ex.demo_video_url,
            encode(&ex.cues)?,
            is_custom,
            ex.note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExerciseCategory, SetLog, WorkoutExercise};
    use crate::storage::catalog::DEFAULT_CATALOG;
    use chrono::{Duration as ChronoDuration, Local, TimeZone};

    fn local_noon(day: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_open_memory() {
        let storage = FitStore::open_memory();
        assert!(storage.is_ok());
        assert!(storage.unwrap().schema_report().is_clean());
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("SQLite").join("fitlog.db");
        let store = FitStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_user_is_singleton() {
        let mut store = FitStore::open_memory().unwrap();
        assert!(store.current_user().unwrap().is_none());

        let mut profile = UserProfile {
            name: Some("Sam".into()),
            goal: Some("Build Muscle".into()),
            height: Some(178.0),
            ..UserProfile::default()
        };
        let first = store.save_user(&profile).unwrap();

        profile.goal = Some("Lose Weight".into());
        let second = store.save_user(&profile).unwrap();
        assert_eq!(first, second);

        let user = store.current_user().unwrap().unwrap();
        assert_eq!(user.goal.as_deref(), Some("Lose Weight"));
        assert!(user.created_at.is_some());
        assert_eq!(store.account_created_at().unwrap(), user.created_at);
        assert_eq!(store.table_counts().unwrap().users, 1);
    }

    #[test]
    fn test_current_user_is_lowest_id() {
        let store = FitStore::open_memory().unwrap();
        store
            .conn()
            .execute_batch(
                "INSERT INTO users (id, name) VALUES (7, 'Later');
                 INSERT INTO users (id, name) VALUES (3, 'First');",
            )
            .unwrap();
        let user = store.current_user().unwrap().unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.name.as_deref(), Some("First"));
    }

    #[test]
    fn test_list_exercises_ordered_by_name() {
        let store = FitStore::open_memory().unwrap();
        let all = store.list_exercises().unwrap();
        assert_eq!(all.len(), DEFAULT_CATALOG.len());
        let names: Vec<_> = all.iter().map(|e| e.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(all.iter().all(|e| !e.is_custom && !e.is_favorite));
        assert_eq!(all.iter().find(|e| e.name == "Plank").unwrap().cues.0.len(), 5);
    }

    #[test]
    fn test_list_by_category() {
        let store = FitStore::open_memory().unwrap();
        let core = store.list_exercises_by_category("Core").unwrap();
        let names: Vec<_> = core.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Hanging Leg Raises", "Plank"]);
    }

    #[test]
    fn test_search_matches_name_or_muscles() {
        let mut store = FitStore::open_memory().unwrap();
        store.reset_all().unwrap();

        let add = |store: &mut FitStore, name: &str, muscles: &str| {
            store
                .add_custom_exercise(
                    &NewExercise::custom(name, ExerciseCategory::Dumbbell).with_muscles(muscles),
                )
                .unwrap()
        };
        add(&mut store, "Bicep Curl", "Arms");
        add(&mut store, "Chin-up", "Lats, Biceps");
        add(&mut store, "Calf Raise", "Calves");

        let hits = store.search_exercises("bicep").unwrap();
        let names: Vec<_> = hits.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bicep Curl", "Chin-up"]);

        let upper = store.search_exercises("BICEP").unwrap();
        assert_eq!(upper.len(), 2);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let mut store = FitStore::open_memory().unwrap();
        store
            .add_custom_exercise(&NewExercise::custom("Farmer's 100% Carry", ExerciseCategory::Core))
            .unwrap();

        let hits = store.search_exercises("100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Farmer's 100% Carry");
        assert!(store.search_exercises("_").unwrap().is_empty());
    }

    #[test]
    fn test_toggle_favorite_is_involutive() {
        let mut store = FitStore::open_memory().unwrap();
        let ex = store.list_exercises().unwrap().remove(0);
        let original = ex.is_favorite;

        assert_eq!(store.toggle_favorite(ex.id).unwrap(), !original);
        assert_eq!(store.favorite_exercises().unwrap().len(), 1);
        assert_eq!(store.toggle_favorite(ex.id).unwrap(), original);

        let after = store.get_exercise(ex.id).unwrap().unwrap();
        assert_eq!(after.is_favorite, original);
    }

    #[test]
    fn test_toggle_favorite_unknown_id() {
        let mut store = FitStore::open_memory().unwrap();
        let result = store.toggle_favorite(9_999);
        assert!(matches!(result, Err(Error::RecordNotFound { id: 9_999, .. })));
    }

    #[test]
    fn test_custom_exercise_forces_flag() {
        let mut store = FitStore::open_memory().unwrap();
        let id = store
            .add_custom_exercise(
                &NewExercise::custom("Sled Push", ExerciseCategory::Cardio).timed(true),
            )
            .unwrap();
        let ex = store.get_exercise(id).unwrap().unwrap();
        assert!(ex.is_custom);
        assert!(ex.is_timed);

        let blank = NewExercise::custom("   ", ExerciseCategory::Cardio);
        assert!(matches!(
            store.add_custom_exercise(&blank),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_today_totals_exclude_yesterday() {
        let mut store = FitStore::open_memory().unwrap();
        let today = local_today();
        let yesterday = today.pred_opt().unwrap();

        store
            .add_food_entry(&NewFoodEntry::new("Oats", 100.0, 10.0, 20.0, 3.0).at(local_noon(today)))
            .unwrap();
        store
            .add_food_entry(&NewFoodEntry::new("Chicken", 200.0, 20.0, 0.0, 5.0).at(local_noon(today)))
            .unwrap();
        store
            .add_food_entry(
                &NewFoodEntry::new("Pizza", 900.0, 30.0, 100.0, 40.0).at(local_noon(yesterday)),
            )
            .unwrap();

        let totals = store.totals_on(today).unwrap();
        assert_eq!(
            totals,
            NutritionTotals {
                calories: 300.0,
                protein: 30.0,
                carbs: 20.0,
                fat: 8.0,
            }
        );
        assert_eq!(store.food_entries_on(today).unwrap().len(), 2);
        assert_eq!(store.food_entries_on(yesterday).unwrap().len(), 1);
    }

    #[test]
    fn test_totals_zero_filled_when_empty() {
        let store = FitStore::open_memory().unwrap();
        assert_eq!(store.today_totals().unwrap(), NutritionTotals::default());
        assert!(store.today_food_entries().unwrap().is_empty());
    }

    #[test]
    fn test_food_entry_defaults_to_now_and_deletes() {
        let mut store = FitStore::open_memory().unwrap();
        let id = store
            .add_food_entry(&NewFoodEntry::new("Mac & Cheese \"large\"", 650.0, 20.0, 70.0, 30.0))
            .unwrap();

        let entries = store.today_food_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Mac & Cheese \"large\"");

        assert!(store.delete_food_entry(id).unwrap());
        assert!(!store.delete_food_entry(id).unwrap());
        assert!(store.today_food_entries().unwrap().is_empty());
    }

    #[test]
    fn test_weight_history_and_latest() {
        let mut store = FitStore::open_memory().unwrap();
        assert!(store.latest_weight().unwrap().is_none());

        let base = Utc::now() - ChronoDuration::days(40);
        for day in 0..35 {
            let w = 90.0 - f64::from(day) * 0.1;
            store
                .add_weight(w, None, Some(base + ChronoDuration::days(i64::from(day))))
                .unwrap();
        }
        store.add_weight(85.0, Some("after holiday"), None).unwrap();

        let history = store.weight_history(None).unwrap();
        assert_eq!(history.len(), 30);
        assert!(history.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(store.weight_history(Some(5)).unwrap().len(), 5);

        let latest = store.latest_weight().unwrap().unwrap();
        assert!((latest.weight - 85.0).abs() < f64::EPSILON);
        assert_eq!(latest.note.as_deref(), Some("after holiday"));
    }

    #[test]
    fn test_workout_templates_roundtrip() {
        let mut store = FitStore::open_memory().unwrap();
        let slot = |id: i64, name: &str| WorkoutExercise {
            exercise_id: id,
            name: name.to_string(),
            sets: 3,
            reps: 10,
            order: 0,
        };

        let legs = store
            .create_workout(&NewWorkout::template("Legs", [slot(1, "Squat"), slot(2, "Lunge")]))
            .unwrap();
        let push = store
            .create_workout(&NewWorkout::template("Push", [slot(3, "Bench")]))
            .unwrap();
        let mut adhoc = NewWorkout::template("One-off", []);
        adhoc.is_template = false;
        store.create_workout(&adhoc).unwrap();

        let templates = store.list_templates().unwrap();
        let ids: Vec<_> = templates.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![push, legs]);

        let loaded = store.get_workout(legs).unwrap().unwrap();
        assert_eq!(loaded.title.as_deref(), Some("Legs"));
        assert_eq!(loaded.exercises[1].name, "Lunge");
        assert_eq!(loaded.exercises[1].order, 1);

        assert!(store.delete_workout(legs).unwrap());
        assert!(store.get_workout(legs).unwrap().is_none());
    }

    #[test]
    fn test_sessions_keep_weak_reference() {
        let mut store = FitStore::open_memory().unwrap();
        let slot = WorkoutExercise {
            exercise_id: 1,
            name: "Row".into(),
            sets: 2,
            reps: 10,
            order: 0,
        };
        let workout = store
            .create_workout(&NewWorkout::template("Pull", [slot.clone()]))
            .unwrap();

        let sets = vec![
            SetLog { reps: 10, weight: 60.0, completed: true },
            SetLog { reps: 8, weight: 60.0, completed: true },
        ];
        store
            .log_session(&NewWorkoutSession {
                workout_id: workout,
                date: Some(Utc::now() - ChronoDuration::hours(2)),
                duration_seconds: 1_800,
                exercises_done: vec![PerformedExercise::from_template(&slot, sets)],
                calories_burned: 0,
            })
            .unwrap();
        store
            .quick_log(PerformedExercise {
                exercise_id: 4,
                name: "Plank".into(),
                sets: 3,
                duration: 60,
                is_timed: true,
                ..PerformedExercise::default()
            })
            .unwrap();

        store.delete_workout(workout).unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].is_quick_log());
        assert_eq!(sessions[1].workout_id, workout);
        assert_eq!(sessions[1].exercises_done[0].completed_sets(), 2);
        assert!(store.count_sessions_on(local_today()).unwrap() >= 1);
    }

    #[test]
    fn test_reset_then_reseed() {
        let mut store = FitStore::open_memory().unwrap();
        store.save_user(&UserProfile::default()).unwrap();
        store.add_weight(80.0, None, None).unwrap();
        store
            .add_food_entry(&NewFoodEntry::new("Apple", 95.0, 0.0, 25.0, 0.0))
            .unwrap();
        store
            .create_workout(&NewWorkout::template("Any", []))
            .unwrap();
        store.quick_log(PerformedExercise::default()).unwrap();

        let removed = store.reset_all().unwrap();
        assert_eq!(removed.exercises, DEFAULT_CATALOG.len());
        assert_eq!(store.table_counts().unwrap(), StoreCounts::default());

        let report = store.ensure_schema();
        assert_eq!(report.seeded_exercises, DEFAULT_CATALOG.len());

        let counts = store.table_counts().unwrap();
        assert_eq!(counts.exercises, DEFAULT_CATALOG.len());
        assert_eq!(counts.total(), DEFAULT_CATALOG.len());
    }

    #[test]
    fn test_legacy_rows_with_nulls_are_readable() {
        let store = FitStore::open_memory().unwrap();
        store
            .conn()
            .execute_batch(
                "INSERT INTO exercises (name, category, muscles, equipment, default_sets, default_reps, is_timed, is_custom)
                 VALUES ('Old Custom', 'Core', NULL, NULL, 3, 10, 0, 1);
                 INSERT INTO workout_sessions (workout_id, date, duration_seconds, exercises_done, calories_burned)
                 VALUES (0, '2024-01-01T10:00:00.000Z', 0, NULL, NULL);",
            )
            .unwrap();

        let found = store.search_exercises("old custom").unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].cues.is_empty());
        assert_eq!(found[0].muscles, "");

        let sessions = store.list_sessions().unwrap();
        assert!(sessions[0].exercises_done.is_empty());
    }

    #[test]
    fn test_quick_log_with_text_exercise_id_is_listed() {
        let mut store = FitStore::open_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO workout_sessions (workout_id, date, duration_seconds, exercises_done, calories_burned)
                 VALUES (0, '2024-01-01T10:00:00.000Z', 0, ?1, 0)",
                [r#"[{"exercise_id":"4","name":"Plank","sets":3,"reps":0,"weight":0,"duration":60,"is_timed":true}]"#],
            )
            .unwrap();
        store
            .quick_log(PerformedExercise {
                exercise_id: 1,
                name: "Push-up".into(),
                sets: 2,
                reps: 15,
                ..PerformedExercise::default()
            })
            .unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        let plank = sessions
            .iter()
            .find(|s| s.date.starts_with("2024-01-01"))
            .unwrap();
        let done = &plank.exercises_done[0];
        assert_eq!(done.exercise_id, 4);
        assert_eq!(done.name, "Plank");
        assert_eq!(done.duration, 60);
        assert!(done.is_timed);
    }
}
