//! Database schema definitions and startup schema checks.
//!
//! Tables are described once in [`TABLES`]. The same descriptions drive the
//! `CREATE TABLE` statements and the column-presence migrations in
//! [`super::migrations`], so a column added here is picked up by both.

use rusqlite::Connection;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::catalog;
use super::migrations;

/// Default busy timeout for a freshly opened connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A non-key column and its declaration.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    /// Type and default, valid in both `CREATE TABLE` and `ADD COLUMN`.
    pub decl: &'static str,
}

/// A table owned by the store.
///
/// Every table has an `id INTEGER PRIMARY KEY AUTOINCREMENT` key, which is
/// not listed in `columns` because SQLite cannot add a key column later.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub constraints: &'static [&'static str],
}

const fn col(name: &'static str, decl: &'static str) -> ColumnDef {
    ColumnDef { name, decl }
}

pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        col("name", "TEXT"),
        col("email", "TEXT"),
        col("phone", "TEXT"),
        col("dob", "TEXT"),
        col("gender", "TEXT"),
        col("height", "REAL"),
        col("starting_weight", "REAL"),
        col("activity_level", "TEXT"),
        col("goal", "TEXT"),
        col("created_at", "TEXT"),
    ],
    constraints: &[],
};

pub const EXERCISES: TableDef = TableDef {
    name: "exercises",
    columns: &[
        col("name", "TEXT"),
        col("category", "TEXT"),
        col("muscles", "TEXT"),
        col("equipment", "TEXT"),
        col("default_sets", "INTEGER"),
        col("default_reps", "INTEGER"),
        col("is_timed", "INTEGER DEFAULT 0"),
        col("demo_video_url", "TEXT"),
        col("cues", "TEXT"),
        col("is_favorite", "INTEGER DEFAULT 0"),
        col("is_custom", "INTEGER DEFAULT 0"),
        col("note", "TEXT"),
    ],
    constraints: &[],
};

pub const WORKOUTS: TableDef = TableDef {
    name: "workouts",
    columns: &[
        col("title", "TEXT"),
        col("exercises", "TEXT"),
        col("is_template", "INTEGER DEFAULT 0"),
        col("created_at", "TEXT"),
    ],
    constraints: &[],
};

pub const WORKOUT_SESSIONS: TableDef = TableDef {
    name: "workout_sessions",
    columns: &[
        col("workout_id", "INTEGER"),
        col("date", "TEXT"),
        col("duration_seconds", "INTEGER"),
        col("exercises_done", "TEXT"),
        col("calories_burned", "INTEGER"),
    ],
    // Declared only: foreign keys stay off, quick logs use workout_id = 0.
    constraints: &["FOREIGN KEY (workout_id) REFERENCES workouts (id)"],
};

pub const FOOD_ENTRIES: TableDef = TableDef {
    name: "food_entries",
    columns: &[
        col("name", "TEXT"),
        col("calories", "INTEGER"),
        col("protein", "INTEGER"),
        col("carbs", "INTEGER"),
        col("fat", "INTEGER"),
        col("timestamp", "TEXT"),
    ],
    constraints: &[],
};

pub const WEIGHTS: TableDef = TableDef {
    name: "weights",
    columns: &[
        col("weight", "REAL"),
        col("timestamp", "TEXT"),
        col("note", "TEXT"),
    ],
    constraints: &[],
};

/// Every table, in creation and migration order.
///
/// `exercises` must exist in its final shape before seeding, which runs
/// after all of these.
pub const TABLES: &[TableDef] = &[
    USERS,
    EXERCISES,
    WORKOUTS,
    WORKOUT_SESSIONS,
    FOOD_ENTRIES,
    WEIGHTS,
];

/// Indexes for the date-ranged queries. Optional: failure is tolerated.
const INDEXES_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_food_entries_timestamp ON food_entries(timestamp);
CREATE INDEX IF NOT EXISTS idx_weights_timestamp ON weights(timestamp);
CREATE INDEX IF NOT EXISTS idx_workout_sessions_date ON workout_sessions(date);
";

impl TableDef {
    /// `CREATE TABLE IF NOT EXISTS` statement for this table.
    #[must_use]
    pub fn create_sql(&self) -> String {
        let mut parts = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
        parts.extend(self.columns.iter().map(|c| format!("{} {}", c.name, c.decl)));
        parts.extend(self.constraints.iter().map(|c| (*c).to_string()));
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            parts.join(",\n    ")
        )
    }
}

/// A schema step that failed during startup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StructuralIssue {
    /// Step name, e.g. `create:workouts` or `workouts.title`.
    pub step: String,
    pub message: String,
}

/// What `ensure_schema` did.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SchemaReport {
    /// Columns added this run, as `table.column`.
    pub added_columns: Vec<String>,
    /// Catalog rows inserted (0 unless `exercises` was empty).
    pub seeded_exercises: usize,
    /// Steps that failed and were skipped.
    pub issues: Vec<StructuralIssue>,
}

impl SchemaReport {
    /// True when every step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn record_issue(&mut self, step: impl Into<String>, err: &dyn std::fmt::Display) {
        let step = step.into();
        warn!(step = %step, error = %err, "Schema step failed, continuing");
        self.issues.push(StructuralIssue {
            step,
            message: err.to_string(),
        });
    }
}

/// Configure a connection before any other statement runs.
///
/// # Errors
///
/// Returns an error if a pragma cannot be set.
pub fn configure_connection(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    Ok(())
}

/// Bring the store to the current table shapes and seed the catalog.
///
/// Idempotent and safe on every startup. Never drops, renames or rewrites
/// existing data. Failing steps are logged and listed in the report; the
/// remaining steps still run.
pub fn ensure_schema(conn: &mut Connection) -> SchemaReport {
    let mut report = SchemaReport::default();

    for table in TABLES {
        if let Err(e) = conn.execute_batch(&table.create_sql()) {
            report.record_issue(format!("create:{}", table.name), &e);
        }
    }

    migrations::run_migrations(conn, &mut report);

    if let Err(e) = conn.execute_batch(INDEXES_SQL) {
        report.record_issue("indexes", &e);
    }

    match catalog::seed_if_empty(conn) {
        Ok(0) => debug!("Exercise catalog already present"),
        Ok(n) => {
            info!(count = n, "Seeded default exercises");
            report.seeded_exercises = n;
        }
        Err(e) => report.record_issue("seed:exercises", &e),
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, DEFAULT_BUSY_TIMEOUT).unwrap();
        conn
    }

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .unwrap()
            .query_map([table], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_ensure_schema_creates_all_tables() {
        let mut conn = open();
        let report = ensure_schema(&mut conn);
        assert!(report.is_clean(), "{:?}", report.issues);

        for table in TABLES {
            let cols = column_names(&conn, table.name);
            assert_eq!(cols.len(), table.columns.len() + 1, "{}", table.name);
            assert_eq!(cols[0], "id");
        }
    }

    #[test]
    fn test_schema_is_idempotent() {
        let mut conn = open();
        let first = ensure_schema(&mut conn);
        conn.execute(
            "INSERT INTO weights (weight, timestamp) VALUES (80.5, '2025-01-01T08:00:00.000Z')",
            [],
        )
        .unwrap();
        let before: Vec<Vec<String>> = TABLES.iter().map(|t| column_names(&conn, t.name)).collect();

        for _ in 0..3 {
            let again = ensure_schema(&mut conn);
            assert!(again.is_clean());
            assert!(again.added_columns.is_empty());
            assert_eq!(again.seeded_exercises, 0);
        }

        let after: Vec<Vec<String>> = TABLES.iter().map(|t| column_names(&conn, t.name)).collect();
        assert_eq!(before, after);
        assert!(first.seeded_exercises > 0);

        let weights: i64 = conn
            .query_row("SELECT COUNT(*) FROM weights", [], |row| row.get(0))
            .unwrap();
        assert_eq!(weights, 1);
    }

    #[test]
    fn test_seed_runs_only_on_empty_exercises() {
        let mut conn = open();
        let report = ensure_schema(&mut conn);
        assert_eq!(report.seeded_exercises, catalog::DEFAULT_CATALOG.len());

        conn.execute("DELETE FROM exercises WHERE id > 1", []).unwrap();
        let report = ensure_schema(&mut conn);
        assert_eq!(report.seeded_exercises, 0);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_quick_log_with_workout_zero_is_accepted() {
        let mut conn = open();
        ensure_schema(&mut conn);

        let result = conn.execute(
            "INSERT INTO workout_sessions (workout_id, date, duration_seconds, exercises_done, calories_burned)
             VALUES (0, '2025-01-01T08:00:00.000Z', 0, '[]', 0)",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_wal_enabled_for_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let conn = Connection::open(dir.path().join("fitlog.db")).unwrap();
        configure_connection(&conn, DEFAULT_BUSY_TIMEOUT).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_create_sql_lists_constraints_last() {
        let sql = WORKOUT_SESSIONS.create_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS workout_sessions"));
        assert!(sql.trim_end_matches(')').trim_end().ends_with("REFERENCES workouts (id)"));
    }
}
