//! Column-presence migrations.
//!
//! There is no version table. The migration state of a store is the set of
//! columns its tables actually have, so every startup introspects each table
//! and adds whatever the current [`TABLES`] definitions expect but the file
//! lacks. Steps are additive only: no drops, renames or row rewrites.

use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::schema::{SchemaReport, TABLES, TableDef};

/// One additive step: make `table.column` exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMigration {
    pub table: &'static str,
    pub column: &'static str,
    pub add_sql: String,
}

impl ColumnMigration {
    /// Step name used in logs and reports.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// Every column step for one table, in declaration order.
#[must_use]
pub fn steps_for(table: &TableDef) -> Vec<ColumnMigration> {
    table
        .columns
        .iter()
        .map(|c| ColumnMigration {
            table: table.name,
            column: c.name,
            add_sql: format!("ALTER TABLE {} ADD COLUMN {} {}", table.name, c.name, c.decl),
        })
        .collect()
}

/// Columns currently present in `table`. Empty if the table does not exist.
///
/// # Errors
///
/// Returns an error if the introspection query fails.
pub fn present_columns(conn: &Connection, table: &str) -> rusqlite::Result<HashSet<String>> {
    conn.prepare("SELECT name FROM pragma_table_info(?1)")?
        .query_map([table], |row| row.get(0))?
        .collect()
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    err.to_string().contains("duplicate column name")
}

/// Add missing columns to every table.
///
/// Tables are handled independently. Within one table the adds run in a
/// single transaction: a failure rolls back that table's adds and is
/// recorded, then the next table is checked. A "duplicate column" failure
/// means another writer got there first and counts as success.
pub fn run_migrations(conn: &mut Connection, report: &mut SchemaReport) {
    for table in TABLES {
        migrate_table(conn, table, report);
    }
}

fn migrate_table(conn: &mut Connection, table: &TableDef, report: &mut SchemaReport) {
    let present = match present_columns(conn, table.name) {
        Ok(cols) => cols,
        Err(e) => {
            report.record_issue(format!("inspect:{}", table.name), &e);
            return;
        }
    };

    if present.is_empty() {
        report.record_issue(format!("inspect:{}", table.name), &"table is missing");
        return;
    }

    let pending: Vec<ColumnMigration> = steps_for(table)
        .into_iter()
        .filter(|step| !present.contains(step.column))
        .collect();

    if pending.is_empty() {
        debug!(table = table.name, "Table shape is current");
        return;
    }

    info!(table = table.name, missing = pending.len(), "Migrating table");

    let tx = match conn.transaction() {
        Ok(tx) => tx,
        Err(e) => {
            report.record_issue(format!("migrate:{}", table.name), &e);
            return;
        }
    };

    let mut added = Vec::with_capacity(pending.len());
    for step in &pending {
        match tx.execute_batch(&step.add_sql) {
            Ok(()) => added.push(step.name()),
            Err(e) if is_duplicate_column(&e) => {
                warn!(step = %step.name(), "Column appeared concurrently, treating as present");
            }
            Err(e) => {
                // Dropping the transaction rolls back this table's earlier adds.
                report.record_issue(step.name(), &e);
                return;
            }
        }
    }

    match tx.commit() {
        Ok(()) => {
            for name in &added {
                info!(step = %name, "Column added");
            }
            report.added_columns.extend(added);
        }
        Err(e) => report.record_issue(format!("migrate:{}", table.name), &e),
    }
}
