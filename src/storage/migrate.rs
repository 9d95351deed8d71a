//! Additive schema migration
//!
//! Brings stores created by older app versions up to the current column set.
//! Migration is non-fatal: failures are logged and the store keeps working
//! without the missing column.

use rusqlite::Connection;
use super::schema::ADDED_COLUMNS;

/// Check if a column exists in a table
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn add_column_if_missing(conn: &Connection, table: &str, column: &str, definition: &str) -> rusqlite::Result<bool> {
    if column_exists(conn, table, column)? {
        return Ok(false);
    }
    conn.execute(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition), [])?;
    Ok(true)
}

/// Add any missing columns. Returns the `table.column` names that were added.
pub fn migrate(conn: &Connection) -> Vec<String> {
    let mut added = Vec::new();
    for (table, column, definition) in ADDED_COLUMNS {
        match add_column_if_missing(conn, table, column, definition) {
            Ok(true) => {
                tracing::debug!("Added column {}.{}", table, column);
                added.push(format!("{}.{}", table, column));
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Database migration skipped for {}.{}: {}", table, column, e);
            }
        }
    }
    added
}
