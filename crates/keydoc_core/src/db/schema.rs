//! Document-store schema bootstrap.
//!
//! # Responsibility
//! - Create the `documents` table and its collection index.
//! - Mirror the applied schema version to `PRAGMA user_version`.
//!
//! # Invariants
//! - `SCHEMA_VERSION` only ever increases across releases.
//! - Databases reporting a newer version than this binary are rejected
//!   before any document access.

use super::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS documents (
    doc_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    body       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_collection
    ON documents (collection);
";

/// Applies the schema when the database is behind the current version.
///
/// A database already at `SCHEMA_VERSION` is left untouched, so reopening
/// the same file is idempotent.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
