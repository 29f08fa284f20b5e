//! Document-store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide upsert/search/all/truncate over named collections.
//! - Keep SQL and JSON body encoding inside the persistence boundary.
//!
//! # Invariants
//! - `upsert` leaves every record matching the predicate equal to the
//!   given record, inserting it when nothing matched.
//! - Records come back in ascending `doc_id` (insertion) order.
//! - Undecodable bodies surface as `Corrupt`, never as silent skips.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::record::Record;
use crate::query::predicate::Predicate;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by the document-store boundary.
#[derive(Debug)]
pub enum StoreError {
    /// The backing database could not be opened or bootstrapped.
    Unavailable(DbError),
    /// A read query failed in the backing database.
    Read(rusqlite::Error),
    /// A mutation failed in the backing database.
    Write(rusqlite::Error),
    /// The record could not be encoded for storage.
    Encoding(serde_json::Error),
    /// A persisted body could not be decoded back into a record.
    Corrupt { doc_id: i64, detail: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "document store unavailable: {err}"),
            Self::Read(err) => write!(f, "document store read failed: {err}"),
            Self::Write(err) => write!(f, "document store write failed: {err}"),
            Self::Encoding(err) => write!(f, "record cannot be encoded: {err}"),
            Self::Corrupt { doc_id, detail } => {
                write!(f, "corrupt document {doc_id}: {detail}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            Self::Read(err) | Self::Write(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

/// Narrow contract this core requires from its backing document store.
pub trait DocumentStore {
    /// Updates every record matching `predicate` to `record`, or inserts
    /// `record` when nothing matches.
    fn upsert(&self, table: &str, predicate: &Predicate, record: &Record) -> StoreResult<()>;

    /// Returns the records matching `predicate`, in iteration order.
    fn search(&self, table: &str, predicate: &Predicate) -> StoreResult<Vec<Record>>;

    /// Returns every record in the collection, in iteration order.
    fn all(&self, table: &str) -> StoreResult<Vec<Record>>;

    /// Deletes every record in the collection.
    fn truncate(&self, table: &str) -> StoreResult<()>;
}

/// SQLite-backed document store.
///
/// Records are kept as JSON text bodies in a single `documents` table;
/// predicates are evaluated against the decoded records. The connection
/// is owned exclusively by this store and closed on drop.
#[derive(Debug)]
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Opens (creating if absent) the store at `path`.
    ///
    /// # Errors
    /// - Returns `StoreError::Unavailable` when the path cannot be opened
    ///   or the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Ok(Self { conn })
    }

    /// Opens a store that lives only in process memory.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self { conn })
    }

    fn load_collection(&self, table: &str) -> StoreResult<Vec<(i64, Record)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT doc_id, body FROM documents WHERE collection = ?1 ORDER BY doc_id;")
            .map_err(StoreError::Read)?;
        let mut rows = stmt.query(params![table]).map_err(StoreError::Read)?;

        let mut documents = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::Read)? {
            let doc_id: i64 = row.get(0).map_err(StoreError::Read)?;
            let body: String = row.get(1).map_err(StoreError::Read)?;
            documents.push((doc_id, decode_body(doc_id, &body)?));
        }

        Ok(documents)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn upsert(&self, table: &str, predicate: &Predicate, record: &Record) -> StoreResult<()> {
        let body = encode_body(record)?;
        let matching: Vec<i64> = self
            .load_collection(table)?
            .into_iter()
            .filter(|(_, existing)| predicate.matches(existing))
            .map(|(doc_id, _)| doc_id)
            .collect();

        if matching.is_empty() {
            self.conn
                .execute(
                    "INSERT INTO documents (collection, body) VALUES (?1, ?2);",
                    params![table, body],
                )
                .map_err(StoreError::Write)?;
            return Ok(());
        }

        // Single statement so the replacement of all matches is atomic.
        let placeholders = vec!["?"; matching.len()].join(", ");
        let sql = format!("UPDATE documents SET body = ? WHERE doc_id IN ({placeholders});");
        let mut bind_values: Vec<SqlValue> = Vec::with_capacity(matching.len() + 1);
        bind_values.push(SqlValue::Text(body));
        bind_values.extend(matching.into_iter().map(SqlValue::Integer));

        self.conn
            .execute(&sql, params_from_iter(bind_values))
            .map_err(StoreError::Write)?;

        Ok(())
    }

    fn search(&self, table: &str, predicate: &Predicate) -> StoreResult<Vec<Record>> {
        Ok(self
            .load_collection(table)?
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| predicate.matches(record))
            .collect())
    }

    fn all(&self, table: &str) -> StoreResult<Vec<Record>> {
        Ok(self
            .load_collection(table)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    fn truncate(&self, table: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM documents WHERE collection = ?1;", params![table])
            .map_err(StoreError::Write)?;
        Ok(())
    }
}

fn encode_body(record: &Record) -> StoreResult<String> {
    serde_json::to_string(record).map_err(StoreError::Encoding)
}

fn decode_body(doc_id: i64, body: &str) -> StoreResult<Record> {
    let value: Value = serde_json::from_str(body).map_err(|err| StoreError::Corrupt {
        doc_id,
        detail: err.to_string(),
    })?;

    match value {
        Value::Object(record) => Ok(record),
        other => Err(StoreError::Corrupt {
            doc_id,
            detail: format!("expected JSON object, found {}", json_type_name(&other)),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
