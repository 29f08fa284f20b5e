//! Keyed table over a document store.
//!
//! # Responsibility
//! - Build composite-key predicates from the declared key fields.
//! - Provide upsert/find/list/clear semantics over one collection.
//!
//! # Invariants
//! - After a successful upsert, at most one record matches the key
//!   predicate and its contents equal the upserted record.
//! - The declared key fields never change for the table's lifetime.

use crate::model::record::{KeySpec, Record};
use crate::query::predicate::Predicate;
use crate::repo::doc_store::{DocumentStore, SqliteDocumentStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type TableResult<T> = Result<T, TableError>;

/// Errors surfaced by keyed-table operations.
#[derive(Debug)]
pub enum TableError {
    /// The supplied record lacks a declared key field.
    MissingKeyField(String),
    /// The backing store reported a failure.
    Store(StoreError),
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKeyField(field) => {
                write!(f, "record is missing key field `{field}`")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingKeyField(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for TableError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Keyed access to one named collection of a document store.
///
/// Owns its store handle exclusively; all state lives in the store, so
/// the table itself is a stateless-logic wrapper.
#[derive(Debug)]
pub struct KeyedTable<S: DocumentStore> {
    store: S,
    table: String,
    keys: KeySpec,
}

impl KeyedTable<SqliteDocumentStore> {
    /// Binds to `table` in the store at `location`, creating both if absent.
    ///
    /// # Errors
    /// - Returns `StoreError::Unavailable` (wrapped) when the location
    ///   cannot be opened or bootstrapped.
    pub fn open(
        location: impl AsRef<Path>,
        table: impl Into<String>,
        keys: KeySpec,
    ) -> TableResult<Self> {
        let store = SqliteDocumentStore::open(location)?;
        Ok(Self::new(store, table, keys))
    }

    /// Binds to `table` in a store living only in process memory.
    pub fn open_in_memory(table: impl Into<String>, keys: KeySpec) -> TableResult<Self> {
        let store = SqliteDocumentStore::open_in_memory()?;
        Ok(Self::new(store, table, keys))
    }
}

impl<S: DocumentStore> KeyedTable<S> {
    /// Binds an already-opened store handle to `table` with `keys`.
    pub fn new(store: S, table: impl Into<String>, keys: KeySpec) -> Self {
        Self {
            store,
            table: table.into(),
            keys,
        }
    }

    /// Collection name this table is bound to.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Declared key fields.
    pub fn key_spec(&self) -> &KeySpec {
        &self.keys
    }

    /// Builds the composite-key predicate for `item`.
    ///
    /// Folds one equality clause per declared key field, left to right in
    /// declaration order. An empty key spec yields `Predicate::All`.
    ///
    /// # Errors
    /// - Returns `TableError::MissingKeyField` naming the first declared
    ///   field absent from `item`.
    pub fn build_predicate(&self, item: &Record) -> TableResult<Predicate> {
        let mut predicate: Option<Predicate> = None;

        for field in self.keys.fields() {
            let value = item
                .get(field)
                .ok_or_else(|| TableError::MissingKeyField(field.clone()))?;
            let clause = Predicate::field_eq(field.clone(), value.clone());
            predicate = Some(match predicate {
                Some(built) => built.and(clause),
                None => clause,
            });
        }

        Ok(predicate.unwrap_or(Predicate::All))
    }

    /// Inserts `item`, or replaces the record sharing its key values.
    ///
    /// # Contract
    /// - `item` must contain every declared key field.
    /// - Afterwards exactly one record matches the key predicate and its
    ///   contents equal `item`.
    pub fn upsert(&self, item: &Record) -> TableResult<()> {
        let predicate = self.build_predicate(item)?;
        self.store.upsert(&self.table, &predicate, item)?;
        Ok(())
    }

    /// Returns the first record whose key fields equal those of `item_keys`.
    ///
    /// Non-key fields in `item_keys` are ignored. When several records
    /// match (possible only after external mutation of the store), the
    /// store's first match in iteration order is returned; no recency is
    /// implied. A missing match is `Ok(None)`, never an error.
    pub fn find_one(&self, item_keys: &Record) -> TableResult<Option<Record>> {
        let predicate = self.build_predicate(item_keys)?;
        let matches = self.store.search(&self.table, &predicate)?;
        Ok(matches.into_iter().next())
    }

    /// Returns every record in the collection, in store iteration order.
    pub fn get_all(&self) -> TableResult<Vec<Record>> {
        Ok(self.store.all(&self.table)?)
    }

    /// Removes every record; the table stays bound and usable.
    pub fn drop_table(&self) -> TableResult<()> {
        self.store.truncate(&self.table)?;
        Ok(())
    }
}
