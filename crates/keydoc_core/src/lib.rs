//! Keyed document-table core.
//! This crate is the single source of truth for upsert-by-key semantics.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{KeySpec, Record};
pub use query::predicate::Predicate;
pub use repo::doc_store::{DocumentStore, SqliteDocumentStore, StoreError, StoreResult};
pub use service::keyed_table::{KeyedTable, TableError, TableResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
