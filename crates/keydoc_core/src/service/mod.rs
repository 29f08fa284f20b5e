//! Use-case layer for keyed document access.
//!
//! # Responsibility
//! - Provide the stable upsert/lookup/scan/truncate entry points.
//! - Delegate persistence to document-store implementations.
//!
//! # Invariants
//! - Service APIs stay storage-agnostic; only the store sees SQL.

pub mod keyed_table;
