//! Storage boundary abstractions and the SQLite implementation.
//!
//! # Responsibility
//! - Define the narrow document-store contract used by table logic.
//! - Isolate SQL and body-encoding details from service orchestration.
//!
//! # Invariants
//! - Read paths must reject undecodable persisted bodies instead of
//!   masking them.
//! - Iteration order within a collection is ascending insertion order.

pub mod doc_store;
