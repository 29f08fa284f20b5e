//! Query expressions evaluated by the document store.
//!
//! # Responsibility
//! - Define the match-condition shape shared by table and store layers.
//!
//! # Invariants
//! - Predicates are plain values; building one never touches storage.

pub mod predicate;
