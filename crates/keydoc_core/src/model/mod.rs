//! Canonical data shapes for keyed document storage.
//!
//! # Responsibility
//! - Define the schemaless record shape shared by every layer.
//! - Define the ordered key specification that fixes record identity.
//!
//! # Invariants
//! - A record's logical identity is exactly its key-field values.
//! - Key field order never changes after construction.

pub mod record;
