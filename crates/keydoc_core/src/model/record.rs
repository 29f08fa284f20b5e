//! Record and key-specification model.
//!
//! # Responsibility
//! - Represent schemaless documents as field-name to value mappings.
//! - Carry the ordered key fields that define a record's identity.
//!
//! # Invariants
//! - A `KeySpec` is immutable for the lifetime of the table holding it.
//! - Field order is preserved as supplied, so the predicates generated
//!   from a spec are deterministic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schemaless stored document: field name to structured value.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type Record = Map<String, Value>;

/// Ordered set of field names defining a record's logical identity.
///
/// Order has no effect on matching (conjunction is commutative) but is
/// preserved so the same spec always yields the same predicate shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeySpec(Vec<String>);

impl KeySpec {
    /// Creates a key spec from field names, preserving their order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Key field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Returns whether this spec declares no key fields.
    ///
    /// An empty spec makes every record match the generated predicate.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared key fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for KeySpec {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}
