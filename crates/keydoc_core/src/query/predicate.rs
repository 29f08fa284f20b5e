//! Boolean matching expressions over records.
//!
//! # Responsibility
//! - Represent composite-key match conditions as an inspectable value.
//! - Evaluate conditions against decoded records.
//!
//! # Invariants
//! - `Eq` requires the field to be present; an absent field never matches.
//! - Evaluation is pure and total.

use crate::model::record::Record;
use serde_json::Value;

/// Match condition evaluated against each record in a collection.
///
/// An explicit expression tree rather than a chained builder, so tests
/// and diagnostics can inspect exactly what a table will match.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record.
    All,
    /// Matches records whose `field` is present and equal to `value`.
    Eq { field: String, value: Value },
    /// Matches when both sides match; evaluated left to right.
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Equality leaf for one field.
    pub fn field_eq(field: impl Into<String>, value: Value) -> Self {
        Self::Eq {
            field: field.into(),
            value,
        }
    }

    /// Conjunction of `self` and `other`.
    pub fn and(self, other: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Evaluates this predicate against one record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => record.get(field) == Some(value),
            Self::And(lhs, rhs) => lhs.matches(record) && rhs.matches(record),
        }
    }
}
