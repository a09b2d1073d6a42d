//! Criteria objects and the WHERE-clause builder
//!
//! A criteria object is an ordered list of `(column, value)` pairs that are
//! AND-ed together with equality. The builder emits the clause text and the
//! bind list from that single sequence, so placeholder `n` always binds the
//! value of pair `n`.

use crate::error::{Result, StoreError};
use crate::schema::EntityDescriptor;
use crate::sql::sanitize::quote_identifier;
use crate::types::SqlValue;

/// Ordered equality restrictions on a table
///
/// Column names are `&'static str`: they must be literals from code or
/// descriptors, never text received from a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pairs: Vec<(&'static str, SqlValue)>,
}

impl Criteria {
    /// Empty criteria (no restriction)
    pub fn new() -> Self {
        Self::default()
    }

    /// `id = ?`
    pub fn by_id(id: i64) -> Self {
        Self::new().eq("id", id)
    }

    /// Append `column = value`
    pub fn eq(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.pairs.push((column, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SqlValue)> {
        self.pairs.iter().map(|(column, value)| (*column, value))
    }

    /// Check every column against the descriptor the criteria will run on
    pub fn validate(&self, descriptor: &EntityDescriptor) -> Result<()> {
        match self.pairs.iter().find(|(column, _)| !descriptor.has_column(column)) {
            Some((column, _)) => Err(StoreError::unknown_column(descriptor.table_name, *column)),
            None => Ok(()),
        }
    }
}

/// A WHERE fragment with its positional binds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    /// `"a" = ? AND "b" = ?`; empty when the criteria were empty
    pub clause: String,
    pub binds: Vec<SqlValue>,
}

impl Predicate {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// ` WHERE <clause>`, or nothing for an empty predicate
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause)
        }
    }
}

/// Build the AND-ed equality clause for `criteria`
pub fn build_predicate(criteria: &Criteria) -> Predicate {
    let mut terms = Vec::with_capacity(criteria.len());
    let mut binds = Vec::with_capacity(criteria.len());

    for (column, value) in criteria.iter() {
        terms.push(format!("{} = ?", quote_identifier(column)));
        binds.push(value.clone());
    }

    Predicate {
        clause: terms.join(" AND "),
        binds,
    }
}
