//! Statement generation for entity and join tables
//!
//! Every builder returns the SQL text together with its positional binds.
//! Identifiers come from descriptors and are quoted; values are only ever
//! bound.

use crate::schema::{EntityDescriptor, JoinTable};
use crate::sql::predicate::{Criteria, build_predicate};
use crate::sql::sanitize::quote_identifier;
use crate::types::SqlValue;

/// SQL text plus the values for its `?` placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    /// A statement without binds (DDL, fixtures)
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// Number of `?` placeholders in the text
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn order_sql(descriptor: &EntityDescriptor) -> String {
    descriptor
        .order_by
        .map(|column| format!(" ORDER BY {}", quote_identifier(column)))
        .unwrap_or_default()
}

/// `INSERT INTO t (a1, ..., an) VALUES (?, ..., ?)` in attribute order
///
/// `values` is bound as given; its length is not checked against the
/// descriptor, so a short or long value list fails at the store.
pub fn insert(descriptor: &EntityDescriptor, values: Vec<SqlValue>) -> Statement {
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(descriptor.table_name),
        column_list(descriptor.attributes),
        placeholders(descriptor.attributes.len())
    );
    Statement::new(sql, values)
}

/// Join-table insert that is skipped when the `(left, right)` pair exists
pub fn insert_pair_unless_exists(join: &JoinTable, values: Vec<SqlValue>) -> Statement {
    let descriptor = &join.descriptor;
    let mut binds = values;
    let left = binds.first().cloned().unwrap_or(SqlValue::Null);
    let right = binds.get(1).cloned().unwrap_or(SqlValue::Null);

    let sql = format!(
        "INSERT INTO {table} ({columns}) SELECT {values} WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE {left} = ? AND {right} = ?)",
        table = quote_identifier(descriptor.table_name),
        columns = column_list(descriptor.attributes),
        values = placeholders(descriptor.attributes.len()),
        left = quote_identifier(join.left),
        right = quote_identifier(join.right),
    );
    binds.push(left);
    binds.push(right);
    Statement::new(sql, binds)
}

/// Column refreshed by the store on every UPDATE, when a table declares it
const UPDATED_AT_COLUMN: &str = "updatedAt";

/// `UPDATE t SET a1 = ?, ..., an = ?[, updatedAt = CURRENT_TIMESTAMP] WHERE id = ?`
///
/// The id is bound last. The timestamp term carries no placeholder.
pub fn update_by_id(descriptor: &EntityDescriptor, values: Vec<SqlValue>, id: i64) -> Statement {
    let mut assignments = descriptor
        .attributes
        .iter()
        .map(|c| format!("{} = ?", quote_identifier(c)))
        .collect::<Vec<_>>();
    if descriptor.read_only.contains(&UPDATED_AT_COLUMN) {
        assignments.push(format!(
            "{} = CURRENT_TIMESTAMP",
            quote_identifier(UPDATED_AT_COLUMN)
        ));
    }
    let assignments = assignments.join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quote_identifier(descriptor.table_name),
        assignments,
        quote_identifier("id")
    );

    let mut binds = values;
    binds.push(SqlValue::Integer(id));
    Statement::new(sql, binds)
}

/// `DELETE FROM t WHERE <criteria>`
pub fn delete_where(descriptor: &EntityDescriptor, criteria: &Criteria) -> Statement {
    let predicate = build_predicate(criteria);
    let sql = format!(
        "DELETE FROM {}{}",
        quote_identifier(descriptor.table_name),
        predicate.where_sql()
    );
    Statement::new(sql, predicate.binds)
}

/// `SELECT * FROM t [WHERE <criteria>] [ORDER BY ...]`
pub fn select_where(descriptor: &EntityDescriptor, criteria: &Criteria) -> Statement {
    let predicate = build_predicate(criteria);
    let sql = format!(
        "SELECT * FROM {}{}{}",
        quote_identifier(descriptor.table_name),
        predicate.where_sql(),
        order_sql(descriptor)
    );
    Statement::new(sql, predicate.binds)
}

/// `SELECT * FROM t [ORDER BY ...]`
pub fn select_all(descriptor: &EntityDescriptor) -> Statement {
    select_where(descriptor, &Criteria::new())
}

/// `SELECT column FROM t WHERE <criteria>`, used for join-table lookups
pub fn select_column_where(
    descriptor: &EntityDescriptor,
    column: &str,
    criteria: &Criteria,
) -> Statement {
    let predicate = build_predicate(criteria);
    let sql = format!(
        "SELECT {} FROM {}{}{}",
        quote_identifier(column),
        quote_identifier(descriptor.table_name),
        predicate.where_sql(),
        order_sql(descriptor)
    );
    Statement::new(sql, predicate.binds)
}
