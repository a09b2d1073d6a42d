//! Join-table manager
//!
//! Association tables carry `(left, right, createdByUserId)` and have no key
//! of their own. Rows are added and removed, never updated.

use crate::config::JoinPolicy;
use crate::error::{Result, StoreError};
use crate::schema::JoinTable;
use crate::sql::Criteria;
use crate::sql::statement::{self, Statement};
use crate::store::EntityStore;
use crate::types::SqlValue;

/// One association row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinRecord {
    pub left: i64,
    pub right: i64,
    pub created_by: i64,
}

impl JoinRecord {
    pub fn new(left: i64, right: i64, created_by: i64) -> Self {
        Self {
            left,
            right,
            created_by,
        }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Integer(self.left),
            SqlValue::Integer(self.right),
            SqlValue::Integer(self.created_by),
        ]
    }
}

/// Operations on one association table, borrowed from a store
#[derive(Debug, Clone, Copy)]
pub struct JoinManager<'a> {
    store: &'a EntityStore,
    table: &'a JoinTable,
}

impl EntityStore {
    /// Manage the rows of `table`
    pub fn join<'a>(&'a self, table: &'a JoinTable) -> JoinManager<'a> {
        JoinManager { store: self, table }
    }
}

impl<'a> JoinManager<'a> {
    pub fn table(&self) -> &JoinTable {
        self.table
    }

    fn insert_statement(&self, record: &JoinRecord) -> Statement {
        match self.store.join_policy() {
            JoinPolicy::AllowDuplicates => statement::insert(&self.table.descriptor, record.values()),
            JoinPolicy::Deduplicate => {
                statement::insert_pair_unless_exists(self.table, record.values())
            }
        }
    }

    /// Insert one association row
    ///
    /// Returns rows affected: always 1 when duplicates are allowed, 0 for an
    /// existing pair under [`JoinPolicy::Deduplicate`].
    pub async fn add(&self, record: JoinRecord) -> Result<u64> {
        let stmt = self.insert_statement(&record);
        let outcome = self.store.backend().execute(&stmt).await?;

        tracing::debug!(
            table = self.table.table_name(),
            left = record.left,
            right = record.right,
            rows_affected = outcome.rows_affected,
            "join row added"
        );
        Ok(outcome.rows_affected)
    }

    /// Delete every association row matching `criteria`, duplicates included
    pub async fn remove(&self, criteria: &Criteria) -> Result<u64> {
        self.store.erase_in(&self.table.descriptor, criteria).await
    }

    /// Delete the `(left, right)` pair
    pub async fn remove_pair(&self, left: i64, right: i64) -> Result<u64> {
        let criteria = Criteria::new()
            .eq(self.table.left, left)
            .eq(self.table.right, right);
        self.remove(&criteria).await
    }

    /// Ids paired with `left`, in insertion order (duplicates preserved)
    pub async fn right_ids(&self, left: i64) -> Result<Vec<i64>> {
        self.linked_ids(self.table.left, left).await
    }

    /// Ids paired with `right`, in insertion order (duplicates preserved)
    pub async fn left_ids(&self, right: i64) -> Result<Vec<i64>> {
        self.linked_ids(self.table.right, right).await
    }

    async fn linked_ids(&self, key_column: &'static str, key: i64) -> Result<Vec<i64>> {
        let partner = self
            .table
            .partner(key_column)
            .ok_or_else(|| StoreError::unknown_column(self.table.table_name(), key_column))?;

        let criteria = Criteria::new().eq(key_column, key);
        let stmt = statement::select_column_where(&self.table.descriptor, partner, &criteria);
        let rows = self.store.backend().fetch(&stmt).await?;

        Ok(rows.iter().filter_map(|row| row.i64(partner)).collect())
    }

    /// Replace every pair of `left` with `rights` in one transaction
    ///
    /// Returns the total rows affected (deleted plus inserted).
    pub async fn replace(&self, left: i64, rights: &[i64], created_by: i64) -> Result<u64> {
        let mut statements = Vec::with_capacity(rights.len() + 1);
        statements.push(statement::delete_where(
            &self.table.descriptor,
            &Criteria::new().eq(self.table.left, left),
        ));
        statements.extend(
            rights
                .iter()
                .map(|right| self.insert_statement(&JoinRecord::new(left, *right, created_by))),
        );

        let affected = self
            .store
            .backend()
            .execute_in_transaction(&statements)
            .await?;

        tracing::debug!(
            table = self.table.table_name(),
            left,
            pairs = rights.len(),
            rows_affected = affected,
            "join rows replaced"
        );
        Ok(affected)
    }
}
