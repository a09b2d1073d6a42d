//! EntityStore - generic CRUD over schema descriptors
//!
//! Every operation is driven by the entity's [`EntityDescriptor`]: INSERT and
//! UPDATE bind the entity's values in attribute order, DELETE and SELECT run
//! a predicate built from a [`Criteria`] object, and SELECT results are
//! hydrated into domain objects through [`Entity::hydrate`].

use std::sync::Arc;

use crate::backend::{SqlBackend, SqliteBackend};
use crate::config::{JoinPolicy, StoreConfig};
use crate::error::{Result, StoreError};
use crate::model::Entity;
use crate::schema::EntityDescriptor;
use crate::sql::Criteria;
use crate::sql::statement;
use crate::types::Row;

/// Handle on the relational store shared by every entity
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct EntityStore {
    backend: Arc<dyn SqlBackend>,
    join_policy: JoinPolicy,
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("join_policy", &self.join_policy)
            .finish_non_exhaustive()
    }
}

impl EntityStore {
    /// Connect to the SQLite database named by the configuration
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let backend = SqliteBackend::connect(&config).await?;
        Ok(Self::with_backend(Arc::new(backend), config.join_policy))
    }

    /// Use an existing backend (another driver, a shared pool, a test double)
    pub fn with_backend(backend: Arc<dyn SqlBackend>, join_policy: JoinPolicy) -> Self {
        Self {
            backend,
            join_policy,
        }
    }

    /// The backend statements are sent to
    pub fn backend(&self) -> &dyn SqlBackend {
        self.backend.as_ref()
    }

    pub fn join_policy(&self) -> JoinPolicy {
        self.join_policy
    }

    // =========================================================================
    // Entity Operations
    // =========================================================================

    /// Insert `entity` using its descriptor's attribute order
    ///
    /// Returns the id the store assigned to the new row.
    pub async fn create<E: Entity>(&self, entity: &E) -> Result<i64> {
        let descriptor = &E::DESCRIPTOR;
        let stmt = statement::insert(descriptor, entity.attribute_values());
        let outcome = self.backend.execute(&stmt).await?;

        outcome.last_insert_id.ok_or_else(|| {
            StoreError::missing_column(descriptor.table_name, "id")
        })
    }

    /// Every row of the entity's table, hydrated
    pub async fn read_all<E: Entity>(&self) -> Result<Vec<E>> {
        let stmt = statement::select_all(&E::DESCRIPTOR);
        let rows = self.backend.fetch(&stmt).await?;
        self.hydrate_rows(rows).await
    }

    /// Write every attribute of `entity` to the row with its id
    ///
    /// Returns the number of rows affected (0 when the row no longer exists).
    pub async fn update<E: Entity>(&self, entity: &E) -> Result<u64> {
        let descriptor = &E::DESCRIPTOR;
        let id = entity
            .id()
            .ok_or(StoreError::MissingId(descriptor.table_name))?;

        let stmt = statement::update_by_id(descriptor, entity.attribute_values(), id);
        Ok(self.backend.execute(&stmt).await?.rows_affected)
    }

    /// Delete every row matching `criteria`
    ///
    /// Empty criteria are refused rather than deleting the whole table.
    pub async fn erase<E: Entity>(&self, criteria: &Criteria) -> Result<u64> {
        self.erase_in(&E::DESCRIPTOR, criteria).await
    }

    /// Rows matching `criteria`, hydrated; empty criteria means no restriction
    pub async fn search<E: Entity>(&self, criteria: &Criteria) -> Result<Vec<E>> {
        let descriptor = &E::DESCRIPTOR;
        criteria.validate(descriptor)?;

        let stmt = statement::select_where(descriptor, criteria);
        let rows = self.backend.fetch(&stmt).await?;
        self.hydrate_rows(rows).await
    }

    /// First match of `search({id})`
    pub async fn find<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        Ok(self
            .search::<E>(&Criteria::by_id(id))
            .await?
            .into_iter()
            .next())
    }

    pub(crate) async fn erase_in(
        &self,
        descriptor: &EntityDescriptor,
        criteria: &Criteria,
    ) -> Result<u64> {
        if criteria.is_empty() {
            return Err(StoreError::EmptyCriteria(descriptor.table_name));
        }
        criteria.validate(descriptor)?;

        let stmt = statement::delete_where(descriptor, criteria);
        Ok(self.backend.execute(&stmt).await?.rows_affected)
    }

    async fn hydrate_rows<E: Entity>(&self, rows: Vec<Row>) -> Result<Vec<E>> {
        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            entities.push(E::hydrate(self, row).await?);
        }
        Ok(entities)
    }
}
