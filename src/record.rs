//! Active-record wrapper
//!
//! An [`ActiveRecord`] carries an entity value together with the store it is
//! persisted in, so the persistence verbs read as methods on the instance.

use std::ops::Deref;

use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::model::{Entity, Patch};
use crate::sql::Criteria;
use crate::store::EntityStore;

/// An entity bound to its store
#[derive(Debug, Clone)]
pub struct ActiveRecord<E> {
    store: EntityStore,
    entity: E,
}

impl<E: Entity> ActiveRecord<E> {
    /// An empty, unsaved instance
    pub fn new(store: &EntityStore) -> Self
    where
        E: Default,
    {
        Self::from_entity(store, E::default())
    }

    pub fn from_entity(store: &EntityStore, entity: E) -> Self {
        Self {
            store: store.clone(),
            entity,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn into_inner(self) -> E {
        self.entity
    }

    pub(crate) fn require_id(&self) -> Result<i64> {
        self.entity
            .id()
            .ok_or(StoreError::MissingId(E::DESCRIPTOR.table_name))
    }

    /// Insert the instance, then reload it so store-set columns are filled in
    pub async fn create(&mut self) -> Result<&mut Self> {
        let id = self.store.create(&self.entity).await?;
        self.entity.set_id(id);
        if let Some(stored) = self.store.find::<E>(id).await? {
            self.entity = stored;
        }
        Ok(self)
    }

    /// Write every attribute of the instance to its row
    pub async fn update(&mut self) -> Result<&mut Self> {
        let affected = self.store.update(&self.entity).await?;
        if affected == 0 {
            tracing::debug!(
                table = E::DESCRIPTOR.table_name,
                id = ?self.entity.id(),
                "update matched no row"
            );
        }
        Ok(self)
    }

    /// Delete the instance's own row
    pub async fn erase(self) -> Result<u64> {
        let id = self.require_id()?;
        self.store.erase::<E>(&Criteria::by_id(id)).await
    }

    /// Delete every row of the entity's table matching `criteria`
    pub async fn erase_where(store: &EntityStore, criteria: &Criteria) -> Result<u64> {
        store.erase::<E>(criteria).await
    }

    /// Matching rows, each wrapped as a record
    pub async fn search(store: &EntityStore, criteria: &Criteria) -> Result<Vec<Self>> {
        Ok(store
            .search::<E>(criteria)
            .await?
            .into_iter()
            .map(|entity| Self::from_entity(store, entity))
            .collect())
    }

    /// The instance as a JSON view model
    pub fn to_json(&self) -> Result<serde_json::Value>
    where
        E: Serialize,
    {
        Ok(serde_json::to_value(&self.entity)?)
    }
}

impl<E: Patch> ActiveRecord<E> {
    /// Assign the fields present in `patch`
    pub fn set(&mut self, patch: E::Patch) -> &mut Self {
        self.entity.apply(patch);
        self
    }

    /// Assign from a JSON object; keys that are not writable attributes are rejected
    pub fn set_json(&mut self, value: serde_json::Value) -> Result<&mut Self> {
        let patch: E::Patch = serde_json::from_value(value).map_err(|e| {
            StoreError::invalid_patch(format!("{}: {}", E::DESCRIPTOR.table_name, e))
        })?;
        Ok(self.set(patch))
    }
}

impl<E> Deref for ActiveRecord<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}
