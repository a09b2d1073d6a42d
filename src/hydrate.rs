//! Relation resolution used by [`Entity::hydrate`](crate::model::Entity::hydrate)
//!
//! A foreign key resolves through the target entity's `search({id})`; a
//! many-to-many relation reads the join table and then resolves each partner
//! id the same way. One query per reference, issued sequentially.

use crate::error::Result;
use crate::model::Entity;
use crate::schema::JoinTable;
use crate::store::EntityStore;

impl EntityStore {
    /// Resolve a foreign key to its target entity
    ///
    /// A NULL key resolves to `None` without a query; a key whose row is
    /// gone resolves to `None` as well.
    pub async fn resolve<E: Entity>(&self, foreign_key: Option<i64>) -> Result<Option<E>> {
        match foreign_key {
            Some(id) => self.find::<E>(id).await,
            None => Ok(None),
        }
    }

    /// Entities paired with `left` through `join`, one per join row
    pub async fn resolve_rights<E: Entity>(&self, join: &JoinTable, left: i64) -> Result<Vec<E>> {
        let ids = self.join(join).right_ids(left).await?;
        self.resolve_all(ids).await
    }

    /// Entities paired with `right` through `join`, one per join row
    pub async fn resolve_lefts<E: Entity>(&self, join: &JoinTable, right: i64) -> Result<Vec<E>> {
        let ids = self.join(join).left_ids(right).await?;
        self.resolve_all(ids).await
    }

    // Partners whose row no longer exists are skipped
    async fn resolve_all<E: Entity>(&self, ids: Vec<i64>) -> Result<Vec<E>> {
        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entity) = self.find::<E>(id).await? {
                entities.push(entity);
            }
        }
        Ok(entities)
    }
}
