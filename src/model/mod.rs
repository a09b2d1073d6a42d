//! Domain entities and the traits that bind them to the store
//!
//! Each entity pairs a static [`EntityDescriptor`] with the two conversions
//! the generic executor needs: values out in descriptor order for writes,
//! and a hydrated object in from a raw row for reads.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::schema::EntityDescriptor;
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

mod organization;
mod permission;
mod role;
mod task;
mod task_status;
mod topic;
mod user;

pub use organization::Organization;
pub use permission::Permission;
pub use role::Role;
pub use task::{Task, TaskPatch};
pub use task_status::TaskStatus;
pub use topic::Topic;
pub use user::{User, UserPatch};

/// A persisted domain object
#[async_trait]
pub trait Entity: Sized + Send + Sync + 'static {
    /// Table and writable columns
    const DESCRIPTOR: EntityDescriptor;

    /// Primary key; `None` until the entity has been created
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Writable values, in `DESCRIPTOR.attributes` order
    fn attribute_values(&self) -> Vec<SqlValue>;

    /// Build the object from one row, resolving its eager relations
    async fn hydrate(store: &EntityStore, row: Row) -> Result<Self>;
}

/// An entity whose writable attributes can be assigned from a partial update
pub trait Patch: Entity {
    /// Declared fields only; every field optional
    type Patch: DeserializeOwned + Send;

    fn apply(&mut self, patch: Self::Patch);
}

/// Patch field that tells an absent key (`None`) from an explicit `null`
/// (`Some(None)`); use with `#[serde(default, deserialize_with = ...)]`
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Store-managed columns every entity row carries
pub(crate) struct Stamps {
    pub id: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Stamps {
    pub(crate) fn read(descriptor: &EntityDescriptor, row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.require_i64(descriptor.table_name, "id")?,
            created_at: row.timestamp("createdAt"),
            updated_at: row.timestamp("updatedAt"),
        })
    }
}
