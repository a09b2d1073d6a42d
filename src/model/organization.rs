use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Entity, Stamps, User};
use crate::error::Result;
use crate::join::JoinRecord;
use crate::schema::{EntityDescriptor, ORGANIZATIONS, USER_ORGANIZATION};
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub created_by_user_id: Option<i64>,
    pub updated_by_user_id: Option<i64>,
    pub created_by: Option<User>,
    pub updated_by: Option<User>,
    /// Members through `UserOrganization`
    pub users: Vec<User>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Organization {
    pub fn new(name: impl Into<String>, created_by_user_id: i64) -> Self {
        Self {
            name: name.into(),
            created_by_user_id: Some(created_by_user_id),
            updated_by_user_id: Some(created_by_user_id),
            ..Self::default()
        }
    }

    pub async fn add_user(
        store: &EntityStore,
        organization_id: i64,
        user_id: i64,
        created_by_user_id: i64,
    ) -> Result<u64> {
        store
            .join(&USER_ORGANIZATION)
            .add(JoinRecord::new(organization_id, user_id, created_by_user_id))
            .await
    }

    pub async fn erase_user(store: &EntityStore, organization_id: i64, user_id: i64) -> Result<u64> {
        store
            .join(&USER_ORGANIZATION)
            .remove_pair(organization_id, user_id)
            .await
    }
}

#[async_trait]
impl Entity for Organization {
    const DESCRIPTOR: EntityDescriptor = ORGANIZATIONS;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn attribute_values(&self) -> Vec<SqlValue> {
        vec![
            self.name.as_str().into(),
            self.description.clone().into(),
            self.created_by_user_id.into(),
            self.updated_by_user_id.into(),
        ]
    }

    async fn hydrate(store: &EntityStore, row: Row) -> Result<Self> {
        let stamps = Stamps::read(&Self::DESCRIPTOR, &row)?;
        let created_by_user_id = row.i64("createdByUserId");
        let updated_by_user_id = row.i64("updatedByUserId");

        Ok(Self {
            id: Some(stamps.id),
            name: row.text("name").unwrap_or_default(),
            description: row.text("description"),
            created_by_user_id,
            updated_by_user_id,
            created_by: store.resolve(created_by_user_id).await?,
            updated_by: store.resolve(updated_by_user_id).await?,
            users: store.resolve_rights(&USER_ORGANIZATION, stamps.id).await?,
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        })
    }
}
