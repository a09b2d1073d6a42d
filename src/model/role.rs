use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Entity, Organization, Permission, Stamps, User};
use crate::error::Result;
use crate::join::JoinRecord;
use crate::schema::{EntityDescriptor, ROLE_PERMISSION, ROLES, USER_ROLE};
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

/// A named set of permissions scoped to an organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub organization_id: Option<i64>,
    pub created_by_user_id: Option<i64>,
    pub updated_by_user_id: Option<i64>,
    pub organization: Option<Organization>,
    pub created_by: Option<User>,
    pub updated_by: Option<User>,
    /// Holders through `UserRole`
    pub users: Vec<User>,
    /// Grants through `RolePermission`
    pub permissions: Vec<Permission>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Role {
    pub fn new(name: impl Into<String>, organization_id: i64, created_by_user_id: i64) -> Self {
        Self {
            name: name.into(),
            organization_id: Some(organization_id),
            created_by_user_id: Some(created_by_user_id),
            updated_by_user_id: Some(created_by_user_id),
            ..Self::default()
        }
    }

    pub async fn add_user(
        store: &EntityStore,
        role_id: i64,
        user_id: i64,
        created_by_user_id: i64,
    ) -> Result<u64> {
        store
            .join(&USER_ROLE)
            .add(JoinRecord::new(role_id, user_id, created_by_user_id))
            .await
    }

    pub async fn erase_user(store: &EntityStore, role_id: i64, user_id: i64) -> Result<u64> {
        store.join(&USER_ROLE).remove_pair(role_id, user_id).await
    }

    pub async fn add_permission(
        store: &EntityStore,
        role_id: i64,
        permission_id: i64,
        created_by_user_id: i64,
    ) -> Result<u64> {
        store
            .join(&ROLE_PERMISSION)
            .add(JoinRecord::new(role_id, permission_id, created_by_user_id))
            .await
    }

    pub async fn erase_permission(
        store: &EntityStore,
        role_id: i64,
        permission_id: i64,
    ) -> Result<u64> {
        store
            .join(&ROLE_PERMISSION)
            .remove_pair(role_id, permission_id)
            .await
    }
}

#[async_trait]
impl Entity for Role {
    const DESCRIPTOR: EntityDescriptor = ROLES;

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
            self.organization_id.into(),
            self.created_by_user_id.into(),
            self.updated_by_user_id.into(),
        ]
    }

    async fn hydrate(store: &EntityStore, row: Row) -> Result<Self> {
        let stamps = Stamps::read(&Self::DESCRIPTOR, &row)?;
        let organization_id = row.i64("organizationId");
        let created_by_user_id = row.i64("createdByUserId");
        let updated_by_user_id = row.i64("updatedByUserId");

        Ok(Self {
            id: Some(stamps.id),
            name: row.text("name").unwrap_or_default(),
            description: row.text("description"),
            organization_id,
            created_by_user_id,
            updated_by_user_id,
            organization: store.resolve(organization_id).await?,
            created_by: store.resolve(created_by_user_id).await?,
            updated_by: store.resolve(updated_by_user_id).await?,
            users: store.resolve_rights(&USER_ROLE, stamps.id).await?,
            permissions: store.resolve_rights(&ROLE_PERMISSION, stamps.id).await?,
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        })
    }
}
