use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Entity, Organization, Patch, Role, Stamps, Task, Topic};
use crate::error::Result;
use crate::record::ActiveRecord;
use crate::schema::{EntityDescriptor, USER_ORGANIZATION, USER_ROLE, USER_TOPIC, USERS};
use crate::sql::Criteria;
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

/// An account; the password hash is never serialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_password: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Writable user attributes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub hash_password: Option<String>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        hash_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            hash_password: hash_password.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Entity for User {
    const DESCRIPTOR: EntityDescriptor = USERS;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn attribute_values(&self) -> Vec<SqlValue> {
        vec![
            self.name.as_str().into(),
            self.email.as_str().into(),
            self.hash_password.as_str().into(),
        ]
    }

    async fn hydrate(_store: &EntityStore, row: Row) -> Result<Self> {
        let stamps = Stamps::read(&Self::DESCRIPTOR, &row)?;
        Ok(Self {
            id: Some(stamps.id),
            name: row.text("name").unwrap_or_default(),
            email: row.text("email").unwrap_or_default(),
            hash_password: row.text("hashPassword").unwrap_or_default(),
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        })
    }
}

impl Patch for User {
    type Patch = UserPatch;

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(hash_password) = patch.hash_password {
            self.hash_password = hash_password;
        }
    }
}

/// Lazy relations of a user; each call runs its own queries
impl ActiveRecord<User> {
    /// Roles the user holds through `UserRole`
    pub async fn roles(&self) -> Result<Vec<Role>> {
        let id = self.require_id()?;
        self.store().resolve_lefts(&USER_ROLE, id).await
    }

    /// Organizations the user belongs to through `UserOrganization`
    pub async fn organizations(&self) -> Result<Vec<Organization>> {
        let id = self.require_id()?;
        self.store().resolve_lefts(&USER_ORGANIZATION, id).await
    }

    /// Topics the user is a member of through `UserTopic`
    pub async fn projects(&self) -> Result<Vec<Topic>> {
        let id = self.require_id()?;
        self.store().resolve_lefts(&USER_TOPIC, id).await
    }

    /// Topics the user created
    pub async fn topics(&self) -> Result<Vec<Topic>> {
        let id = self.require_id()?;
        self.store()
            .search(&Criteria::new().eq("createdByUserId", id))
            .await
    }

    /// Tasks assigned to the user
    pub async fn tasks(&self) -> Result<Vec<Task>> {
        let id = self.require_id()?;
        self.store()
            .search(&Criteria::new().eq("assignedToUserId", id))
            .await
    }
}
