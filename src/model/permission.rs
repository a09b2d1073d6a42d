use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Entity, Stamps, User};
use crate::error::Result;
use crate::schema::{EntityDescriptor, PERMISSIONS};
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permission {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub created_by_user_id: Option<i64>,
    pub updated_by_user_id: Option<i64>,
    pub created_by: Option<User>,
    pub updated_by: Option<User>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Permission {
    pub fn new(name: impl Into<String>, created_by_user_id: i64) -> Self {
        Self {
            name: name.into(),
            created_by_user_id: Some(created_by_user_id),
            updated_by_user_id: Some(created_by_user_id),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Entity for Permission {
    const DESCRIPTOR: EntityDescriptor = PERMISSIONS;

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
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        })
    }
}
