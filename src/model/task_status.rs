use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Entity, Stamps};
use crate::error::Result;
use crate::schema::{EntityDescriptor, TASK_STATUS};
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

/// A workflow state a task can be in (lookup table)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskStatus {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TaskStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Entity for TaskStatus {
    const DESCRIPTOR: EntityDescriptor = TASK_STATUS;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn attribute_values(&self) -> Vec<SqlValue> {
        vec![self.name.as_str().into(), self.description.clone().into()]
    }

    async fn hydrate(_store: &EntityStore, row: Row) -> Result<Self> {
        let stamps = Stamps::read(&Self::DESCRIPTOR, &row)?;
        Ok(Self {
            id: Some(stamps.id),
            name: row.text("name").unwrap_or_default(),
            description: row.text("description"),
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        })
    }
}
