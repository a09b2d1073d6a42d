use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Entity, Patch, Stamps, TaskStatus, Topic, User, nullable};
use crate::error::Result;
use crate::join::JoinRecord;
use crate::schema::{EntityDescriptor, TASK_TOPIC, TASKS};
use crate::store::EntityStore;
use crate::types::{Row, SqlValue};

/// A unit of work, prioritized on the importance/urgency matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub assigned_to_user_id: Option<i64>,
    pub task_status_id: Option<i64>,
    pub is_important: bool,
    pub is_urgent: bool,
    /// Estimated effort in minutes
    pub time_estimate: Option<i64>,
    pub created_by_user_id: Option<i64>,
    pub updated_by_user_id: Option<i64>,
    pub assigned_to: Option<User>,
    pub task_status: Option<TaskStatus>,
    pub created_by: Option<User>,
    pub updated_by: Option<User>,
    /// Topics through `TaskTopic`
    pub topics: Vec<Topic>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Writable task attributes
///
/// Nullable columns are `Option<Option<_>>`: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to_user_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_status_id: Option<Option<i64>>,
    pub is_important: Option<bool>,
    pub is_urgent: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub time_estimate: Option<Option<i64>>,
    pub updated_by_user_id: Option<i64>,
}

impl Task {
    pub fn new(name: impl Into<String>, created_by_user_id: i64) -> Self {
        Self {
            name: name.into(),
            created_by_user_id: Some(created_by_user_id),
            updated_by_user_id: Some(created_by_user_id),
            ..Self::default()
        }
    }

    pub async fn add_topic(
        store: &EntityStore,
        task_id: i64,
        topic_id: i64,
        created_by_user_id: i64,
    ) -> Result<u64> {
        store
            .join(&TASK_TOPIC)
            .add(JoinRecord::new(task_id, topic_id, created_by_user_id))
            .await
    }

    pub async fn erase_topic(store: &EntityStore, task_id: i64, topic_id: i64) -> Result<u64> {
        store.join(&TASK_TOPIC).remove_pair(task_id, topic_id).await
    }
}

#[async_trait]
impl Entity for Task {
    const DESCRIPTOR: EntityDescriptor = TASKS;

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
            self.assigned_to_user_id.into(),
            self.task_status_id.into(),
            self.is_important.into(),
            self.is_urgent.into(),
            self.time_estimate.into(),
            self.created_by_user_id.into(),
            self.updated_by_user_id.into(),
        ]
    }

    async fn hydrate(store: &EntityStore, row: Row) -> Result<Self> {
        let stamps = Stamps::read(&Self::DESCRIPTOR, &row)?;
        let assigned_to_user_id = row.i64("assignedToUserId");
        let task_status_id = row.i64("taskStatusId");
        let created_by_user_id = row.i64("createdByUserId");
        let updated_by_user_id = row.i64("updatedByUserId");

        Ok(Self {
            id: Some(stamps.id),
            name: row.text("name").unwrap_or_default(),
            description: row.text("description"),
            assigned_to_user_id,
            task_status_id,
            is_important: row.bool("isImportant").unwrap_or(false),
            is_urgent: row.bool("isUrgent").unwrap_or(false),
            time_estimate: row.i64("timeEstimate"),
            created_by_user_id,
            updated_by_user_id,
            assigned_to: store.resolve(assigned_to_user_id).await?,
            task_status: store.resolve(task_status_id).await?,
            created_by: store.resolve(created_by_user_id).await?,
            updated_by: store.resolve(updated_by_user_id).await?,
            topics: store.resolve_rights(&TASK_TOPIC, stamps.id).await?,
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        })
    }
}

impl Patch for Task {
    type Patch = TaskPatch;

    fn apply(&mut self, patch: TaskPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(id) = patch.assigned_to_user_id {
            if self.assigned_to_user_id != id {
                self.assigned_to = None;
            }
            self.assigned_to_user_id = id;
        }
        if let Some(id) = patch.task_status_id {
            if self.task_status_id != id {
                self.task_status = None;
            }
            self.task_status_id = id;
        }
        if let Some(is_important) = patch.is_important {
            self.is_important = is_important;
        }
        if let Some(is_urgent) = patch.is_urgent {
            self.is_urgent = is_urgent;
        }
        if let Some(time_estimate) = patch.time_estimate {
            self.time_estimate = time_estimate;
        }
        if let Some(id) = patch.updated_by_user_id {
            if self.updated_by_user_id != Some(id) {
                self.updated_by = None;
            }
            self.updated_by_user_id = Some(id);
        }
    }
}
