//! Schema descriptors for every persisted table
//!
//! A descriptor is the static pair of table name and ordered writable column
//! list. The order of `attributes` is the order in which an entity reports
//! its values for INSERT and UPDATE; getting it wrong shifts data into the
//! wrong column without any error from the store.

/// Read-only columns every entity table carries
pub const ENTITY_READ_ONLY: &[&str] = &["id", "createdAt", "updatedAt"];

/// Read-only columns every join table carries
pub const JOIN_READ_ONLY: &[&str] = &["createdAt"];

/// Audit column written on every join-table insert
pub const CREATED_BY_COLUMN: &str = "createdByUserId";

/// Table name plus ordered column lists for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Table the entity lives in
    pub table_name: &'static str,
    /// Writable columns, in the order the entity reports its values
    pub attributes: &'static [&'static str],
    /// Columns managed by the store (primary key, timestamps)
    pub read_only: &'static [&'static str],
    /// Column results are ordered by, if any
    pub order_by: Option<&'static str>,
}

impl EntityDescriptor {
    /// Descriptor for an entity table keyed by an integer `id`
    pub const fn entity(table_name: &'static str, attributes: &'static [&'static str]) -> Self {
        Self {
            table_name,
            attributes,
            read_only: ENTITY_READ_ONLY,
            order_by: Some("id"),
        }
    }

    /// Descriptor for an association table without its own key
    pub const fn join(table_name: &'static str, attributes: &'static [&'static str]) -> Self {
        Self {
            table_name,
            attributes,
            read_only: JOIN_READ_ONLY,
            order_by: None,
        }
    }

    /// Whether `column` is declared by this descriptor
    pub fn has_column(&self, column: &str) -> bool {
        self.columns().any(|c| c == column)
    }

    /// All declared columns: read-only first, then attributes
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + use<> {
        let read_only = self.read_only;
        let attributes = self.attributes;
        read_only.iter().chain(attributes.iter()).copied()
    }
}

/// A many-to-many association table `(left, right, createdByUserId)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinTable {
    pub descriptor: EntityDescriptor,
    pub left: &'static str,
    pub right: &'static str,
}

impl JoinTable {
    pub const fn new(
        descriptor: EntityDescriptor,
        left: &'static str,
        right: &'static str,
    ) -> Self {
        Self {
            descriptor,
            left,
            right,
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.descriptor.table_name
    }

    /// The opposite id column of `column`, if `column` is one of the pair
    pub fn partner(&self, column: &str) -> Option<&'static str> {
        if column == self.left {
            Some(self.right)
        } else if column == self.right {
            Some(self.left)
        } else {
            None
        }
    }
}

// ============================================================================
// Entity Tables
// ============================================================================

pub const USERS: EntityDescriptor =
    EntityDescriptor::entity("Users", &["name", "email", "hashPassword"]);

pub const ORGANIZATIONS: EntityDescriptor = EntityDescriptor::entity(
    "Organizations",
    &["name", "description", "createdByUserId", "updatedByUserId"],
);

pub const ROLES: EntityDescriptor = EntityDescriptor::entity(
    "Roles",
    &[
        "name",
        "description",
        "organizationId",
        "createdByUserId",
        "updatedByUserId",
    ],
);

pub const PERMISSIONS: EntityDescriptor = EntityDescriptor::entity(
    "Permissions",
    &["name", "description", "createdByUserId", "updatedByUserId"],
);

pub const TASK_STATUS: EntityDescriptor =
    EntityDescriptor::entity("TaskStatus", &["name", "description"]);

pub const TOPICS: EntityDescriptor = EntityDescriptor::entity(
    "Topics",
    &[
        "name",
        "description",
        "organizationId",
        "createdByUserId",
        "updatedByUserId",
    ],
);

pub const TASKS: EntityDescriptor = EntityDescriptor::entity(
    "Tasks",
    &[
        "name",
        "description",
        "assignedToUserId",
        "taskStatusId",
        "isImportant",
        "isUrgent",
        "timeEstimate",
        "createdByUserId",
        "updatedByUserId",
    ],
);

// ============================================================================
// Join Tables
// ============================================================================

pub const USER_ROLE: JoinTable = JoinTable::new(
    EntityDescriptor::join("UserRole", &["roleId", "userId", CREATED_BY_COLUMN]),
    "roleId",
    "userId",
);

pub const ROLE_PERMISSION: JoinTable = JoinTable::new(
    EntityDescriptor::join(
        "RolePermission",
        &["roleId", "permissionId", CREATED_BY_COLUMN],
    ),
    "roleId",
    "permissionId",
);

pub const USER_ORGANIZATION: JoinTable = JoinTable::new(
    EntityDescriptor::join(
        "UserOrganization",
        &["organizationId", "userId", CREATED_BY_COLUMN],
    ),
    "organizationId",
    "userId",
);

pub const USER_TOPIC: JoinTable = JoinTable::new(
    EntityDescriptor::join("UserTopic", &["topicId", "userId", CREATED_BY_COLUMN]),
    "topicId",
    "userId",
);

pub const TASK_TOPIC: JoinTable = JoinTable::new(
    EntityDescriptor::join("TaskTopic", &["taskId", "topicId", CREATED_BY_COLUMN]),
    "taskId",
    "topicId",
);

pub const ENTITY_TABLES: &[EntityDescriptor] = &[
    USERS,
    ORGANIZATIONS,
    ROLES,
    PERMISSIONS,
    TASK_STATUS,
    TOPICS,
    TASKS,
];

pub const JOIN_TABLES: &[JoinTable] = &[
    USER_ROLE,
    ROLE_PERMISSION,
    USER_ORGANIZATION,
    USER_TOPIC,
    TASK_TOPIC,
];
