//! Integration tests for teamtask-store
//!
//! Every test runs against its own in-memory SQLite database created from
//! `tests/fixtures/schema.sql`, so no external service is needed.
//!
//! Example:
//! ```bash
//! RUST_LOG=teamtask_store=debug cargo test --test integration
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use teamtask_store::sql::Statement;
use teamtask_store::{
    ActiveRecord, Criteria, Degrade, EntityDescriptor, EntityStore, ExecOutcome, JoinPolicy,
    JoinRecord, JoinTable, Organization, Permission, Role, Row, SqlBackend, SqliteBackend,
    StoreConfig, StoreError, Task, TaskPatch, TaskStatus, Topic, User, UserPatch,
};
use teamtask_store::schema::{USER_ROLE, USER_TOPIC};

const SCHEMA: &str = include_str!("fixtures/schema.sql");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh in-memory store with the full schema
async fn create_test_store(join_policy: JoinPolicy) -> EntityStore {
    init_tracing();

    let backend = SqliteBackend::connect(&StoreConfig::in_memory())
        .await
        .expect("Should connect to in-memory database");
    sqlx::raw_sql(SCHEMA)
        .execute(backend.pool())
        .await
        .expect("Should create schema");

    EntityStore::with_backend(Arc::new(backend), join_policy)
}

async fn exec(store: &EntityStore, sql: &str) {
    store
        .backend()
        .execute(&Statement::raw(sql))
        .await
        .expect("Fixture statement should succeed");
}

/// Role 1 "Admin" in organization 5 "Acme", created by user 2 "Alice"
async fn seed_admin_role(store: &EntityStore) {
    exec(
        store,
        "INSERT INTO \"Users\" (\"id\", \"name\", \"email\", \"hashPassword\") VALUES (2, 'Alice', 'alice@example.com', 'h1')",
    )
    .await;
    exec(
        store,
        "INSERT INTO \"Users\" (\"id\", \"name\", \"email\", \"hashPassword\") VALUES (3, 'Bob', 'bob@example.com', 'h2')",
    )
    .await;
    exec(
        store,
        "INSERT INTO \"Organizations\" (\"id\", \"name\") VALUES (5, 'Acme')",
    )
    .await;
    exec(
        store,
        "INSERT INTO \"Roles\" (\"id\", \"name\", \"organizationId\", \"createdByUserId\", \"updatedByUserId\") VALUES (1, 'Admin', 5, 2, 2)",
    )
    .await;
}

async fn find_role(store: &EntityStore, id: i64) -> Role {
    store
        .find::<Role>(id)
        .await
        .expect("Should search roles")
        .expect("Role should exist")
}

/// Backend whose every call fails
struct FailingBackend;

#[async_trait]
impl SqlBackend for FailingBackend {
    async fn fetch(&self, _statement: &Statement) -> teamtask_store::Result<Vec<Row>> {
        Err(StoreError::Connection("database is offline".to_string()))
    }

    async fn execute(&self, _statement: &Statement) -> teamtask_store::Result<ExecOutcome> {
        Err(StoreError::Connection("database is offline".to_string()))
    }

    async fn execute_in_transaction(&self, _statements: &[Statement]) -> teamtask_store::Result<u64> {
        Err(StoreError::Connection("database is offline".to_string()))
    }
}

fn failing_store() -> EntityStore {
    EntityStore::with_backend(Arc::new(FailingBackend), JoinPolicy::default())
}

// ==================== CRUD Tests ====================

#[tokio::test]
async fn test_create_then_search_round_trip() {
    let store = create_test_store(JoinPolicy::default()).await;

    let user = User::new("Alice", "alice@example.com", "h4sh");
    let id = store.create(&user).await.expect("Should create user");

    let found: Vec<User> = store
        .search(&Criteria::by_id(id))
        .await
        .expect("Should search users");
    assert_eq!(found.len(), 1);

    let mut expected = user;
    expected.id = Some(id);
    expected.created_at = found[0].created_at;
    expected.updated_at = found[0].updated_at;
    assert_eq!(found[0], expected);
    assert!(found[0].created_at.is_some());
}

#[tokio::test]
async fn test_search_by_several_columns() {
    let store = create_test_store(JoinPolicy::default()).await;

    store
        .create(&User::new("Alice", "alice@example.com", "h"))
        .await
        .unwrap();
    store
        .create(&User::new("Alice", "alice@other.org", "h"))
        .await
        .unwrap();

    let found: Vec<User> = store
        .search(
            &Criteria::new()
                .eq("name", "Alice")
                .eq("email", "alice@other.org"),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "alice@other.org");

    let none: Vec<User> = store
        .search(&Criteria::new().eq("name", "Nobody"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_read_all_in_id_order() {
    let store = create_test_store(JoinPolicy::default()).await;

    for name in ["Open", "In progress", "Done"] {
        store.create(&TaskStatus::new(name)).await.unwrap();
    }

    let statuses: Vec<TaskStatus> = store.read_all().await.expect("Should read all");
    let names: Vec<_> = statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Open", "In progress", "Done"]);

    // Empty criteria is an unfiltered search
    let searched: Vec<TaskStatus> = store.search(&Criteria::new()).await.unwrap();
    assert_eq!(searched, statuses);
}

#[tokio::test]
async fn test_update_writes_every_attribute() {
    let store = create_test_store(JoinPolicy::default()).await;

    let mut permission = Permission::new("tasks.read", 1);
    let id = store.create(&permission).await.unwrap();
    permission.id = Some(id);
    permission.description = Some("Read any task".to_string());
    permission.updated_by_user_id = Some(7);

    let affected = store.update(&permission).await.expect("Should update");
    assert_eq!(affected, 1);

    let stored = store.find::<Permission>(id).await.unwrap().unwrap();
    assert_eq!(stored.description.as_deref(), Some("Read any task"));
    assert_eq!(stored.created_by_user_id, Some(1));
    assert_eq!(stored.updated_by_user_id, Some(7));
}

#[tokio::test]
async fn test_update_without_id_is_rejected() {
    let store = create_test_store(JoinPolicy::default()).await;

    let err = store
        .update(&Permission::new("tasks.write", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingId("Permissions")));
}

#[tokio::test]
async fn test_erase_twice() {
    let store = create_test_store(JoinPolicy::default()).await;

    let id = store.create(&TaskStatus::new("Blocked")).await.unwrap();

    let first = store
        .erase::<TaskStatus>(&Criteria::by_id(id))
        .await
        .expect("Should erase");
    let second = store
        .erase::<TaskStatus>(&Criteria::by_id(id))
        .await
        .expect("Second erase should not error");

    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert!(store.find::<TaskStatus>(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_erase_with_empty_criteria_is_rejected() {
    let store = create_test_store(JoinPolicy::default()).await;
    store.create(&TaskStatus::new("Open")).await.unwrap();

    let err = store.erase::<TaskStatus>(&Criteria::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::EmptyCriteria("TaskStatus")));

    let remaining: Vec<TaskStatus> = store.read_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn test_unknown_column_is_rejected_before_the_store() {
    // Validation runs first, so the failing backend is never reached
    let store = failing_store();

    let err = store
        .search::<Role>(&Criteria::new().eq("organization", 5_i64))
        .await
        .unwrap_err();
    match err {
        StoreError::UnknownColumn { table, column } => {
            assert_eq!(table, "Roles");
            assert_eq!(column, "organization");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = store
        .erase::<User>(&Criteria::new().eq("name; DROP TABLE Users", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownColumn { .. }));
}

#[tokio::test]
async fn test_values_are_bound_not_spliced() {
    let store = create_test_store(JoinPolicy::default()).await;
    store
        .create(&User::new("Alice", "alice@example.com", "h"))
        .await
        .unwrap();

    let found: Vec<User> = store
        .search(&Criteria::new().eq("name", "x' OR '1'='1"))
        .await
        .unwrap();
    assert!(found.is_empty());
}

// ==================== Hydration Tests ====================

#[tokio::test]
async fn test_roles_end_to_end() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    let roles: Vec<Role> = store
        .search(&Criteria::by_id(1))
        .await
        .expect("Should search roles");
    assert_eq!(roles.len(), 1);

    let role = &roles[0];
    assert_eq!(role.id, Some(1));
    assert_eq!(role.name, "Admin");

    let organization = role.organization.as_ref().expect("Organization should resolve");
    assert_eq!(organization.id, Some(5));
    assert_eq!(organization.name, "Acme");

    let created_by = role.created_by.as_ref().expect("Creator should resolve");
    assert_eq!(created_by.id, Some(2));
    assert_eq!(created_by.name, "Alice");

    let updated_by = role.updated_by.as_ref().expect("Updater should resolve");
    assert_eq!(updated_by.id, Some(2));
    assert_eq!(updated_by.name, "Alice");

    assert!(role.users.is_empty());
    assert!(role.permissions.is_empty());

    let json = serde_json::to_value(role).unwrap();
    assert_eq!(json["createdBy"]["name"], "Alice");
    assert_eq!(json["organization"]["name"], "Acme");
    assert!(json["createdBy"].get("hashPassword").is_none());
}

#[tokio::test]
async fn test_add_user_then_hydrate_includes_user_once() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    let added = Role::add_user(&store, 1, 3, 2).await.expect("Should add user");
    assert_eq!(added, 1);

    let role = find_role(&store, 1).await;
    let user_ids: Vec<_> = role.users.iter().map(|u| u.id).collect();
    assert_eq!(user_ids, vec![Some(3)]);
    assert_eq!(role.users[0].name, "Bob");
}

#[tokio::test]
async fn test_duplicate_join_rows_are_kept_by_default() {
    let store = create_test_store(JoinPolicy::AllowDuplicates).await;
    seed_admin_role(&store).await;

    Role::add_user(&store, 1, 3, 2).await.unwrap();
    Role::add_user(&store, 1, 3, 2).await.unwrap();

    let role = find_role(&store, 1).await;
    assert_eq!(role.users.len(), 2);
    assert!(role.users.iter().all(|u| u.id == Some(3)));

    // Removing the pair removes every duplicate
    let removed = Role::erase_user(&store, 1, 3).await.unwrap();
    assert_eq!(removed, 2);
    assert!(find_role(&store, 1).await.users.is_empty());
}

#[tokio::test]
async fn test_duplicate_join_rows_are_skipped_when_deduplicating() {
    let store = create_test_store(JoinPolicy::Deduplicate).await;
    seed_admin_role(&store).await;

    let first = Role::add_user(&store, 1, 3, 2).await.unwrap();
    let second = Role::add_user(&store, 1, 3, 2).await.unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 0);

    let role = find_role(&store, 1).await;
    assert_eq!(role.users.len(), 1);
}

#[tokio::test]
async fn test_missing_parent_resolves_to_none() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    store
        .erase::<Organization>(&Criteria::by_id(5))
        .await
        .unwrap();
    exec(
        &store,
        "UPDATE \"Roles\" SET \"updatedByUserId\" = NULL WHERE \"id\" = 1",
    )
    .await;

    let role = find_role(&store, 1).await;
    assert_eq!(role.organization_id, Some(5));
    assert!(role.organization.is_none());
    assert!(role.updated_by.is_none());
    assert!(role.created_by.is_some());
}

#[tokio::test]
async fn test_unresolved_join_partner_is_skipped() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    Role::add_user(&store, 1, 42, 2).await.unwrap();
    Role::add_user(&store, 1, 3, 2).await.unwrap();

    let role = find_role(&store, 1).await;
    let user_ids: Vec<_> = role.users.iter().map(|u| u.id).collect();
    assert_eq!(user_ids, vec![Some(3)]);
}

#[tokio::test]
async fn test_role_permissions() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    let read = store.create(&Permission::new("tasks.read", 2)).await.unwrap();
    let write = store.create(&Permission::new("tasks.write", 2)).await.unwrap();
    Role::add_permission(&store, 1, read, 2).await.unwrap();
    Role::add_permission(&store, 1, write, 2).await.unwrap();
    Role::erase_permission(&store, 1, read).await.unwrap();

    let role = find_role(&store, 1).await;
    assert_eq!(role.permissions.len(), 1);
    assert_eq!(role.permissions[0].name, "tasks.write");
    assert_eq!(
        role.permissions[0]
            .created_by
            .as_ref()
            .map(|u| u.name.as_str()),
        Some("Alice")
    );
}

#[tokio::test]
async fn test_task_hydration() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    let status = store.create(&TaskStatus::new("Open")).await.unwrap();
    let topic = store.create(&Topic::new("Launch", 5, 2)).await.unwrap();

    let task = Task {
        assigned_to_user_id: Some(3),
        task_status_id: Some(status),
        is_important: true,
        time_estimate: Some(45),
        ..Task::new("Write release notes", 2)
    };
    let task_id = store.create(&task).await.unwrap();
    Task::add_topic(&store, task_id, topic, 2).await.unwrap();

    let stored = store.find::<Task>(task_id).await.unwrap().unwrap();
    assert!(stored.is_important);
    assert!(!stored.is_urgent);
    assert_eq!(stored.time_estimate, Some(45));
    assert_eq!(stored.assigned_to.as_ref().map(|u| u.name.as_str()), Some("Bob"));
    assert_eq!(stored.task_status.as_ref().map(|s| s.name.as_str()), Some("Open"));
    assert_eq!(stored.topics.len(), 1);
    assert_eq!(
        stored.topics[0].organization.as_ref().map(|o| o.name.as_str()),
        Some("Acme")
    );

    Task::erase_topic(&store, task_id, topic).await.unwrap();
    let stored = store.find::<Task>(task_id).await.unwrap().unwrap();
    assert!(stored.topics.is_empty());
}

#[tokio::test]
async fn test_organization_and_topic_members() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;

    Organization::add_user(&store, 5, 2, 2).await.unwrap();
    Organization::add_user(&store, 5, 3, 2).await.unwrap();
    let topic = store.create(&Topic::new("Ops", 5, 2)).await.unwrap();
    Topic::add_user(&store, topic, 3, 2).await.unwrap();

    let organization = store.find::<Organization>(5).await.unwrap().unwrap();
    let names: Vec<_> = organization.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    Organization::erase_user(&store, 5, 2).await.unwrap();
    Topic::erase_user(&store, topic, 3).await.unwrap();

    let organization = store.find::<Organization>(5).await.unwrap().unwrap();
    assert_eq!(organization.users.len(), 1);
    let topic = store.find::<Topic>(topic).await.unwrap().unwrap();
    assert!(topic.users.is_empty());
}

// ==================== Join Manager Tests ====================

#[tokio::test]
async fn test_join_ids_preserve_duplicates() {
    let store = create_test_store(JoinPolicy::default()).await;
    let roles = store.join(&USER_ROLE);

    roles.add(JoinRecord::new(1, 3, 2)).await.unwrap();
    roles.add(JoinRecord::new(1, 4, 2)).await.unwrap();
    roles.add(JoinRecord::new(1, 3, 2)).await.unwrap();
    roles.add(JoinRecord::new(2, 3, 2)).await.unwrap();

    assert_eq!(roles.right_ids(1).await.unwrap(), vec![3, 4, 3]);
    assert_eq!(roles.left_ids(3).await.unwrap(), vec![1, 1, 2]);

    let removed = roles
        .remove(&Criteria::new().eq("createdByUserId", 2_i64).eq("roleId", 1_i64))
        .await
        .unwrap();
    assert_eq!(removed, 3);
    assert_eq!(roles.left_ids(3).await.unwrap(), vec![2]);
}

#[tokio::test]
async fn test_replace_join_rows() {
    let store = create_test_store(JoinPolicy::default()).await;
    let members = store.join(&USER_TOPIC);

    members.add(JoinRecord::new(7, 1, 1)).await.unwrap();
    members.add(JoinRecord::new(7, 2, 1)).await.unwrap();
    members.add(JoinRecord::new(8, 1, 1)).await.unwrap();

    let affected = members.replace(7, &[2, 3, 4], 1).await.expect("Should replace");
    assert_eq!(affected, 2 + 3);

    assert_eq!(members.right_ids(7).await.unwrap(), vec![2, 3, 4]);
    assert_eq!(members.right_ids(8).await.unwrap(), vec![1]);
}

#[tokio::test]
async fn test_replace_rolls_back_on_failure() {
    const BROKEN: JoinTable = JoinTable::new(
        EntityDescriptor::join("UserTopic", &["topicId", "userId", "approvedByUserId"]),
        "topicId",
        "userId",
    );

    let store = create_test_store(JoinPolicy::default()).await;
    store
        .join(&USER_TOPIC)
        .add(JoinRecord::new(7, 1, 1))
        .await
        .unwrap();

    // The DELETE succeeds, the INSERT names a missing column
    let result = store.join(&BROKEN).replace(7, &[2], 1).await;
    assert!(matches!(result, Err(StoreError::Sql(_))));

    assert_eq!(store.join(&USER_TOPIC).right_ids(7).await.unwrap(), vec![1]);
}

#[tokio::test]
async fn test_remove_requires_criteria() {
    let store = create_test_store(JoinPolicy::default()).await;

    let err = store
        .join(&USER_ROLE)
        .remove(&Criteria::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyCriteria("UserRole")));

    let err = store
        .join(&USER_ROLE)
        .remove(&Criteria::by_id(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownColumn { .. }));
}

// ==================== Active Record Tests ====================

#[tokio::test]
async fn test_active_record_lifecycle() {
    let store = create_test_store(JoinPolicy::default()).await;

    let mut user = ActiveRecord::<User>::new(&store);
    assert!(user.id.is_none());

    user.set_json(serde_json::json!({
        "name": "Alice",
        "email": "alice@example.com",
        "hashPassword": "h1"
    }))
    .expect("Should accept declared attributes");
    user.create().await.expect("Should create");
    let id = user.id.expect("Create should assign an id");

    user.set(UserPatch {
        email: Some("alice@acme.test".to_string()),
        ..UserPatch::default()
    })
    .update()
    .await
    .expect("Should update");

    let found = ActiveRecord::<User>::search(&store, &Criteria::by_id(id))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "alice@acme.test");
    assert_eq!(found[0].hash_password, "h1");

    let json = found[0].to_json().unwrap();
    assert_eq!(json["email"], "alice@acme.test");
    assert!(json.get("hashPassword").is_none());

    let record = found.into_iter().next().unwrap();
    assert_eq!(record.erase().await.unwrap(), 1);
    assert!(store.find::<User>(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_json_rejects_unknown_keys() {
    let store = create_test_store(JoinPolicy::default()).await;

    let mut user = ActiveRecord::from_entity(&store, User::new("Alice", "a@x", "h"));
    let err = user
        .set_json(serde_json::json!({"name": "Mallory", "isAdmin": true}))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPatch(_)));
    assert_eq!(user.name, "Alice");

    let mut task = ActiveRecord::from_entity(&store, Task::new("Plan", 1));
    assert!(task.set_json(serde_json::json!({"id": 99})).is_err());
    task.set_json(serde_json::json!({"isUrgent": true}))
        .expect("Should accept declared attribute");
    assert!(task.is_urgent);
}

#[tokio::test]
async fn test_task_patch_and_update() {
    let store = create_test_store(JoinPolicy::default()).await;
    seed_admin_role(&store).await;
    let open = store.create(&TaskStatus::new("Open")).await.unwrap();
    let done = store.create(&TaskStatus::new("Done")).await.unwrap();

    let mut task = ActiveRecord::from_entity(
        &store,
        Task {
            task_status_id: Some(open),
            ..Task::new("Ship", 2)
        },
    );
    task.create().await.unwrap();

    task.set(TaskPatch {
        task_status_id: Some(Some(done)),
        updated_by_user_id: Some(3),
        ..TaskPatch::default()
    });
    task.update().await.unwrap();

    let stored = store.find::<Task>(task.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.task_status.map(|s| s.name), Some("Done".to_string()));
    assert_eq!(stored.updated_by.map(|u| u.name), Some("Bob".to_string()));
}

#[tokio::test]
async fn test_set_json_null_unassigns_task() {
    let store = create_test_store(JoinPolicy::default()).await;
    let alice = store
        .create(&User::new("Alice", "alice@example.com", "h"))
        .await
        .unwrap();

    let mut task = ActiveRecord::from_entity(
        &store,
        Task {
            description: Some("d".to_string()),
            assigned_to_user_id: Some(alice),
            time_estimate: Some(30),
            ..Task::new("Ship", alice)
        },
    );
    task.create().await.unwrap();
    assert!(task.assigned_to.is_some());

    task.set_json(serde_json::json!({
        "assignedToUserId": null,
        "timeEstimate": null,
        "description": null
    }))
    .expect("Should accept explicit nulls");
    task.update().await.unwrap();

    let stored = store.find::<Task>(task.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.assigned_to_user_id, None);
    assert!(stored.assigned_to.is_none());
    assert_eq!(stored.time_estimate, None);
    assert_eq!(stored.description, None);
    assert_eq!(stored.name, "Ship");
    assert_eq!(stored.created_by_user_id, Some(alice));
}

#[tokio::test]
async fn test_create_fills_store_managed_columns() {
    let store = create_test_store(JoinPolicy::default()).await;

    let mut status = ActiveRecord::from_entity(&store, TaskStatus::new("Open"));
    status.create().await.unwrap();

    assert!(status.id.is_some());
    assert!(status.created_at.is_some());
    assert!(status.updated_at.is_some());
    assert_eq!(status.name, "Open");
}

#[tokio::test]
async fn test_update_refreshes_updated_at() {
    let store = create_test_store(JoinPolicy::default()).await;

    let id = store.create(&TaskStatus::new("Open")).await.unwrap();
    exec(
        &store,
        "UPDATE \"TaskStatus\" SET \"createdAt\" = '2000-01-01 00:00:00', \"updatedAt\" = '2000-01-01 00:00:00'",
    )
    .await;

    let mut status = store.find::<TaskStatus>(id).await.unwrap().unwrap();
    let stale = status.updated_at.expect("updatedAt should be set");
    status.description = Some("Not started".to_string());
    store.update(&status).await.unwrap();

    let stored = store.find::<TaskStatus>(id).await.unwrap().unwrap();
    assert_eq!(stored.created_at, Some(stale));
    assert!(stored.updated_at.expect("updatedAt should be set") > stale);
}

#[tokio::test]
async fn test_erase_unsaved_record_is_rejected() {
    let store = create_test_store(JoinPolicy::default()).await;

    let err = ActiveRecord::<User>::new(&store).erase().await.unwrap_err();
    assert!(matches!(err, StoreError::MissingId("Users")));
}

#[tokio::test]
async fn test_user_relation_accessors() {
    let store = create_test_store(JoinPolicy::default()).await;

    let alice = store.create(&User::new("Alice", "alice@example.com", "h")).await.unwrap();
    let bob = store.create(&User::new("Bob", "bob@example.com", "h")).await.unwrap();

    let acme = store.create(&Organization::new("Acme", alice)).await.unwrap();
    Organization::add_user(&store, acme, alice, alice).await.unwrap();

    let admin = store.create(&Role::new("Admin", acme, alice)).await.unwrap();
    store.create(&Role::new("Viewer", acme, alice)).await.unwrap();
    Role::add_user(&store, admin, alice, alice).await.unwrap();

    store.create(&Topic::new("Launch", acme, alice)).await.unwrap();
    let ops = store.create(&Topic::new("Ops", acme, bob)).await.unwrap();
    Topic::add_user(&store, ops, alice, bob).await.unwrap();

    store
        .create(&Task {
            assigned_to_user_id: Some(alice),
            ..Task::new("Review budget", bob)
        })
        .await
        .unwrap();
    store
        .create(&Task {
            assigned_to_user_id: Some(bob),
            ..Task::new("Book venue", alice)
        })
        .await
        .unwrap();

    let record = ActiveRecord::<User>::search(&store, &Criteria::by_id(alice))
        .await
        .unwrap()
        .into_iter()
        .next()
        .expect("Alice should exist");

    let roles = record.roles().await.unwrap();
    assert_eq!(roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Admin"]);

    let organizations = record.organizations().await.unwrap();
    assert_eq!(organizations.len(), 1);
    assert_eq!(organizations[0].name, "Acme");

    let projects = record.projects().await.unwrap();
    assert_eq!(projects.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["Ops"]);

    let topics = record.topics().await.unwrap();
    assert_eq!(topics.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["Launch"]);

    let tasks = record.tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "Review budget");
}

// ==================== Degrade Tests ====================

#[tokio::test]
async fn test_degrade_on_failing_backend() {
    init_tracing();
    let store = failing_store();

    let users = store
        .search::<User>(&Criteria::new())
        .await
        .or_log_empty("searchUser");
    assert!(users.is_empty());

    let created = store
        .create(&User::new("Alice", "a@x", "h"))
        .await
        .ok_or_log("createUser");
    assert!(created.is_none());

    let record = ActiveRecord::<User>::from_entity(
        &store,
        User {
            id: Some(1),
            ..User::default()
        },
    );
    let roles = record.roles().await.or_log_empty("searchUserRoles");
    assert!(roles.is_empty());

    let err = store.search::<User>(&Criteria::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::Connection(_)));
}
