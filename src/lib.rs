//! # teamtask-store
//!
//! The relational data-access layer of the Team Task Manager.
//!
//! Every table is described by a static [`EntityDescriptor`] (table name plus
//! ordered writable columns). A single generic executor turns descriptors and
//! equality [`Criteria`] into parameterized SQL, and each entity hydrates its
//! rows into domain objects by resolving foreign keys and join tables.
//!
//! ## Features
//!
//! - **Generic CRUD**: `create`, `read_all`, `update`, `erase`, `search` for every entity
//! - **Positional Binding**: values are always bound to `?` placeholders, never spliced
//! - **Relational Hydration**: foreign keys resolve to nested objects, join tables to collections
//! - **Join-Table Management**: add, remove and transactional replace of association rows
//! - **Active Records**: entities bound to their store, with typed and JSON patches
//! - **SQL Injection Prevention**: identifiers are descriptor literals, validated and quoted
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use teamtask_store::{ActiveRecord, Criteria, EntityStore, Role, StoreConfig, User};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EntityStore::connect(StoreConfig::from_env()?).await?;
//!
//!     // Create a user
//!     let mut alice = ActiveRecord::<User>::new(&store);
//!     alice.set_json(serde_json::json!({
//!         "name": "Alice",
//!         "email": "alice@example.com",
//!         "hashPassword": "$argon2id$..."
//!     }))?;
//!     alice.create().await?;
//!
//!     // Give her a role and read it back fully hydrated
//!     let user_id = alice.id.unwrap_or_default();
//!     Role::add_user(&store, 1, user_id, user_id).await?;
//!
//!     let roles: Vec<Role> = store.search(&Criteria::by_id(1)).await?;
//!     for role in &roles {
//!         println!("{} has {} members", role.name, role.users.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use teamtask_store::{JoinPolicy, StoreConfig};
//!
//! let config = StoreConfig::builder("sqlite://tasks.db")
//!     .max_connections(10)                  // Pool size (default 5)
//!     .join_policy(JoinPolicy::Deduplicate) // Skip pairs that already exist
//!     .build();
//! ```
//!
//! ## Failure Handling
//!
//! Every operation returns [`Result`]. Callers that would rather render an
//! empty page than an error can degrade explicitly with [`Degrade`]:
//!
//! ```rust,no_run
//! # use teamtask_store::{Criteria, Degrade, EntityStore, Task};
//! # async fn page(store: &EntityStore) {
//! let tasks = store.search::<Task>(&Criteria::new()).await.or_log_empty("searchTask");
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod degrade;
pub mod error;
pub mod hydrate;
pub mod join;
pub mod model;
pub mod record;
pub mod schema;
pub mod sql;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use backend::{ExecOutcome, SqlBackend, SqliteBackend};
pub use config::{JoinPolicy, StoreConfig, StoreConfigBuilder};
pub use degrade::Degrade;
pub use error::{Result, StoreError};
pub use join::{JoinManager, JoinRecord};
pub use model::{
    Entity, Organization, Patch, Permission, Role, Task, TaskPatch, TaskStatus, Topic, User,
    UserPatch,
};
pub use record::ActiveRecord;
pub use schema::{EntityDescriptor, JoinTable};
pub use store::EntityStore;
pub use types::{Row, SqlValue};

// Re-export SQL utilities for advanced users
pub use sql::predicate::{Criteria, build_predicate};
pub use sql::sanitize::{quote_identifier, validate_identifier};
