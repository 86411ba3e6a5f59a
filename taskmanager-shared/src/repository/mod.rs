/// Repository interfaces
///
/// One trait per entity. Services only ever talk to these traits, so the
/// same service code runs against PostgreSQL ([`PgRepository`]) and against
/// the in-process store ([`InMemoryStore`]).
///
/// Both implementations keep the same contract:
///
/// - `find_all` returns rows in insertion order
/// - user emails are unique; a duplicate yields `StoreError::Constraint`
/// - deleting a role clears `role_id` on its users
/// - deleting a user clears `owner_id` on its tasks (owner name is kept)
/// - `find_by_owner_order_by_date_desc` orders by due date descending,
///   ties in insertion order
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::repository::Repositories;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repos = Repositories::in_memory();
/// let roles = repos.roles.find_all().await?;
/// assert!(roles.is_empty());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgRepository;

use crate::error::StoreResult;
use crate::models::role::{CreateRole, Role};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Role persistence
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, data: CreateRole) -> StoreResult<Role>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>>;

    /// Earliest role with this name
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>>;

    async fn find_all(&self) -> StoreResult<Vec<Role>>;

    /// Returns true if a role was deleted
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;

    async fn find_all(&self) -> StoreResult<Vec<User>>;

    /// Returns `None` if the user doesn't exist
    async fn update(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Returns true if a user was deleted
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;
}

/// Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>>;

    async fn find_all(&self) -> StoreResult<Vec<Task>>;

    async fn find_by_owner_order_by_date_desc(&self, owner_id: i64) -> StoreResult<Vec<Task>>;

    /// Tasks without an owner
    async fn find_unowned(&self) -> StoreResult<Vec<Task>>;

    /// Returns `None` if the task doesn't exist
    async fn update(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// Returns true if a task was deleted
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;
}

/// The three repositories backed by one store
#[derive(Clone)]
pub struct Repositories {
    pub roles: Arc<dyn RoleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// Repositories over a PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        let repo = Arc::new(PgRepository::new(pool));
        Self {
            roles: repo.clone(),
            users: repo.clone(),
            tasks: repo,
        }
    }

    /// Repositories over a fresh, empty in-memory store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    /// Repositories sharing an existing in-memory store
    pub fn from_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            roles: store.clone(),
            users: store.clone(),
            tasks: store,
        }
    }
}
