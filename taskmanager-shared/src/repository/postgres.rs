/// PostgreSQL repositories
///
/// Delegates to the model queries and classifies sqlx errors into
/// `StoreError` (constraint violations become `StoreError::Constraint`).

use crate::error::StoreResult;
use crate::models::role::{CreateRole, Role};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repository::{RoleRepository, TaskRepository, UserRepository};
use async_trait::async_trait;
use sqlx::PgPool;

/// Repository implementation over a `PgPool`
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RoleRepository for PgRepository {
    async fn create(&self, data: CreateRole) -> StoreResult<Role> {
        Ok(Role::create(&self.pool, data).await?)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>> {
        Ok(Role::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        Ok(Role::find_by_name(&self.pool, name).await?)
    }

    async fn find_all(&self) -> StoreResult<Vec<Role>> {
        Ok(Role::list(&self.pool).await?)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(Role::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(User::exists_by_email(&self.pool, email).await?)
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    async fn update(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(User::count(&self.pool).await?)
    }
}

#[async_trait]
impl TaskRepository for PgRepository {
    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn find_all(&self) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool).await?)
    }

    async fn find_by_owner_order_by_date_desc(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn find_unowned(&self) -> StoreResult<Vec<Task>> {
        Ok(Task::list_unowned(&self.pool).await?)
    }

    async fn update(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(Task::count(&self.pool).await?)
    }
}
