/// Task model and database operations
///
/// A task has a due date, a completion flag and an optional owner. The owner's
/// name is copied into `owner_name` when the task is created and is never
/// resynchronised afterwards: renaming, reassigning or deleting the owner
/// leaves it as it was.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     date DATE NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_name VARCHAR(255),
///     owner_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::task::{Task, CreateTask};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     name: "Write release notes".to_string(),
///     description: String::new(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     is_completed: false,
///     owner_name: Some("Ann".to_string()),
///     owner_id: Some(3),
/// }).await?;
///
/// let for_ann = Task::list_by_owner(&pool, 3).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Auto-assigned task ID
    pub id: i64,

    /// Short task name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Due date
    pub date: NaiveDate,

    /// Whether the task is done
    pub is_completed: bool,

    /// Owner's name as it was when the task was created
    pub owner_name: Option<String>,

    /// Owning user; `None` for free tasks or after the owner was deleted
    pub owner_id: Option<i64>,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Owner name for display, "no owner" when the task has no owner reference
    pub fn owner_label(&self) -> &str {
        match (self.owner_id, self.owner_name.as_deref()) {
            (Some(_), Some(name)) => name,
            _ => "no owner",
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_completed: bool,
    pub owner_name: Option<String>,
    pub owner_id: Option<i64>,
}

/// Input for updating a task
///
/// Only `Some` fields are written; `owner_id: Some(None)` clears the owner.
/// `owner_name` is deliberately not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_completed: Option<bool>,
    pub owner_id: Option<Option<i64>>,
}

impl Task {
    /// Inserts a task
    ///
    /// # Errors
    ///
    /// An unknown `owner_id` violates the owner foreign key.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, description, date, is_completed, owner_name, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, date, is_completed, owner_name, owner_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.date)
        .bind(data.is_completed)
        .bind(data.owner_name)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, date, is_completed, owner_name, owner_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, date, is_completed, owner_name, owner_id, created_at
            FROM tasks
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a user's tasks, latest due date first
    ///
    /// Tasks sharing a due date come back in insertion order.
    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, date, is_completed, owner_name, owner_id, created_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY date DESC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks without an owner, in insertion order
    pub async fn list_unowned(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, date, is_completed, owner_name, owner_id, created_at
            FROM tasks
            WHERE owner_id IS NULL
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates the given fields
    ///
    /// Returns `None` if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if data.date.is_some() {
            bind_count += 1;
            assignments.push(format!("date = ${}", bind_count));
        }
        if data.is_completed.is_some() {
            bind_count += 1;
            assignments.push(format!("is_completed = ${}", bind_count));
        }
        if data.owner_id.is_some() {
            bind_count += 1;
            assignments.push(format!("owner_id = ${}", bind_count));
        }

        if assignments.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 \
             RETURNING id, name, description, date, is_completed, owner_name, owner_id, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(date) = data.date {
            q = q.bind(date);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }
        if let Some(owner_id) = data.owner_id {
            q = q.bind(owner_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task; returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
