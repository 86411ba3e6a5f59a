/// Task service
///
/// On creation the owner's current name is copied into the task. Later
/// changes of ownership (assign / unassign) only move the owner reference;
/// the copied name stays as it was.

use crate::error::{StoreError, StoreResult};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::repository::{TaskRepository, UserRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// A task as supplied by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_completed: bool,
    /// Owning user, `None` for a free task
    pub owner_id: Option<i64>,
}

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tasks, users }
    }

    /// Persists a task, snapshotting the owner's name
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if `owner_id` names no user.
    pub async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let owner_name = match task.owner_id {
            Some(owner_id) => Some(
                self.users
                    .find_by_id(owner_id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("User", owner_id))?
                    .name,
            ),
            None => None,
        };

        let created = self
            .tasks
            .create(CreateTask {
                name: task.name,
                description: task.description,
                date: task.date,
                is_completed: task.is_completed,
                owner_name,
                owner_id: task.owner_id,
            })
            .await?;

        debug!(task_id = created.id, owner_id = ?created.owner_id, "Task created");
        Ok(created)
    }

    /// All tasks in insertion order
    pub async fn find_all(&self) -> StoreResult<Vec<Task>> {
        self.tasks.find_all().await
    }

    /// The user's tasks, latest due date first, ties in insertion order
    pub async fn find_by_owner_order_by_date_desc(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        self.tasks.find_by_owner_order_by_date_desc(owner_id).await
    }

    /// Tasks nobody owns
    pub async fn find_free_tasks(&self) -> StoreResult<Vec<Task>> {
        self.tasks.find_unowned().await
    }

    pub async fn get_task_by_id(&self, id: i64) -> StoreResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Task", id))
    }

    /// Applies a partial update
    pub async fn update_task(&self, id: i64, update: UpdateTask) -> StoreResult<Task> {
        if let Some(Some(owner_id)) = update.owner_id {
            self.ensure_user_exists(owner_id).await?;
        }

        self.tasks
            .update(id, update)
            .await?
            .ok_or_else(|| StoreError::not_found("Task", id))
    }

    pub async fn delete_task(&self, id: i64) -> StoreResult<()> {
        if !self.tasks.delete(id).await? {
            return Err(StoreError::not_found("Task", id));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }

    pub async fn set_task_completed(&self, id: i64) -> StoreResult<Task> {
        self.set_completion(id, true).await
    }

    pub async fn set_task_not_completed(&self, id: i64) -> StoreResult<Task> {
        self.set_completion(id, false).await
    }

    /// Points the task at a new owner; the stored owner name is unchanged
    pub async fn assign_task_to_user(&self, task_id: i64, user_id: i64) -> StoreResult<Task> {
        let task = self
            .update_task(
                task_id,
                UpdateTask {
                    owner_id: Some(Some(user_id)),
                    ..Default::default()
                },
            )
            .await?;

        info!(task_id, user_id, "Task assigned");
        Ok(task)
    }

    /// Removes the owner reference; the stored owner name is unchanged
    pub async fn unassign_task(&self, task_id: i64) -> StoreResult<Task> {
        let task = self
            .update_task(
                task_id,
                UpdateTask {
                    owner_id: Some(None),
                    ..Default::default()
                },
            )
            .await?;

        info!(task_id, "Task unassigned");
        Ok(task)
    }

    async fn set_completion(&self, id: i64, is_completed: bool) -> StoreResult<Task> {
        self.update_task(
            id,
            UpdateTask {
                is_completed: Some(is_completed),
                ..Default::default()
            },
        )
        .await
    }

    async fn ensure_user_exists(&self, user_id: i64) -> StoreResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("User", user_id)),
        }
    }
}
