/// In-memory repositories
///
/// A single store holds roles, users and tasks behind one `RwLock`, so the
/// cross-table rules of the PostgreSQL schema (unique email, foreign keys,
/// ON DELETE SET NULL) can be enforced the same way. Rows live in `BTreeMap`s
/// keyed by their sequential ID, which gives insertion order for free.
///
/// Constraint errors use the same constraint names PostgreSQL reports.

use crate::error::{StoreError, StoreResult};
use crate::models::role::{CreateRole, Role};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repository::{RoleRepository, TaskRepository, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const USERS_EMAIL_KEY: &str = "users_email_key";
const USERS_ROLE_FKEY: &str = "users_role_id_fkey";
const TASKS_OWNER_FKEY: &str = "tasks_owner_id_fkey";

/// In-process store implementing all three repository traits
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    last_role_id: i64,
    last_user_id: i64,
    last_task_id: i64,
    roles: BTreeMap<i64, Role>,
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreState {
    /// Copy of a stored user with its role name filled in from the roles table
    fn resolve_user(&self, user: &User) -> User {
        let mut user = user.clone();
        user.role = user
            .role_id
            .and_then(|id| self.roles.get(&id))
            .map(|role| role.name.clone());
        user
    }

    fn check_role_exists(&self, role_id: Option<i64>) -> StoreResult<()> {
        match role_id {
            Some(id) if !self.roles.contains_key(&id) => {
                Err(StoreError::Constraint(USERS_ROLE_FKEY.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check_owner_exists(&self, owner_id: Option<i64>) -> StoreResult<()> {
        match owner_id {
            Some(id) if !self.users.contains_key(&id) => {
                Err(StoreError::Constraint(TASKS_OWNER_FKEY.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn create(&self, data: CreateRole) -> StoreResult<Role> {
        let mut state = self.state.write().await;

        state.last_role_id += 1;
        let role = Role {
            id: state.last_role_id,
            name: data.name,
            created_at: Utc::now(),
        };
        state.roles.insert(role.id, role.clone());

        Ok(role)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state.roles.values().find(|r| r.name == name).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Role>> {
        Ok(self.state.read().await.roles.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        if state.roles.remove(&id).is_none() {
            return Ok(false);
        }
        for user in state.users.values_mut() {
            if user.role_id == Some(id) {
                user.role_id = None;
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.email_taken(&data.email, None) {
            return Err(StoreError::Constraint(USERS_EMAIL_KEY.to_string()));
        }
        state.check_role_exists(data.role_id)?;

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            email: data.email,
            name: data.name,
            password_hash: data.password_hash,
            avatar: data.avatar,
            role_id: data.role_id,
            role: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        Ok(state.resolve_user(&user))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|u| state.resolve_user(u)))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| state.resolve_user(u)))
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self.state.read().await.email_taken(email, None))
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().map(|u| state.resolve_user(u)).collect())
    }

    async fn update(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = data.email.as_deref() {
            if state.email_taken(email, Some(id)) {
                return Err(StoreError::Constraint(USERS_EMAIL_KEY.to_string()));
            }
        }
        if let Some(role_id) = data.role_id {
            state.check_role_exists(role_id)?;
        }

        let updated = match state.users.get_mut(&id) {
            Some(user) => {
                if let Some(email) = data.email {
                    user.email = email;
                }
                if let Some(name) = data.name {
                    user.name = name;
                }
                if let Some(password_hash) = data.password_hash {
                    user.password_hash = password_hash;
                }
                if let Some(avatar) = data.avatar {
                    user.avatar = avatar;
                }
                if let Some(role_id) = data.role_id {
                    user.role_id = role_id;
                }
                user.updated_at = Utc::now();
                user.clone()
            }
            None => return Ok(None),
        };

        Ok(Some(state.resolve_user(&updated)))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        for task in state.tasks.values_mut() {
            if task.owner_id == Some(id) {
                task.owner_id = None;
            }
        }

        Ok(true)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;

        state.check_owner_exists(data.owner_id)?;

        state.last_task_id += 1;
        let task = Task {
            id: state.last_task_id,
            name: data.name,
            description: data.description,
            date: data.date,
            is_completed: data.is_completed,
            owner_name: data.owner_name,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };
        state.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Task>> {
        Ok(self.state.read().await.tasks.values().cloned().collect())
    }

    async fn find_by_owner_order_by_date_desc(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.owner_id == Some(owner_id))
            .cloned()
            .collect();

        // Stable sort: equal dates stay in insertion order
        tasks.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(tasks)
    }

    async fn find_unowned(&self) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.owner_id.is_none())
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;

        if let Some(owner_id) = data.owner_id {
            state.check_owner_exists(owner_id)?;
        }

        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            task.name = name;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(date) = data.date {
            task.date = date;
        }
        if let Some(is_completed) = data.is_completed {
            task.is_completed = is_completed;
        }
        if let Some(owner_id) = data.owner_id {
            task.owner_id = owner_id;
        }

        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.state.read().await.tasks.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(email: &str, name: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash: "hash".to_string(),
            avatar: None,
            role_id: None,
        }
    }

    fn new_task(day: u32, owner: Option<&User>) -> CreateTask {
        CreateTask {
            name: format!("task-{}", day),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            is_completed: false,
            owner_name: owner.map(|u| u.name.clone()),
            owner_id: owner.map(|u| u.id),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let store = InMemoryStore::new();

        let admin = RoleRepository::create(&store, CreateRole::new("ADMIN")).await.unwrap();
        let user = RoleRepository::create(&store, CreateRole::new("USER")).await.unwrap();
        let mark = UserRepository::create(&store, new_user("mark@mail.com", "Mark")).await.unwrap();

        assert_eq!(admin.id, 1);
        assert_eq!(user.id, 2);
        assert_eq!(mark.id, 1);
    }

    #[tokio::test]
    async fn test_duplicate_role_names_create_two_rows() {
        let store = InMemoryStore::new();

        let first = RoleRepository::create(&store, CreateRole::new("ADMIN")).await.unwrap();
        RoleRepository::create(&store, CreateRole::new("ADMIN")).await.unwrap();

        assert_eq!(RoleRepository::find_all(&store).await.unwrap().len(), 2);
        let found = store.find_by_name("ADMIN").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        UserRepository::create(&store, new_user("ann@mail.com", "Ann")).await.unwrap();

        let err = UserRepository::create(&store, new_user("ann@mail.com", "Ann 2"))
            .await
            .unwrap_err();

        match err {
            StoreError::Constraint(name) => assert_eq!(name, "users_email_key"),
            other => panic!("expected constraint violation, got {:?}", other),
        }
        assert_eq!(UserRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        let mut data = new_user("ralf@mail.com", "Ralf");
        data.role_id = Some(42);

        let err = UserRepository::create(&store, data).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(ref c) if c == "users_role_id_fkey"));
    }

    #[tokio::test]
    async fn test_user_role_name_is_resolved_and_cleared_on_role_delete() {
        let store = InMemoryStore::new();
        let admin = RoleRepository::create(&store, CreateRole::new("ADMIN")).await.unwrap();
        let mut data = new_user("tom@mail.com", "Tom");
        data.role_id = Some(admin.id);

        let tom = UserRepository::create(&store, data).await.unwrap();
        assert_eq!(tom.role.as_deref(), Some("ADMIN"));

        assert!(RoleRepository::delete(&store, admin.id).await.unwrap());

        let tom = UserRepository::find_by_id(&store, tom.id).await.unwrap().unwrap();
        assert_eq!(tom.role_id, None);
        assert_eq!(tom.role, None);
    }

    #[tokio::test]
    async fn test_owner_order_is_date_desc_with_stable_ties() {
        let store = InMemoryStore::new();
        let kate = UserRepository::create(&store, new_user("kate@mail.com", "Kate")).await.unwrap();

        let a = TaskRepository::create(&store, new_task(5, Some(&kate))).await.unwrap();
        let b = TaskRepository::create(&store, new_task(20, Some(&kate))).await.unwrap();
        let c = TaskRepository::create(&store, new_task(5, Some(&kate))).await.unwrap();
        TaskRepository::create(&store, new_task(25, None)).await.unwrap();

        let ids: Vec<i64> = store
            .find_by_owner_order_by_date_desc(kate.id)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(ids, vec![b.id, a.id, c.id]);
    }

    #[tokio::test]
    async fn test_deleting_owner_keeps_name_and_clears_reference() {
        let store = InMemoryStore::new();
        let ann = UserRepository::create(&store, new_user("ann@mail.com", "Ann")).await.unwrap();
        let task = TaskRepository::create(&store, new_task(1, Some(&ann))).await.unwrap();

        assert!(UserRepository::delete(&store, ann.id).await.unwrap());

        let task = TaskRepository::find_by_id(&store, task.id).await.unwrap().unwrap();
        assert_eq!(task.owner_id, None);
        assert_eq!(task.owner_name.as_deref(), Some("Ann"));
        assert_eq!(store.find_unowned().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_renaming_owner_leaves_task_owner_name_stale() {
        let store = InMemoryStore::new();
        let ann = UserRepository::create(&store, new_user("ann@mail.com", "Ann")).await.unwrap();
        let task = TaskRepository::create(&store, new_task(1, Some(&ann))).await.unwrap();

        let renamed = UserRepository::update(
            &store,
            ann.id,
            UpdateUser {
                name: Some("Anna".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(renamed.name, "Anna");

        let task = TaskRepository::find_by_id(&store, task.id).await.unwrap().unwrap();
        assert_eq!(task.owner_name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn test_update_missing_rows_returns_none() {
        let store = InMemoryStore::new();

        assert!(UserRepository::update(&store, 9, UpdateUser::default()).await.unwrap().is_none());
        assert!(TaskRepository::update(&store, 9, UpdateTask::default()).await.unwrap().is_none());
        assert!(!TaskRepository::delete(&store, 9).await.unwrap());
    }

    #[tokio::test]
    async fn test_task_with_unknown_owner_is_rejected() {
        let store = InMemoryStore::new();
        let mut data = new_task(3, None);
        data.owner_id = Some(7);

        let err = TaskRepository::create(&store, data).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(ref c) if c == "tasks_owner_id_fkey"));
    }
}
