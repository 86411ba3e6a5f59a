/// User model and database operations
///
/// Every read resolves the user's role name through a join on `roles`, so a
/// `User` always carries both `role_id` and `role`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     avatar VARCHAR(512),
///     role_id BIGINT REFERENCES roles(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::user::{User, CreateUser};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "mark@mail.com".to_string(),
///     name: "Mark".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     avatar: Some("images/mark.jpg".to_string()),
///     role_id: None,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "mark@mail.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Columns selected for every user read; `u` is the users row, `r` the joined role
const USER_COLUMNS: &str = "u.id, u.email, u.name, u.password_hash, u.avatar, u.role_id, \
     r.name AS role, u.created_at, u.updated_at";

/// User model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Auto-assigned user ID
    pub id: i64,

    /// Email address, unique across users
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Avatar image path, e.g. "images/ann.jpg"
    pub avatar: Option<String>,

    /// Assigned role, if any
    pub role_id: Option<i64>,

    /// Name of the assigned role (resolved on read)
    pub role: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True if the user's role is "ADMIN"
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(crate::models::role::ADMIN_ROLE)
    }
}

/// Input for creating a user
///
/// Carries a password hash, never a plaintext password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub role_id: Option<i64>,
}

/// Input for updating an existing user
///
/// Only `Some` fields are written. Nullable columns use `Option<Option<_>>`:
/// `Some(None)` clears the column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub avatar: Option<Option<String>>,
    pub role_id: Option<Option<i64>>,
}

impl User {
    /// Inserts a user
    ///
    /// # Errors
    ///
    /// A duplicate email violates `users_email_key`; an unknown `role_id`
    /// violates the role foreign key.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            WITH u AS (
                INSERT INTO users (email, name, password_hash, avatar, role_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {USER_COLUMNS}
            FROM u LEFT JOIN roles r ON r.id = u.role_id
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(data.name)
            .bind(data.password_hash)
            .bind(data.avatar)
            .bind(data.role_id)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by email address (exact match)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id WHERE u.email = $1"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Checks whether any user has the given email
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Lists all users in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id ORDER BY u.id ASC"
        );

        let users = sqlx::query_as::<_, User>(&query).fetch_all(pool).await?;

        Ok(users)
    }

    /// Updates the given fields and bumps `updated_at`
    ///
    /// Returns `None` if the user doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut assignments = String::from("updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            assignments.push_str(&format!(", email = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            assignments.push_str(&format!(", name = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            assignments.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.avatar.is_some() {
            bind_count += 1;
            assignments.push_str(&format!(", avatar = ${}", bind_count));
        }
        if data.role_id.is_some() {
            bind_count += 1;
            assignments.push_str(&format!(", role_id = ${}", bind_count));
        }

        let query = format!(
            r#"
            WITH u AS (
                UPDATE users SET {assignments}
                WHERE id = $1
                RETURNING *
            )
            SELECT {USER_COLUMNS}
            FROM u LEFT JOIN roles r ON r.id = u.role_id
            "#
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(avatar) = data.avatar {
            q = q.bind(avatar);
        }
        if let Some(role_id) = data.role_id {
            q = q.bind(role_id);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Tasks owned by the user keep their `owner_name`; their `owner_id`
    /// is set to NULL by the foreign key.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
