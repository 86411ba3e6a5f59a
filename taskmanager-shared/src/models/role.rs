/// Role model and database operations
///
/// A role is a named permission tier ("ADMIN", "USER"). Names are not unique:
/// creating the same name twice stores two rows, and lookups by name return
/// the earliest one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(64) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the elevated role
pub const ADMIN_ROLE: &str = "ADMIN";

/// Name of the regular role
pub const USER_ROLE: &str = "USER";

/// Role model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Auto-assigned role ID
    pub id: i64,

    /// Role name, e.g. "ADMIN"
    pub name: String,

    /// When the role was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
}

impl CreateRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Role {
    /// Inserts a role and returns it with its assigned ID
    pub async fn create(pool: &PgPool, data: CreateRole) -> Result<Self, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(role)
    }

    /// Finds a role by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Finds the earliest role with the given name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at
            FROM roles
            WHERE name = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Lists all roles in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at FROM roles ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }

    /// Deletes a role; users holding it fall back to no role
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role_new() {
        let role = CreateRole::new(ADMIN_ROLE);
        assert_eq!(role.name, "ADMIN");
    }
}
