/// Common error type for the storage and service layers
///
/// Repositories and services return `StoreResult<T>`. Errors are never
/// swallowed on the way up: a failure in the store reaches the caller of the
/// service unchanged, only classified.
///
/// # Taxonomy
///
/// - `NotFound`: lookup by id / email / name produced no row
/// - `Constraint`: unique or foreign-key violation (e.g. duplicate email)
/// - `Password`: hashing or verification failure
/// - `Database` / `Migration`: any other persistence failure

use crate::auth::password::PasswordError;

/// Result alias used by repositories and services
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage and service error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique or foreign-key constraint violated
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Password hashing failed
    #[error("Password operation failed: {0}")]
    Password(#[from] PasswordError),

    /// Any other database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Builds a `NotFound` error for an entity looked up by some key
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        StoreError::NotFound(format!("{} {} not found", entity, key))
    }

    /// True for the `NotFound` variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    return StoreError::Constraint(constraint.to_string());
                }
                StoreError::Database(sqlx::Error::Database(db_err))
            }
            other => StoreError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("User", "ann@mail.com");
        assert_eq!(err.to_string(), "Not found: User ann@mail.com not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_sqlx_errors_stay_database_errors() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
