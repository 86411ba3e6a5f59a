/// User service
///
/// Passwords are hashed with Argon2id here, before the user reaches a
/// repository. New users get no role; elevation to "ADMIN" is explicit and
/// requires the "ADMIN" role row to exist already.

use crate::auth::password;
use crate::error::{StoreError, StoreResult};
use crate::models::role::ADMIN_ROLE;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repository::{RoleRepository, UserRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// A user as supplied by a caller, with a plaintext password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub avatar: Option<String>,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
            avatar: Some(avatar.into()),
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Hashes the password and persists the user without a role
    ///
    /// # Errors
    ///
    /// `StoreError::Constraint` if the email is already taken.
    pub async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let password_hash = password::hash_password(&user.password)?;

        let created = self
            .users
            .create(CreateUser {
                email: user.email,
                name: user.name,
                password_hash,
                avatar: user.avatar,
                role_id: None,
            })
            .await?;

        debug!(user_id = created.id, email = %created.email, "User created");
        Ok(created)
    }

    /// Assigns the "ADMIN" role to the user and returns the updated user
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no "ADMIN" role exists yet or the user is gone.
    pub async fn change_role_to_admin(&self, user_id: i64) -> StoreResult<User> {
        let admin = self
            .roles
            .find_by_name(ADMIN_ROLE)
            .await?
            .ok_or_else(|| StoreError::not_found("Role", ADMIN_ROLE))?;

        let updated = self
            .users
            .update(
                user_id,
                UpdateUser {
                    role_id: Some(Some(admin.id)),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| StoreError::not_found("User", user_id))?;

        info!(user_id = updated.id, email = %updated.email, "User elevated to ADMIN");
        Ok(updated)
    }

    /// All users in insertion order
    pub async fn find_all(&self) -> StoreResult<Vec<User>> {
        self.users.find_all().await
    }

    /// The user with this email, `NotFound` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| StoreError::not_found("User", email))
    }

    /// Whether a user with this email exists
    pub async fn is_user_email_present(&self, email: &str) -> StoreResult<bool> {
        self.users.exists_by_email(email).await
    }

    /// The user with this ID, `NotFound` otherwise
    pub async fn get_user_by_id(&self, id: i64) -> StoreResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("User", id))
    }

    /// Deletes the user
    ///
    /// The user's tasks survive with their owner name intact and no owner
    /// reference.
    pub async fn delete_user(&self, id: i64) -> StoreResult<()> {
        if !self.users.delete(id).await? {
            return Err(StoreError::not_found("User", id));
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Checks a plaintext password against the stored hash
    ///
    /// Unknown emails verify as false.
    pub async fn verify_password(&self, email: &str, candidate: &str) -> StoreResult<bool> {
        match self.users.find_by_email(email).await? {
            Some(user) => Ok(password::verify_password(candidate, &user.password_hash)?),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::CreateRole;
    use crate::repository::InMemoryStore;

    fn service_with_store() -> (UserService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (UserService::new(store.clone(), store.clone()), store)
    }

    fn mark() -> NewUser {
        NewUser::new("mark@mail.com", "Mark", "112233", "images/mark.jpg")
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_assigns_no_role() {
        let (service, _) = service_with_store();

        let user = service.create_user(mark()).await.unwrap();

        assert_ne!(user.password_hash, "112233");
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert_eq!(user.role_id, None);
        assert!(service.verify_password("mark@mail.com", "112233").await.unwrap());
        assert!(!service.verify_password("mark@mail.com", "nope").await.unwrap());
        assert!(!service.verify_password("nobody@mail.com", "112233").await.unwrap());
    }

    #[tokio::test]
    async fn test_change_role_to_admin_requires_admin_role() {
        let (service, _) = service_with_store();
        let user = service.create_user(mark()).await.unwrap();

        let err = service.change_role_to_admin(user.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_change_role_to_admin_is_visible_in_find_all() {
        let (service, store) = service_with_store();
        RoleRepository::create(store.as_ref(), CreateRole::new("ADMIN")).await.unwrap();
        let user = service.create_user(mark()).await.unwrap();

        let updated = service.change_role_to_admin(user.id).await.unwrap();
        assert!(updated.is_admin());

        let all = service.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role.as_deref(), Some("ADMIN"));
    }

    #[tokio::test]
    async fn test_lookups_and_not_found() {
        let (service, _) = service_with_store();
        let user = service.create_user(mark()).await.unwrap();

        assert_eq!(service.get_user_by_email("mark@mail.com").await.unwrap().id, user.id);
        assert_eq!(service.get_user_by_id(user.id).await.unwrap().email, "mark@mail.com");
        assert!(service.is_user_email_present("mark@mail.com").await.unwrap());
        assert!(!service.is_user_email_present("ann@mail.com").await.unwrap());

        assert!(service.get_user_by_email("ann@mail.com").await.unwrap_err().is_not_found());
        assert!(service.get_user_by_id(99).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (service, _) = service_with_store();
        let first = service.create_user(mark()).await.unwrap();

        let err = service
            .create_user(NewUser::new("mark@mail.com", "Other Mark", "x", "images/x.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        // The lookup still returns the one stored user
        assert_eq!(service.get_user_by_email("mark@mail.com").await.unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (service, _) = service_with_store();
        let user = service.create_user(mark()).await.unwrap();

        service.delete_user(user.id).await.unwrap();

        assert!(service.find_all().await.unwrap().is_empty());
        assert!(service.delete_user(user.id).await.unwrap_err().is_not_found());
    }
}
