/// Role service
///
/// No duplicate check: creating "ADMIN" twice stores two rows.

use crate::error::{StoreError, StoreResult};
use crate::models::role::{CreateRole, Role};
use crate::repository::RoleRepository;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    /// Persists a role and returns it with its assigned ID
    pub async fn create_role(&self, role: CreateRole) -> StoreResult<Role> {
        let role = self.roles.create(role).await?;
        debug!(role_id = role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// All roles in insertion order
    pub async fn find_all(&self) -> StoreResult<Vec<Role>> {
        self.roles.find_all().await
    }

    /// Role with the given name, `NotFound` if there is none
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Role> {
        self.roles
            .find_by_name(name)
            .await?
            .ok_or_else(|| StoreError::not_found("Role", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn service() -> RoleService {
        RoleService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_created_roles_are_listed() {
        let service = service();

        let admin = service.create_role(CreateRole::new("ADMIN")).await.unwrap();
        let user = service.create_role(CreateRole::new("USER")).await.unwrap();

        let roles = service.find_all().await.unwrap();
        assert_eq!(roles, vec![admin, user]);
    }

    #[tokio::test]
    async fn test_find_all_on_empty_store() {
        assert!(service().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_creating_same_name_twice_yields_two_roles() {
        let service = service();

        let first = service.create_role(CreateRole::new("USER")).await.unwrap();
        let second = service.create_role(CreateRole::new("USER")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(service.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_name_missing() {
        let err = service().find_by_name("ADMIN").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
