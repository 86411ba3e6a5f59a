/// Services over the repositories
///
/// - `role`: create / list roles
/// - `user`: user lifecycle, password hashing, elevation to ADMIN
/// - `task`: task lifecycle, owner snapshot, ordering by due date
///
/// Services do not catch errors: whatever the repository returns reaches the
/// caller, only `None` results are turned into `StoreError::NotFound`.

pub mod role;
pub mod task;
pub mod user;

pub use role::RoleService;
pub use task::{NewTask, TaskService};
pub use user::{NewUser, UserService};

use crate::repository::Repositories;

/// All services wired to one set of repositories
#[derive(Clone)]
pub struct Services {
    pub roles: RoleService,
    pub users: UserService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            roles: RoleService::new(repos.roles.clone()),
            users: UserService::new(repos.users.clone(), repos.roles.clone()),
            tasks: TaskService::new(repos.tasks, repos.users),
        }
    }
}
