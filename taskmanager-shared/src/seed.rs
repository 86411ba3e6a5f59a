/// Demo data seeding
///
/// Called once by the process entry point after migrations. Seeding only
/// happens against an empty store (no roles and no users); otherwise it logs
/// and reports itself as skipped, so restarting the server never duplicates
/// the demo rows.
///
/// # Order
///
/// 1. Roles "ADMIN" and "USER"
/// 2. Seven users; the configured admin and the manager are elevated to ADMIN
/// 3. Five tasks, owners looked up by email, due dates relative to `today`
///
/// Each step depends on the previous one. The first error aborts the run and
/// is returned as-is; there is no transaction, so a failed run can leave a
/// partially seeded store behind.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::repository::Repositories;
/// use taskmanager_shared::seed::{AdminAccount, Seeder};
/// use taskmanager_shared::services::Services;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let services = Services::new(Repositories::in_memory());
/// let report = Seeder::new(services, AdminAccount::default()).run().await?;
/// assert_eq!(report.users, 7);
/// # Ok(())
/// # }
/// ```

use crate::error::StoreResult;
use crate::models::role::{CreateRole, ADMIN_ROLE, USER_ROLE};
use crate::services::{NewTask, NewUser, Services};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Password of every built-in demo account
const DEMO_PASSWORD: &str = "112233";

const MANAGER_EMAIL: &str = "manager@mail.com";

/// Regular demo users: (email, name, avatar)
const DEMO_USERS: [(&str, &str, &str); 5] = [
    ("mark@mail.com", "Mark", "images/mark.jpg"),
    ("ann@mail.com", "Ann", "images/ann.jpg"),
    ("ralf@mail.com", "Ralf", "images/ralf.jpg"),
    ("kate@mail.com", "Kate", "images/kate.jpg"),
    ("tom@mail.com", "Tom", "images/tom.jpg"),
];

/// Demo tasks: (owner email, days before today, completed)
const DEMO_TASKS: [(&str, u64, bool); 5] = [
    ("mark@mail.com", 40, true),
    ("ann@mail.com", 30, true),
    ("ann@mail.com", 20, true),
    ("kate@mail.com", 10, true),
    (MANAGER_EMAIL, 5, false),
];

const DEMO_TASK_NAME: &str = "Lorem Ipsum";

const DEMO_TASK_DESCRIPTION: &str = "Lorem Ipsum is simply dummy text of the printing and \
    typesetting industry. Lorem Ipsum has been the industry's standard dummy text ever since \
    the 1500s, when an unknown printer took a galley of type and scrambled it to make a type \
    specimen book.";

/// The administrator account created first, supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub email: String,
    pub name: String,
    pub password: String,
    pub avatar: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            email: "admin@mail.com".to_string(),
            name: "Admin".to_string(),
            password: DEMO_PASSWORD.to_string(),
            avatar: "images/admin.png".to_string(),
        }
    }
}

/// What a seeding run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub roles: usize,
    pub users: usize,
    pub tasks: usize,
    /// True if the store already held data and nothing was written
    pub skipped: bool,
}

pub struct Seeder {
    services: Services,
    admin: AdminAccount,
}

impl Seeder {
    pub fn new(services: Services, admin: AdminAccount) -> Self {
        Self { services, admin }
    }

    /// Seeds with due dates relative to the local current date
    pub async fn run(&self) -> StoreResult<SeedReport> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Seeds with due dates relative to `today`
    pub async fn run_on(&self, today: NaiveDate) -> StoreResult<SeedReport> {
        if !self.is_store_empty().await? {
            info!("Store already contains data, skipping demo seeding");
            return Ok(SeedReport {
                skipped: true,
                ..Default::default()
            });
        }

        info!(%today, "Seeding demo data");

        let roles = self.seed_roles().await?;
        let users = self.seed_users().await?;
        let tasks = self.seed_tasks(today).await?;

        info!(roles, users, tasks, "Demo data seeded");
        Ok(SeedReport {
            roles,
            users,
            tasks,
            skipped: false,
        })
    }

    async fn is_store_empty(&self) -> StoreResult<bool> {
        let roles = self.services.roles.find_all().await?;
        let users = self.services.users.find_all().await?;
        Ok(roles.is_empty() && users.is_empty())
    }

    async fn seed_roles(&self) -> StoreResult<usize> {
        self.services.roles.create_role(CreateRole::new(ADMIN_ROLE)).await?;
        self.services.roles.create_role(CreateRole::new(USER_ROLE)).await?;

        let roles = self.services.roles.find_all().await?;
        for role in &roles {
            info!(role_id = role.id, "saved role: {}", role.name);
        }

        Ok(roles.len())
    }

    async fn seed_users(&self) -> StoreResult<usize> {
        let users = &self.services.users;

        let admin = users
            .create_user(NewUser::new(
                &self.admin.email,
                &self.admin.name,
                &self.admin.password,
                &self.admin.avatar,
            ))
            .await?;
        users.change_role_to_admin(admin.id).await?;

        let manager = users
            .create_user(NewUser::new(
                MANAGER_EMAIL,
                "Manager",
                DEMO_PASSWORD,
                "images/admin.png",
            ))
            .await?;
        users.change_role_to_admin(manager.id).await?;

        for (email, name, avatar) in DEMO_USERS {
            users
                .create_user(NewUser::new(email, name, DEMO_PASSWORD, avatar))
                .await?;
        }

        let all = users.find_all().await?;
        for user in &all {
            info!(user_id = user.id, role = ?user.role, "saved user: {}", user.name);
        }

        Ok(all.len())
    }

    async fn seed_tasks(&self, today: NaiveDate) -> StoreResult<usize> {
        for (owner_email, days_ago, is_completed) in DEMO_TASKS {
            let owner = self.services.users.get_user_by_email(owner_email).await?;
            let date = match today.checked_sub_days(Days::new(days_ago)) {
                Some(date) => date,
                None => {
                    warn!(%today, days_ago, "Due date out of range, using today");
                    today
                }
            };

            self.services
                .tasks
                .create_task(NewTask {
                    name: DEMO_TASK_NAME.to_string(),
                    description: DEMO_TASK_DESCRIPTION.to_string(),
                    date,
                    is_completed,
                    owner_id: Some(owner.id),
                })
                .await?;
        }

        let all = self.services.tasks.find_all().await?;
        for task in &all {
            info!(
                task_id = task.id,
                "saved task: '{}' for owner: {}",
                task.name,
                task.owner_label()
            );
        }

        Ok(all.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_account_default() {
        let admin = AdminAccount::default();
        assert_eq!(admin.email, "admin@mail.com");
        assert_eq!(admin.password, "112233");
    }

    #[test]
    fn test_demo_task_owners_are_seeded_users() {
        for (owner, _, _) in DEMO_TASKS {
            assert!(
                owner == MANAGER_EMAIL || DEMO_USERS.iter().any(|(email, _, _)| *email == owner),
                "task owner {} is not a demo user",
                owner
            );
        }
    }
}
