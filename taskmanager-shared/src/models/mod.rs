/// Database models
///
/// Each model owns its row type, its create/update inputs and the PostgreSQL
/// queries for it. Repositories in `crate::repository` build on these.
///
/// # Models
///
/// - `role`: named permission tiers (ADMIN, USER)
/// - `user`: accounts with an optional role
/// - `task`: dated to-do items with an optional owner

pub mod role;
pub mod task;
pub mod user;
