/// Database migration runner
///
/// Migrations are embedded at compile time from `taskmanager-shared/migrations/`:
///
/// 1. `create_roles` - `roles` table
/// 2. `create_users` - `users` table, unique email, `role_id` → roles (ON DELETE SET NULL)
/// 3. `create_tasks` - `tasks` table, `owner_id` → users (ON DELETE SET NULL)

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending migrations
///
/// Already-applied migrations are skipped, so this is safe to call on every start.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist (development and tests)
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
