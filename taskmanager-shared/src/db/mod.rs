/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a connectivity check
/// - `migrations`: embedded schema migrations (roles, users, tasks)
///
/// Row mapping and queries live next to the models in `crate::models`.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
