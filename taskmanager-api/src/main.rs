//! # Task Manager API Server
//!
//! Startup sequence:
//!
//! 1. Initialize tracing (`RUST_LOG` overrides the default filter)
//! 2. Load configuration from the environment / `.env`
//! 3. Connect to PostgreSQL and run migrations
//! 4. Seed demo data into an empty database (`SEED_ON_STARTUP`)
//! 5. Serve HTTP until Ctrl+C
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskmanager cargo run -p taskmanager-api
//! ```

use anyhow::Context;
use taskmanager_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskmanager_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    seed::Seeder,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskmanager_api=debug,taskmanager_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Task Manager API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let seed = config.seed.clone();
    let state = AppState::postgres(pool.clone(), config);

    if seed.enabled {
        let report = Seeder::new(state.services.clone(), seed.admin)
            .run()
            .await
            .context("Failed to seed demo data")?;
        tracing::info!(?report, "Seeding finished");
    } else {
        tracing::info!("Seeding disabled");
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
