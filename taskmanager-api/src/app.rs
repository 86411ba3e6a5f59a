/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskmanager_api::{app::AppState, config::Config};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::postgres(pool, config);
/// let app = taskmanager_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskmanager_shared::repository::Repositories;
use taskmanager_shared::services::Services;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Services hold `Arc`s internally, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Role, user and task services
    pub services: Services,

    /// Database pool, `None` when running on the in-memory store
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self {
            services: Services::new(Repositories::postgres(pool.clone())),
            db: Some(pool),
            config: Arc::new(config),
        }
    }

    /// State backed by the given services without a database
    pub fn with_services(services: Services, config: Config) -> Self {
        Self {
            services,
            db: None,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                            # Health check
/// └── /v1/
///     ├── /roles          GET POST
///     ├── /users          GET POST
///     │   ├── /:id        GET DELETE
///     │   ├── /:id/admin  POST           # Elevate to ADMIN
///     │   └── /:id/tasks  GET            # Owned tasks, latest due date first
///     └── /tasks          GET (?free=true) POST
///         ├── /:id                  GET PUT DELETE
///         ├── /:id/complete         POST
///         ├── /:id/uncomplete       POST
///         ├── /:id/assign/:user_id  POST
///         └── /:id/unassign         POST
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{health, roles, tasks, users};

    let role_routes = Router::new().route("/", get(roles::list_roles).post(roles::create_role));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/:id", get(users::get_user).delete(users::delete_user))
        .route("/:id/admin", post(users::make_admin))
        .route("/:id/tasks", get(users::list_user_tasks));

    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/:id/complete", post(tasks::complete_task))
        .route("/:id/uncomplete", post(tasks::uncomplete_task))
        .route("/:id/assign/:user_id", post(tasks::assign_task))
        .route("/:id/unassign", post(tasks::unassign_task));

    let v1_routes = Router::new()
        .nest("/roles", role_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes);

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
