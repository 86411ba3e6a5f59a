/// Common test utilities for integration tests
///
/// Each `TestContext` owns a fresh in-memory store seeded with the demo data,
/// so tests run without PostgreSQL and never see each other's writes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::Value;
use taskmanager_api::app::{build_router, AppState};
use taskmanager_api::config::{ApiConfig, Config, DatabaseConfig, SeedConfig};
use taskmanager_shared::repository::Repositories;
use taskmanager_shared::seed::{AdminAccount, SeedReport, Seeder};
use taskmanager_shared::services::Services;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub services: Services,
    pub seed: SeedReport,
}

impl TestContext {
    /// Creates a context over a seeded in-memory store
    pub async fn new() -> anyhow::Result<Self> {
        let ctx = Self::empty();
        let seed = Seeder::new(ctx.services.clone(), AdminAccount::default())
            .run_on(seed_date())
            .await?;

        Ok(Self { seed, ..ctx })
    }

    /// Creates a context over an empty in-memory store
    pub fn empty() -> Self {
        let services = Services::new(Repositories::in_memory());
        let state = AppState::with_services(services.clone(), test_config());

        Self {
            app: build_router(state),
            services,
            seed: SeedReport::default(),
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                panic!("Invalid JSON ({}): {}", e, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    /// POST without a body, for action endpoints
    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send("POST", uri, None).await
    }

    /// ID of a seeded user
    pub async fn user_id(&self, email: &str) -> i64 {
        self.services.users.get_user_by_email(email).await.unwrap().id
    }
}

/// "Today" used for seeding, so due dates are predictable
pub fn seed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        seed: SeedConfig {
            enabled: false,
            admin: AdminAccount::default(),
        },
    }
}
