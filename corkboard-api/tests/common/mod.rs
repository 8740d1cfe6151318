/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (skipped when DATABASE_URL is unset)
/// - Test user creation and JWT token generation
/// - Request helpers driving the full router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use corkboard_api::app::{build_router, AppState};
use corkboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, UploadConfig};
use corkboard_shared::auth::jwt::{create_token, Claims, TokenType};
use corkboard_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Signing secret used by every test token
pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context against the configured database
    ///
    /// Returns `None` when `DATABASE_URL` is not set so the suite can run
    /// (and pass) without infrastructure.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return Ok(None);
        };

        let db = PgPool::connect(&database_url).await?;

        // Run migrations (path relative to this crate's Cargo.toml)
        sqlx::migrate!("../corkboard-shared/migrations").run(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
            uploads: UploadConfig {
                dir: std::env::temp_dir()
                    .join("corkboard-test-uploads")
                    .to_string_lossy()
                    .to_string(),
            },
            admin_bootstrap: None,
        };

        let user = create_test_user(&db, UserRole::Collaborator).await?;
        let jwt_token = token_for(&user);

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext {
            db,
            app,
            user,
            jwt_token,
        }))
    }

    /// Sends a JSON request through the router and returns status + body
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    /// Cleans up test data created under the default user
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Deleting kanbans cascades to columns, cards, and children
        sqlx::query("DELETE FROM kanbans WHERE owner_id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Creates a user with a unique email for test isolation
pub async fn create_test_user(db: &PgPool, role: UserRole) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "unused-in-tests".to_string(),
            name: Some("Test User".to_string()),
            role,
            avatar_url: None,
        },
    )
    .await?;

    Ok(user)
}

/// Issues an access token for a user with the test secret
pub fn token_for(user: &User) -> String {
    let claims = Claims::new(user.id, user.role, TokenType::Access);
    create_token(&claims, TEST_JWT_SECRET).expect("token creation should succeed")
}
