//! Shared harness for integration tests: an in-memory SQLite database plus
//! the real application router.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response},
    Router,
};
use keygate::{
    account::model::NewAccount,
    auth::hashing,
    config::AuthConfig,
    storage::{
        self,
        repositories::account::{AccountRepository, SqlxAccountRepository},
        DbPool,
    },
};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const PASSWORD: &str = "super_secret_password";

pub struct TestApp {
    pub pool: DbPool,
    auth_config: AuthConfig,
}

impl TestApp {
    pub fn router(&self) -> Router {
        keygate::api::routes::build_router(self.pool.clone(), &self.auth_config)
    }

    /// Seed an account directly through the repository so fixtures can carry
    /// any flag combination, superuser included.
    pub async fn seed_account(
        &self,
        username: &str,
        is_active: bool,
        is_staff: bool,
        is_superuser: bool,
    ) -> i64 {
        let repository = SqlxAccountRepository::new(self.pool.clone());
        let account = repository
            .create(NewAccount {
                username: username.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("{}@example.com", username),
                password_hash: hashing::hash_password(PASSWORD).expect("hash password"),
                is_active,
                is_staff,
                is_superuser,
            })
            .await
            .expect("seed account");
        account.id
    }

    pub async fn seed_regular(&self, username: &str) -> i64 {
        self.seed_account(username, true, false, false).await
    }

    pub async fn seed_admin(&self, username: &str) -> i64 {
        self.seed_account(username, true, true, false).await
    }

    pub async fn seed_superuser(&self, username: &str) -> i64 {
        self.seed_account(username, true, true, true).await
    }

    /// Log in through the real endpoint and return (access, refresh).
    pub async fn login(&self, username: &str) -> (String, String) {
        let response = send_request(
            self,
            Method::POST,
            "/auth/token/",
            None,
            Some(serde_json::json!({ "username": username, "password": PASSWORD })),
        )
        .await;
        assert_eq!(response.status(), 200, "login should succeed for {username}");

        let body = response_json(response).await;
        (
            body["access"].as_str().expect("access token").to_string(),
            body["refresh"].as_str().expect("refresh token").to_string(),
        )
    }
}

pub async fn setup_test_app() -> TestApp {
    // A single connection keeps the in-memory database alive and shared
    // across every request in the test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");

    storage::run_migrations(&pool).await.expect("run migrations for tests");

    let auth_config = AuthConfig {
        jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
        access_ttl_seconds: 300,
        refresh_ttl_seconds: 86_400,
    };

    TestApp { pool, auth_config }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router().oneshot(request).await.expect("send request")
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    }
}

/// Extract the stable error code from an error body.
pub fn error_code(body: &Value) -> &str {
    body["detail"]["code"].as_str().unwrap_or_default()
}
