//! Shared fixtures for unit and HTTP-level tests.

use crate::config::Config;
use crate::db::models::{Role, Session};
use crate::db::{self, sessions, users};
use crate::routes;
use crate::state::AppState;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Fresh in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    db::connect("sqlite::memory:")
        .await
        .expect("in-memory database should open")
}

/// Database in a temporary file, for tests that need several real connections.
/// Keep the returned directory alive for as long as the pool is used.
pub async fn file_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
    let pool = db::connect(&url).await.expect("file database should open");

    (dir, pool)
}

/// Insert a pending session for `tutor_email` directly through the store.
pub async fn seed_session(pool: &SqlitePool, title: &str, tutor_email: &str) -> Session {
    let session = Session::new(title.into(), None, tutor_email.into(), None, json!({}));
    sessions::create(pool, &session)
        .await
        .expect("session should insert");
    session
}

/// The real router over an in-memory database.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::for_tests();
        let state = AppState::new(&config)
            .await
            .expect("test state should build");
        let router = routes::router(state.clone(), &config);

        Self { state, router }
    }

    /// Create `email` with `role` and return a bearer token for it.
    pub async fn user(&self, email: &str, role: Role) -> String {
        let user = users::insert_if_absent(&self.state.db, email, None, None, role)
            .await
            .expect("user should insert");
        assert_eq!(user.role, role, "{} already exists with another role", email);

        self.state.tokens.issue(email).expect("token should sign")
    }

    /// Seed a pending session and return its id.
    pub async fn proposed_session(&self, tutor_email: &str, title: &str) -> String {
        seed_session(&self.state.db, title, tutor_email).await.id
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }
}
