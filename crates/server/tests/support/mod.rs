#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use configs::Environment;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use service::auth::{password::Argon2Hasher, repo::seaorm::SeaOrmAuthRepository, repository::AuthRepository};
use tower::ServiceExt;

use server::routes;
use server::state::AppState;

pub const REGISTER: &str = "/auth/register";

/// Cheap argon2 parameters so tests stay fast.
pub fn test_hasher() -> Argon2Hasher {
    Argon2Hasher::new(1024, 1, 1).expect("valid argon2 params")
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// Router backed by a fresh, migrated in-memory SQLite database.
pub async fn spawn_app(environment: Environment) -> anyhow::Result<TestApp> {
    let db = models::db::connect_in_memory().await?;
    let repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let router = routes::build_router(AppState::new(repo, test_hasher(), environment));
    Ok(TestApp { router, db })
}

pub fn app_with_repo(repo: Arc<dyn AuthRepository>, environment: Environment) -> Router {
    routes::build_router(AppState::new(repo, test_hasher(), environment))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// `errors[0].msg` of an error envelope.
    pub fn error_msg(&self) -> String {
        self.json()["errors"][0]["msg"].as_str().unwrap_or_default().to_string()
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> anyhow::Result<TestResponse> {
    let res = router.clone().oneshot(req).await?;
    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), usize::MAX).await?;
    Ok(TestResponse { status, headers, body })
}

pub async fn get(router: &Router, path: &str) -> anyhow::Result<TestResponse> {
    let req = Request::builder().method("GET").uri(path).body(Body::empty())?;
    send(router, req).await
}

pub async fn post_json(router: &Router, path: &str, body: &Value) -> anyhow::Result<TestResponse> {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?;
    send(router, req).await
}

pub fn valid_user() -> Value {
    serde_json::json!({
        "name": "John Doe",
        "email": "johndoe@gmail.com",
        "password": "StrongP@ssw0rd"
    })
}

/// `valid_user()` with one field replaced (or removed when `value` is `None`).
pub fn valid_user_with(field: &str, value: Option<Value>) -> Value {
    let mut user = valid_user();
    let obj = user.as_object_mut().expect("object");
    match value {
        Some(v) => {
            obj.insert(field.to_string(), v);
        }
        None => {
            obj.remove(field);
        }
    }
    user
}
