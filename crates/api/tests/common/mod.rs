//! Shared harness for the HTTP integration tests.
//!
//! Every test gets a fresh in-memory store seeded with the two sample
//! inspections and two accounts, wired through the production router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use vistoria_api::auth::jwt::JwtConfig;
use vistoria_api::auth::password::hash_password;
use vistoria_api::config::ServerConfig;
use vistoria_api::export::ExportTracker;
use vistoria_api::router::build_app_router;
use vistoria_api::state::AppState;
use vistoria_core::roles::Role;
use vistoria_db::models::user::CreateUser;
use vistoria_db::store::{AccountStore, MemoryStore};

pub const ADMIN_EMAIL: &str = "admin@vistoria.dev";
pub const USER_EMAIL: &str = "maria@vistoria.dev";
pub const PASSWORD: &str = "senha-segura-123";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub exports: ExportTracker,
}

/// Test `ServerConfig` with a fixed JWT secret and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        bootstrap_admin: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

pub async fn seed_user(store: &MemoryStore, email: &str, first: &str, last: &str, role: Role) {
    store
        .create_user(CreateUser {
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role,
        })
        .await
        .unwrap();
}

/// Seeded store with the admin (id 1) and Maria (id 2).
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::seeded());
    seed_user(&store, ADMIN_EMAIL, "Ana", "Souza", Role::Admin).await;
    seed_user(&store, USER_EMAIL, "Maria", "Oliveira", Role::User).await;
    store
}

/// The production router over `store`, with accounts served by `accounts`.
pub fn build_router(
    store: Arc<MemoryStore>,
    accounts: Arc<dyn AccountStore>,
) -> (Router, ExportTracker) {
    let config = test_config();
    let exports = ExportTracker::new();
    let state = AppState {
        inspections: store,
        accounts,
        config: Arc::new(config.clone()),
        exports: exports.clone(),
    };
    (build_app_router(state, &config), exports)
}

/// Seeded store (ids: admin = 1, Maria = 2; inspections 1 and 2) behind the
/// full middleware stack.
pub async fn build_test_app() -> TestApp {
    let store = seeded_store().await;
    let (router, exports) = build_router(store.clone(), store.clone());
    TestApp {
        router,
        store,
        exports,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Log in and return the full `data` object of the auth response.
pub async fn login(app: &Router, email: &str, password: &str) -> Value {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

pub async fn admin_token(app: &Router) -> String {
    login(app, ADMIN_EMAIL, PASSWORD).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub async fn user_token(app: &Router) -> String {
    login(app, USER_EMAIL, PASSWORD).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}
