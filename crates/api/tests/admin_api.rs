//! User management under `/api/v1/admin`.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, get_auth, login, post_json_auth, put_json_auth, user_token, PASSWORD,
};
use serde_json::json;

#[tokio::test]
async fn regular_user_is_forbidden() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn admin_lists_users_without_password_hashes() {
    let app = common::build_test_app().await;
    let token = admin_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn created_user_can_sign_in() {
    let app = common::build_test_app().await;
    let token = admin_token(&app.router).await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/admin/users",
        &token,
        json!({
            "email": "Carlos@Vistoria.dev",
            "password": PASSWORD,
            "first_name": "Carlos",
            "last_name": "Lima",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["email"], "carlos@vistoria.dev");
    assert_eq!(created["data"]["role"], "user");

    let data = login(&app.router, "carlos@vistoria.dev", PASSWORD).await;
    assert_eq!(data["user"]["first_name"], "Carlos");
}

#[tokio::test]
async fn create_user_rejects_bad_input() {
    let app = common::build_test_app().await;
    let token = admin_token(&app.router).await;

    let weak = post_json_auth(
        &app.router,
        "/api/v1/admin/users",
        &token,
        json!({ "email": "novo@vistoria.dev", "password": "curta", "first_name": "Novo" }),
    )
    .await;
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);

    let bad_role = post_json_auth(
        &app.router,
        "/api/v1/admin/users",
        &token,
        json!({
            "email": "novo@vistoria.dev",
            "password": PASSWORD,
            "first_name": "Novo",
            "role": "superuser",
        }),
    )
    .await;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);

    let duplicate = post_json_auth(
        &app.router,
        "/api/v1/admin/users",
        &token,
        json!({ "email": "MARIA@vistoria.dev", "password": PASSWORD, "first_name": "Maria" }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_promotes_another_user() {
    let app = common::build_test_app().await;
    let token = admin_token(&app.router).await;

    let response = put_json_auth(
        &app.router,
        "/api/v1/admin/users/2/role",
        &token,
        json!({ "role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "admin");

    let promoted = user_token(&app.router).await;
    let listing = get_auth(&app.router, "/api/v1/admin/users", &promoted).await;
    assert_eq!(listing.status(), StatusCode::OK);
}

#[tokio::test]
async fn role_change_applies_to_tokens_already_issued() {
    let app = common::build_test_app().await;
    let admin = admin_token(&app.router).await;
    let maria = user_token(&app.router).await;

    let promote = put_json_auth(
        &app.router,
        "/api/v1/admin/users/2/role",
        &admin,
        json!({ "role": "admin" }),
    )
    .await;
    assert_eq!(promote.status(), StatusCode::OK);
    let listing = get_auth(&app.router, "/api/v1/admin/users", &maria).await;
    assert_eq!(listing.status(), StatusCode::OK);

    let demote = put_json_auth(
        &app.router,
        "/api/v1/admin/users/2/role",
        &admin,
        json!({ "role": "user" }),
    )
    .await;
    assert_eq!(demote.status(), StatusCode::OK);
    let listing = get_auth(&app.router, "/api/v1/admin/users", &maria).await;
    assert_eq!(listing.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_update_edge_cases() {
    let app = common::build_test_app().await;
    let token = admin_token(&app.router).await;

    let unknown = put_json_auth(
        &app.router,
        "/api/v1/admin/users/999/role",
        &token,
        json!({ "role": "admin" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let own = put_json_auth(
        &app.router,
        "/api/v1/admin/users/1/role",
        &token,
        json!({ "role": "user" }),
    )
    .await;
    assert_eq!(own.status(), StatusCode::CONFLICT);

    let invalid = put_json_auth(
        &app.router,
        "/api/v1/admin/users/2/role",
        &token,
        json!({ "role": "owner" }),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}
