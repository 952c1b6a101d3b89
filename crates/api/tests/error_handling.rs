//! Error envelope and request-body rejections.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, post_json_auth, user_token};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn errors_use_the_json_envelope() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = common::get_auth(&app.router, "/api/v1/inspections/404", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Inspection with id 404 not found");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/inspections")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"project_name\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_field_is_422() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/inspections",
        &token,
        json!({ "project_name": "Sem endereço" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
