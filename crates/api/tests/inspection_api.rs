//! Inspection CRUD, checklist, photos, comments and the dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, patch_json_auth, post_json_auth, put_json_auth, user_token};
use serde_json::{json, Value};

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

fn new_inspection() -> Value {
    json!({
        "project_name": "Residencial Jardim das Flores",
        "address": "Rua das Acácias, 45 - Campinas/SP",
        "date": "2024-08-02",
        "responsible": "Carlos Lima",
    })
}

#[tokio::test]
async fn listing_requires_a_token() {
    let app = common::build_test_app().await;
    let response = get(&app.router, "/api/v1/inspections").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_is_most_recent_first() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/inspections", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await["data"]), vec![1, 2]);
}

#[tokio::test]
async fn list_filters_by_text_and_status() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let by_address = get_auth(
        &app.router,
        "/api/v1/inspections?q=consola%C3%A7%C3%A3o",
        &token,
    )
    .await;
    assert_eq!(ids(&body_json(by_address).await["data"]), vec![2]);

    let by_status = get_auth(&app.router, "/api/v1/inspections?status=completed", &token).await;
    assert_eq!(ids(&body_json(by_status).await["data"]), vec![2]);

    let all = get_auth(&app.router, "/api/v1/inspections?status=all&q=", &token).await;
    assert_eq!(ids(&body_json(all).await["data"]), vec![1, 2]);

    let invalid = get_auth(&app.router, "/api/v1/inspections?status=archived", &token).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_uses_default_checklist() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = post_json_auth(&app.router, "/api/v1/inspections", &token, new_inspection()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await["data"].clone();

    assert_eq!(record["id"], 3);
    assert_eq!(record["status"], "pending");
    assert_eq!(record["date"], "2024-08-02");
    let items = ["structural", "plumbing", "electrical"]
        .iter()
        .map(|area| record[*area].as_array().unwrap().len())
        .sum::<usize>();
    assert_eq!(items, 4);
    assert_eq!(record["structural"][0]["name"], "Fundações");

    let fetched = get_auth(&app.router, "/api/v1/inspections/3", &token).await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_accepts_brazilian_date_and_explicit_checklist() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let mut body = new_inspection();
    body["date"] = json!("02/08/2024");
    body["status"] = json!("Em Andamento");
    body["checklist"] = json!([
        { "area": "electrical", "name": "Disjuntores" }
    ]);

    let response = post_json_auth(&app.router, "/api/v1/inspections", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await["data"].clone();
    assert_eq!(record["date"], "2024-08-02");
    assert_eq!(record["status"], "in_progress");
    assert_eq!(record["electrical"][0]["name"], "Disjuntores");
    assert_eq!(record["electrical"][0]["status"], "pending");
    assert!(record["structural"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let mut bad_date = new_inspection();
    bad_date["date"] = json!("2024-13-45");
    let response = post_json_auth(&app.router, "/api/v1/inspections", &token, bad_date).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut blank_name = new_inspection();
    blank_name["project_name"] = json!("   ");
    let response = post_json_auth(&app.router, "/api/v1/inspections", &token, blank_name).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_inspection_is_404() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/inspections/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_details_and_status() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = put_json_auth(
        &app.router,
        "/api/v1/inspections/1",
        &token,
        json!({ "responsible": "Ana Souza", "general_notes": "Retorno em 15 dias." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await["data"].clone();
    assert_eq!(record["responsible"], "Ana Souza");
    assert_eq!(record["general_notes"], "Retorno em 15 dias.");
    assert_eq!(record["project_name"], "Obra Residencial #1");

    let response = put_json_auth(
        &app.router,
        "/api/v1/inspections/1/status",
        &token,
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "completed");

    let bad = put_json_auth(
        &app.router,
        "/api/v1/inspections/1/status",
        &token,
        json!({ "status": "archived" }),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checklist_items_can_be_added_and_updated() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/inspections/1/items",
        &token,
        json!({ "area": "plumbing", "name": "Caixa d'água", "notes": "Sem tampa." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await["data"].clone();
    let added = record["plumbing"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(added["id"], 7);
    assert_eq!(added["status"], "pending");

    let response = patch_json_auth(
        &app.router,
        "/api/v1/inspections/1/items/7",
        &token,
        json!({ "status": "rejected" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await["data"].clone();
    let updated = record["plumbing"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(updated["status"], "rejected");
    assert_eq!(updated["notes"], "Sem tampa.");

    let bad_area = post_json_auth(
        &app.router,
        "/api/v1/inspections/1/items",
        &token,
        json!({ "area": "roofing", "name": "Telhado" }),
    )
    .await;
    assert_eq!(bad_area.status(), StatusCode::BAD_REQUEST);

    let unknown = patch_json_auth(
        &app.router,
        "/api/v1/inspections/1/items/999",
        &token,
        json!({ "status": "approved" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn photo_keeps_location_and_item_link() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/inspections/1/photos",
        &token,
        json!({
            "caption": "Fissura na viga",
            "image": { "kind": "url", "value": "https://example.com/viga.jpg" },
            "location": { "outcome": "acquired", "latitude": -23.56, "longitude": -46.65 },
            "item_id": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = body_json(response).await["data"]["photos"][0].clone();
    assert_eq!(photo["item_id"], 1);
    assert_eq!(photo["location"]["latitude"], -23.56);

    let linked = get_auth(&app.router, "/api/v1/inspections/1/items/1/photos", &token).await;
    assert_eq!(linked.status(), StatusCode::OK);
    assert_eq!(body_json(linked).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn denied_location_stores_no_coordinates() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/inspections/1/photos",
        &token,
        json!({
            "image": { "kind": "url", "value": "https://example.com/fachada.jpg" },
            "location": { "outcome": "denied" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = body_json(response).await["data"]["photos"][0].clone();
    assert!(photo["location"].is_null());
    assert!(photo["item_id"].is_null());
}

#[tokio::test]
async fn photo_rejects_foreign_item_and_bad_coordinates() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    // Item 5 belongs to inspection 2.
    let foreign = post_json_auth(
        &app.router,
        "/api/v1/inspections/1/photos",
        &token,
        json!({
            "image": { "kind": "url", "value": "https://example.com/a.jpg" },
            "item_id": 5,
        }),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::BAD_REQUEST);

    let bad_latitude = post_json_auth(
        &app.router,
        "/api/v1/inspections/1/photos",
        &token,
        json!({
            "image": { "kind": "url", "value": "https://example.com/a.jpg" },
            "location": { "outcome": "acquired", "latitude": 123.0, "longitude": 10.0 },
        }),
    )
    .await;
    assert_eq!(bad_latitude.status(), StatusCode::BAD_REQUEST);

    let record = get_auth(&app.router, "/api/v1/inspections/1", &token).await;
    assert!(body_json(record).await["data"]["photos"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn item_photos_of_sample_inspection() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/inspections/2/items/5/photos", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let photos = body_json(response).await["data"].clone();
    assert_eq!(ids(&photos), vec![1]);
    assert_eq!(photos[0]["caption"], "Vazamento encontrado");

    let unknown = get_auth(&app.router, "/api/v1/inspections/2/items/1/photos", &token).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_are_newest_first_and_signed_by_the_caller() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/inspections/2/comments", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await["data"]), vec![3, 2]);

    let response = post_json_auth(
        &app.router,
        "/api/v1/inspections/2/comments",
        &token,
        json!({ "body": "  Reparo concluído.  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(&app.router, "/api/v1/inspections/2/comments", &token).await;
    let comments = body_json(response).await["data"].clone();
    assert_eq!(ids(&comments), vec![4, 3, 2]);
    assert_eq!(comments[0]["author"], "Maria Oliveira");
    assert_eq!(comments[0]["body"], "Reparo concluído.");

    let blank = post_json_auth(
        &app.router,
        "/api/v1/inspections/2/comments",
        &token,
        json!({ "body": "   " }),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_counts_statuses() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router).await;

    let response = get_auth(&app.router, "/api/v1/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await["data"].clone();
    assert_eq!(stats["pending"], 0);
    assert_eq!(stats["in_progress"], 1);
    assert_eq!(stats["completed"], 1);
    assert_eq!(ids(&stats["recent"]), vec![1, 2]);

    let limited = get_auth(&app.router, "/api/v1/dashboard?limit=1", &token).await;
    assert_eq!(ids(&body_json(limited).await["data"]["recent"]), vec![1]);
}
