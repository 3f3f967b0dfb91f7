mod common;

use axum::http::StatusCode;
use common::{create_professor, create_student, send, setup_test_app};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create_tag(app: &axum::Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/tags",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().unwrap()
}

async fn create_opportunity(app: &axum::Router, token: &str, body: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/opportunities", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_opportunity_with_tags(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let ml = create_tag(&app, &professor.token, "Machine Learning").await;
    let vision = create_tag(&app, &professor.token, "Computer Vision").await;

    let body = create_opportunity(
        &app,
        &professor.token,
        json!({
            "name": "Lab Assistant",
            "details": "Label images",
            "type": "research",
            "tag_ids": [ml, vision, 999999]
        }),
    )
    .await;

    assert_eq!(body["name"], "Lab Assistant");
    assert_eq!(body["type"], "research");
    assert_eq!(body["professor_id"], professor.id);
    assert_eq!(body["professor"]["id"], professor.id);
    assert_eq!(body["tags"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tag_create_is_idempotent_by_name(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let first = create_tag(&app, &professor.token, "Robotics").await;
    let second = create_tag(&app, &professor.token, "  Robotics ").await;
    assert_eq!(first, second);

    let (status, body) = send(&app, "GET", "/public/tags", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_create_opportunity(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/opportunities",
        Some(&student.token),
        Some(json!({ "name": "Sneaky", "type": "project" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only professor can perform this action");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_owner_can_update_or_delete(pool: PgPool) {
    let owner = create_professor(&pool).await;
    let other = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let created = create_opportunity(
        &app,
        &owner.token,
        json!({ "name": "Capstone", "type": "project" }),
    )
    .await;
    let uri = format!("/api/opportunities/{}", created["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&other.token),
        Some(json!({ "name": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot modify opportunities you don't own");

    let (status, _) = send(&app, "DELETE", &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&owner.token),
        Some(json!({ "name": "Capstone II", "type": "internship" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Capstone II");
    assert_eq!(body["type"], "internship");

    let (status, body) = send(&app, "DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "opportunity deleted");

    let (status, _) = send(&app, "GET", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_my_opportunities(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let other = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        "/api/opportunities/me",
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    create_opportunity(&app, &professor.token, json!({ "name": "Mine", "type": "research" }))
        .await;
    create_opportunity(&app, &other.token, json!({ "name": "Theirs", "type": "research" }))
        .await;

    let (_, body) = send(
        &app,
        "GET",
        "/api/opportunities/me",
        Some(&professor.token),
        None,
    )
    .await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Mine");

    let (status, body) = send(&app, "GET", "/public/opportunities", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_type_is_rejected(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/opportunities",
        Some(&professor.token),
        Some(json!({ "name": "Mystery", "type": "hackathon" })),
    )
    .await;

    assert!(status.is_client_error());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejected_update_leaves_row_untouched(pool: PgPool) {
    let owner = create_professor(&pool).await;
    let other = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let created = create_opportunity(
        &app,
        &owner.token,
        json!({ "name": "Capstone", "type": "project" }),
    )
    .await;
    let uri = format!("/api/opportunities/{}", created["id"]);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&other.token),
        Some(json!({ "name": "Hijacked", "tag_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Capstone");

    let (status, _) = send(&app, "DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&owner.token),
        Some(json!({ "name": "Revived" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "opportunity not found");

    let (status, _) = send(&app, "DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
