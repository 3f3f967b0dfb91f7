mod common;

use axum::http::StatusCode;
use common::{create_organization, create_professor, create_student, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_organization_event_lifecycle(pool: PgPool) {
    let organization = create_organization(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(&organization.token),
        Some(json!({
            "title": "Hack Night",
            "description": "Pizza and pull requests",
            "date": "2026-11-20",
            "sign_up_link": "https://forms.example.com/hack"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization_id"], organization.id);
    let event_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/public/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Hack Night");
    assert_eq!(events[0]["organization"]["id"], organization.id);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/events/{}", event_id),
        Some(&organization.token),
        Some(json!({ "title": "Hack Night II" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Hack Night II");
    assert_eq!(body["date"], "2026-11-20");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/public/organizations/{}/events", organization.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/events/{}", event_id),
        Some(&organization.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "event deleted");

    let (status, _) = send(&app, "GET", &format!("/public/events/{}", event_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_owning_organization_can_edit(pool: PgPool) {
    let owner = create_organization(&pool).await;
    let other = create_organization(&pool).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (_, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(&owner.token),
        Some(json!({ "title": "Career Fair" })),
    )
    .await;
    let uri = format!("/api/events/{}", body["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&other.token),
        Some(json!({ "title": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot modify events you don't own");

    let (status, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(&student.token),
        Some(json!({ "title": "Student Event" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only organization can perform this action");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_organization_profile(pool: PgPool) {
    let organization = create_organization(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/public/organizations/{}", organization.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ACM Chapter");
    assert!(body.get("password").is_none());

    let (status, body) = send(&app, "GET", "/public/organizations/31337/events", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "organization not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_opportunity_detail(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let (_, body) = send(
        &app,
        "POST",
        "/api/opportunities",
        Some(&professor.token),
        Some(json!({ "name": "Summer Research", "type": "research" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/public/opportunities/{}", body["id"]),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Summer Research");
    assert_eq!(body["professor"]["last_name"], "Turing");
    assert!(body["professor"].get("password").is_none());

    let (status, _) = send(&app, "GET", "/public/opportunities/999999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_account_self_service(pool: PgPool) {
    let student = create_student(&pool).await;
    let professor = create_professor(&pool).await;
    let app = setup_test_app(pool.clone());

    let (_, tag) = send(
        &app,
        "POST",
        "/api/tags",
        Some(&professor.token),
        Some(json!({ "name": "Databases" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/students/me/tags",
        Some(&student.token),
        Some(json!({ "tag_ids": [tag["id"]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/students/me",
        Some(&student.token),
        Some(json!({ "first_name": "Augusta" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Augusta");

    let (status, body) = send(&app, "GET", "/api/students/me", Some(&student.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"][0]["name"], "Databases");
    assert_eq!(body["coins"]["amount"], 0);

    let (status, body) = send(&app, "DELETE", "/api/students/me", Some(&student.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "student deleted");

    let (status, _) = send(&app, "GET", "/api/students/me", Some(&student.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let live_coins: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM coins WHERE student_id = $1 AND deleted_at IS NULL",
    )
    .bind(student.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(live_coins, 0);
}
