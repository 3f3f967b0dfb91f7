mod common;

use axum::http::StatusCode;
use common::{create_organization, create_professor, create_student, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

const DRIVE_LINK: &str = "https://drive.example.com/week-1";

#[sqlx::test(migrations = "./migrations")]
async fn test_report_notifies_professor(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reports",
        Some(&student.token),
        Some(json!({ "recipient_id": professor.id, "drive_link": DRIVE_LINK })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipient_id"], professor.id);
    assert_eq!(body["student_id"], student.id);

    let (status, body) = send(&app, "GET", "/api/reports/me", Some(&professor.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let reports = body.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["drive_link"], DRIVE_LINK);
    assert_eq!(reports[0]["student"]["first_name"], "Ada");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/reports/student/{}", student.id),
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        "GET",
        "/api/notifications/me",
        Some(&professor.token),
        None,
    )
    .await;
    let notifications = body.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "📝 Weekly Report Submitted");
    assert_eq!(notifications[0]["recipient_role"], "professor");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_report_to_missing_professor(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reports",
        Some(&student.token),
        Some(json!({ "recipient_id": 987654, "drive_link": DRIVE_LINK })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "professor not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_report_visibility(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let author = create_student(&pool).await;
    let stranger = create_student(&pool).await;
    let organization = create_organization(&pool).await;
    let app = setup_test_app(pool);

    let (_, body) = send(
        &app,
        "POST",
        "/api/reports",
        Some(&author.token),
        Some(json!({ "recipient_id": professor.id, "drive_link": DRIVE_LINK })),
    )
    .await;
    let uri = format!("/api/reports/{}", body["id"]);

    let (status, _) = send(&app, "GET", &uri, Some(&author.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(&professor.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &uri, Some(&stranger.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot view this report");

    let (status, _) = send(&app, "GET", "/api/reports/me", Some(&organization.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &uri, Some(&stranger.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot delete reports you don't own");

    let (status, body) = send(&app, "DELETE", &uri, Some(&author.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "report deleted");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_read_and_count(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    for week in 1..=3 {
        send(
            &app,
            "POST",
            "/api/reports",
            Some(&student.token),
            Some(json!({
                "recipient_id": professor.id,
                "drive_link": format!("https://drive.example.com/week-{}", week)
            })),
        )
        .await;
    }

    let (_, body) = send(
        &app,
        "GET",
        "/api/notifications/me/count",
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(body["count"], 3);

    let (_, body) = send(
        &app,
        "GET",
        "/api/notifications/me",
        Some(&professor.token),
        None,
    )
    .await;
    let first_id = body[0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/notifications/{}/read", first_id),
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["read"], true);
    assert!(body["read_at"].is_string());

    let (_, body) = send(
        &app,
        "GET",
        "/api/notifications/me?unread_only=true",
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/notifications/read-all",
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        "GET",
        "/api/notifications/me/count",
        Some(&professor.token),
        None,
    )
    .await;
    assert_eq!(body["count"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notifications_are_private(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let other_professor = create_professor(&pool).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    send(
        &app,
        "POST",
        "/api/reports",
        Some(&student.token),
        Some(json!({ "recipient_id": professor.id, "drive_link": DRIVE_LINK })),
    )
    .await;

    let (_, body) = send(
        &app,
        "GET",
        "/api/notifications/me",
        Some(&professor.token),
        None,
    )
    .await;
    let uri = format!("/api/notifications/{}", body[0]["id"]);

    let read_uri = format!("{uri}/read");
    let (status, body) = send(&app, "PUT", &read_uri, Some(&other_professor.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot modify notifications you don't own");

    let (status, body) = send(&app, "DELETE", &uri, Some(&other_professor.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot modify notifications you don't own");

    let (_, body) = send(&app, "GET", "/api/notifications/me", Some(&professor.token), None).await;
    assert_eq!(body[0]["read"], false);

    let (status, body) = send(&app, "DELETE", &uri, Some(&professor.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "notification deleted");

    let (status, body) = send(&app, "DELETE", &uri, Some(&professor.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "notification not found");
}
